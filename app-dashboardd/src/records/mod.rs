pub mod address;
pub mod normalize;
