use bech32::{Bech32, Hrp};
use shared::protocol::ADDRESS_HRP;

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid hex address: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid human-readable part: {0}")]
    Hrp(String),
    #[error("bech32 encoding failed: {0}")]
    Encode(String),
}

/// Outcome of formatting an owner address for display.
/// Display must never block rendering, so a bad input passes through as-is.
#[derive(Debug)]
pub enum DisplayAddress {
    Encoded(String),
    Passthrough { original: String, cause: AddressError },
}

impl DisplayAddress {
    pub fn into_string(self) -> String {
        match self {
            DisplayAddress::Encoded(encoded) => encoded,
            DisplayAddress::Passthrough { original, cause } => {
                tracing::warn!("Leaving address {:?} unencoded: {}", original, cause);
                original
            }
        }
    }
}

/// Encode raw hex bytes as bech32 under the given human-readable part
pub fn encode_hex(hrp: &str, raw_hex: &str) -> Result<String, AddressError> {
    let bytes = hex::decode(raw_hex)?;
    let hrp = Hrp::parse(hrp).map_err(|e| AddressError::Hrp(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, &bytes).map_err(|e| AddressError::Encode(e.to_string()))
}

/// Format a raw hex owner address as a `laconic1...` address
pub fn display_address(raw_hex: &str) -> DisplayAddress {
    match encode_hex(ADDRESS_HRP, raw_hex) {
        Ok(encoded) => DisplayAddress::Encoded(encoded),
        Err(cause) => DisplayAddress::Passthrough {
            original: raw_hex.to_string(),
            cause,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip173_vectors() {
        assert_eq!(encode_hex("a", "").unwrap(), "a12uel5l");
        assert_eq!(
            encode_hex("abcdef", "00443214c74254b635cf84653a56d7c675be77df").unwrap(),
            "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw"
        );
    }

    #[test]
    fn test_round_trip() {
        for raw in ["", "00", "deadbeef", "0123456789abcdef0123456789abcdef01234567"] {
            let encoded = display_address(raw).into_string();
            assert!(encoded.starts_with("laconic1"), "{encoded}");

            let (hrp, data) = bech32::decode(&encoded).unwrap();
            assert_eq!(hrp.to_string(), "laconic");
            assert_eq!(hex::encode(data), raw);
        }
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let lower = display_address("deadbeef").into_string();
        let upper = display_address("DEADBEEF").into_string();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_invalid_input_passes_through() {
        for raw in ["not-hex", "abc", "0xdeadbeef", "laconic1qqqq"] {
            match display_address(raw) {
                DisplayAddress::Passthrough { original, cause } => {
                    assert_eq!(original, raw);
                    assert!(matches!(cause, AddressError::Hex(_)));
                }
                DisplayAddress::Encoded(encoded) => panic!("{raw} encoded as {encoded}"),
            }
        }
    }
}
