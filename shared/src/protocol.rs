/// Human-readable part of bech32 owner addresses
pub const ADDRESS_HRP: &str = "laconic";

/// Scheme prefix of structured registry names, e.g. "lrn://authority/applications/app"
pub const LRN_SCHEME: &str = "lrn://";

/// Attribute keys consumed by the dashboard
pub const ATTR_NAME: &str = "name";
pub const ATTR_APP_VERSION: &str = "app_version";
pub const ATTR_REPOSITORY: &str = "repository";
pub const ATTR_URL: &str = "url";

/// Display fallbacks for missing attributes
pub const UNNAMED_APP: &str = "Unnamed App";
pub const UNKNOWN: &str = "Unknown";

/// Width of the "recently created" and "soon expiring" windows
pub const STATS_WINDOW_DAYS: i64 = 30;

/// Reachability check endpoint, kept outside the versioned prefix
pub const CHECK_URL_PATH: &str = "/check-url";

pub const GET_APPLICATION_RECORDS: &str = r#"
query GetApplicationRecords {
  queryRecords(attributes: [{ key: "type", value: { string: "ApplicationRecord" } }]) {
    id
    bondId
    createTime
    expiryTime
    names
    owners
    attributes {
      key
      value {
        ... on StringValue {
          string: value
        }
      }
    }
  }
}
"#;

pub const GET_APPLICATION_DEPLOYMENT_RECORDS: &str = r#"
query GetApplicationDeploymentRecords($appId: String!) {
  queryRecords(
    attributes: [
      { key: "type", value: { string: "ApplicationDeploymentRecord" } }
      { key: "application", value: { string: $appId } }
    ]
  ) {
    id
    names
    attributes {
      key
      value {
        ... on BooleanValue {
          bool: value
        }
        ... on IntValue {
          int: value
        }
        ... on FloatValue {
          float: value
        }
        ... on StringValue {
          string: value
        }
        ... on BytesValue {
          bytes: value
        }
        ... on LinkValue {
          link: value
        }
      }
    }
  }
}
"#;
