use std::collections::HashMap;
use chrono::{DateTime, Utc};
use shared::protocol::{
    ATTR_APP_VERSION, ATTR_NAME, ATTR_REPOSITORY, ATTR_URL, LRN_SCHEME, UNKNOWN, UNNAMED_APP,
};
use shared::types::{ApplicationRecord, Attribute, DeploymentRecord};
use super::address::display_address;

/// A record's attribute list, keyed once so lookups don't rescan it.
/// When a key repeats, its first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct Attributes(HashMap<String, Option<String>>);

impl Attributes {
    pub fn from_list(attributes: &[Attribute]) -> Self {
        let mut map = HashMap::with_capacity(attributes.len());
        for attr in attributes {
            map.entry(attr.key.clone())
                .or_insert_with(|| attr.as_str().map(str::to_string));
        }
        Self(map)
    }

    /// String value of `key`, if present and string-typed
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_deref()
    }
}

pub fn display_name(attrs: &Attributes) -> String {
    attrs.get(ATTR_NAME).unwrap_or(UNNAMED_APP).to_string()
}

pub fn display_version(attrs: &Attributes) -> String {
    attrs.get(ATTR_APP_VERSION).unwrap_or(UNKNOWN).to_string()
}

pub fn repository(attrs: &Attributes) -> Option<String> {
    attrs.get(ATTR_REPOSITORY).map(str::to_string)
}

/// Authority segment of the first `lrn://` name:
/// "lrn://authority/applications/app" splits into ["lrn:", "", "authority", ...].
pub fn authority(names: &[String]) -> String {
    names
        .iter()
        .find(|name| name.starts_with(LRN_SCHEME))
        .and_then(|name| name.split('/').nth(2))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Parse an RFC 3339 registry timestamp; anything else is treated as unknown
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Render a registry timestamp for people, echoing it when it can't be parsed
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => raw.to_string(),
    }
}

/// An application record with its display fields derived once
#[derive(Debug, Clone)]
pub struct Application {
    pub id: String,
    pub bond_id: String,
    pub name: String,
    pub version: String,
    pub authority: String,
    /// bech32 form of the first owner, or "" without owners
    pub owner: String,
    pub repository: Option<String>,
    pub create_time: String,
    pub expiry_time: String,
    pub created: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

impl Application {
    pub fn from_record(record: ApplicationRecord) -> Self {
        let attrs = Attributes::from_list(&record.attributes);
        let owner = record
            .owners
            .first()
            .map(|raw| display_address(raw).into_string())
            .unwrap_or_default();

        Self {
            name: display_name(&attrs),
            version: display_version(&attrs),
            repository: repository(&attrs),
            authority: authority(&record.names),
            owner,
            created: parse_timestamp(&record.create_time),
            expires: parse_timestamp(&record.expiry_time),
            id: record.id,
            bond_id: record.bond_id,
            create_time: record.create_time,
            expiry_time: record.expiry_time,
        }
    }
}

/// A deployment record reduced to what the detail view shows
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub id: String,
    pub names: Vec<String>,
    pub urls: Vec<String>,
}

impl Deployment {
    pub fn from_record(record: DeploymentRecord) -> Self {
        let attrs = Attributes::from_list(&record.attributes);
        Self {
            urls: deployment_urls(&attrs),
            id: record.id,
            names: record.names,
        }
    }
}

/// Split the comma-separated `url` attribute, keeping source order and duplicates
pub fn deployment_urls(attrs: &Attributes) -> Vec<String> {
    attrs
        .get(ATTR_URL)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::TypedValue;

    fn attr(key: &str, value: Option<&str>) -> Attribute {
        Attribute {
            key: key.to_string(),
            value: value.map(|v| TypedValue {
                string: Some(v.to_string()),
                ..Default::default()
            }),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_authority_from_lrn_name() {
        assert_eq!(authority(&names(&["lrn://foo/bar/baz"])), "foo");
        assert_eq!(authority(&names(&["nope"])), "Unknown");
        assert_eq!(authority(&[]), "Unknown");
    }

    #[test]
    fn test_authority_uses_first_lrn_name() {
        let list = names(&["plain", "lrn://cerc-io/applications/app", "lrn://other/x"]);
        assert_eq!(authority(&list), "cerc-io");
    }

    #[test]
    fn test_authority_short_path_is_unknown() {
        // "lrn:" + "" is only two segments after the split
        assert_eq!(authority(&names(&["lrn:/"])), "Unknown");
        assert_eq!(authority(&names(&["lrn://"])), "");
    }

    #[test]
    fn test_display_fallbacks() {
        let attrs = Attributes::from_list(&[]);
        assert_eq!(display_name(&attrs), "Unnamed App");
        assert_eq!(display_version(&attrs), "Unknown");
        assert_eq!(repository(&attrs), None);

        let attrs = Attributes::from_list(&[attr("name", None), attr("app_version", Some("1.2.0"))]);
        assert_eq!(display_name(&attrs), "Unnamed App");
        assert_eq!(display_version(&attrs), "1.2.0");
    }

    #[test]
    fn test_first_duplicate_attribute_wins() {
        let attrs = Attributes::from_list(&[attr("name", Some("first")), attr("name", Some("second"))]);
        assert_eq!(display_name(&attrs), "first");
    }

    #[test]
    fn test_deployment_urls_keep_order_and_duplicates() {
        let attrs = Attributes::from_list(&[attr("url", Some("http://a, http://b,,http://a"))]);
        assert_eq!(deployment_urls(&attrs), names(&["http://a", "http://b", "http://a"]));

        let attrs = Attributes::from_list(&[attr("url", Some(""))]);
        assert!(deployment_urls(&attrs).is_empty());
    }

    #[test]
    fn test_application_from_record() {
        let record = ApplicationRecord {
            id: "bafyapp".to_string(),
            bond_id: "bond".to_string(),
            create_time: "2024-03-01T10:00:00Z".to_string(),
            expiry_time: "garbage".to_string(),
            names: names(&["lrn://laconic/applications/explorer"]),
            owners: names(&["deadbeef", "cafe"]),
            attributes: vec![
                attr("name", Some("explorer")),
                attr("repository", Some("https://git.example/explorer")),
            ],
        };

        let app = Application::from_record(record);
        assert_eq!(app.name, "explorer");
        assert_eq!(app.version, "Unknown");
        assert_eq!(app.authority, "laconic");
        assert!(app.owner.starts_with("laconic1"));
        assert_eq!(app.repository.as_deref(), Some("https://git.example/explorer"));
        assert!(app.created.is_some());
        assert!(app.expires.is_none());
    }

    #[test]
    fn test_application_without_owner_has_empty_owner() {
        let app = Application::from_record(ApplicationRecord::default());
        assert_eq!(app.owner, "");
        assert_eq!(app.name, "Unnamed App");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T10:00:00Z"), "2024-03-01 10:00:00 UTC");
        assert_eq!(format_timestamp("2024-03-01T12:00:00+02:00"), "2024-03-01 10:00:00 UTC");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
