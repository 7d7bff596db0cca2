use serde::{Deserialize, Deserializer, Serialize};

/// GraphQL lists may come back as `null`; treat that the same as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed attribute value as returned by the registry's value union.
/// Each variant is aliased in the query so exactly one field is set;
/// an unmatched fragment yields an empty object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(default, rename = "bool", skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
    #[serde(default, rename = "int", skip_serializing_if = "Option::is_none")]
    pub integer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One key/value pair from a record's attribute list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default)]
    pub value: Option<TypedValue>,
}

impl Attribute {
    /// The string variant of the value, if that is what the registry returned
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref()?.string.as_deref()
    }
}

/// An application record as returned by `GetApplicationRecords`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bond_id: String,

    /// RFC 3339 creation time, kept as sent
    #[serde(default, deserialize_with = "null_as_default")]
    pub create_time: String,

    /// RFC 3339 expiry time, kept as sent
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiry_time: String,

    /// Registry names; at most one is an `lrn://` authority path
    #[serde(default, deserialize_with = "null_as_default")]
    pub names: Vec<String>,

    /// Owner addresses as raw hex
    #[serde(default, deserialize_with = "null_as_default")]
    pub owners: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

/// A deployment record as returned by `GetApplicationDeploymentRecords`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub names: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

/// Reachability of one deployment URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Checking,
    Available,
    Unavailable,
}

impl UrlStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, UrlStatus::Checking)
    }
}

/// Summary counts over the full application list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub total_apps: usize,
    pub unique_authorities: usize,
    pub recently_created: usize,
    pub soon_expiring: usize,
}

/// Orderings offered by the application list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first
    #[default]
    Time,
    Name,
    Authority,
    Owner,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_record_tolerates_nulls() {
        let json = r#"{
            "id": "bafy1",
            "bondId": null,
            "createTime": "2024-01-01T00:00:00Z",
            "expiryTime": "2025-01-01T00:00:00Z",
            "names": null,
            "owners": ["0a0b"],
            "attributes": [
                { "key": "name", "value": { "string": "dapp" } },
                { "key": "version", "value": null },
                { "key": "meta", "value": {} }
            ]
        }"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.bond_id, "");
        assert!(record.names.is_empty());
        assert_eq!(record.attributes[0].as_str(), Some("dapp"));
        assert_eq!(record.attributes[1].as_str(), None);
        assert_eq!(record.attributes[2].as_str(), None);
    }

    #[test]
    fn test_typed_value_variants() {
        let json = r#"[
            { "key": "url", "value": { "string": "https://a" } },
            { "key": "flag", "value": { "bool": true } },
            { "key": "n", "value": { "int": 7 } }
        ]"#;

        let attrs: Vec<Attribute> = serde_json::from_str(json).unwrap();
        assert_eq!(attrs[0].as_str(), Some("https://a"));
        assert_eq!(attrs[1].value.as_ref().unwrap().boolean, Some(true));
        assert_eq!(attrs[1].as_str(), None);
        assert_eq!(attrs[2].value.as_ref().unwrap().integer, Some(7));
    }

    #[test]
    fn test_sort_key_wire_names() {
        let key: SortKey = serde_json::from_str("\"authority\"").unwrap();
        assert_eq!(key, SortKey::Authority);
        assert_eq!(SortKey::default(), SortKey::Time);
    }
}
