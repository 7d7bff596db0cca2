use serde::{Deserialize, Serialize};
use shared::protocol::{UNKNOWN, UNNAMED_APP};
use shared::types::{DerivedStats, SortKey};
use crate::probe::UrlStatusMap;
use crate::records::normalize::{format_timestamp, Application, Deployment};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortKey,
}

/// One row of the application list
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub authority: String,
    pub owner: String,
    pub repository: Option<String>,
    pub bond_id: String,
    pub create_time: String,
    pub expiry_time: String,
}

impl From<&Application> for AppSummary {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            version: app.version.clone(),
            authority: app.authority.clone(),
            owner: app.owner.clone(),
            repository: app.repository.clone(),
            bond_id: app.bond_id.clone(),
            create_time: app.create_time.clone(),
            expiry_time: app.expiry_time.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppListResponse {
    pub stats: DerivedStats,
    pub apps: Vec<AppSummary>,
}

/// Metadata handed over by the list view's link. The detail view trusts it
/// instead of fetching the application again.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub name: Option<String>,
    pub version: Option<String>,
    pub authority: Option<String>,
    pub created: Option<String>,
    pub expires: Option<String>,
    pub owner: Option<String>,
    pub repository: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
    pub authority: String,
    pub created: String,
    pub expires: String,
    pub owner: String,
    pub repository: String,
}

impl From<DetailQuery> for AppMetadata {
    fn from(query: DetailQuery) -> Self {
        let or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            name: query.name.unwrap_or_else(|| UNNAMED_APP.to_string()),
            version: or_unknown(query.version),
            authority: or_unknown(query.authority),
            created: query
                .created
                .map(|raw| format_timestamp(&raw))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            expires: query
                .expires
                .map(|raw| format_timestamp(&raw))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            owner: or_unknown(query.owner),
            repository: or_unknown(query.repository),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentView {
    pub id: String,
    pub names: Vec<String>,
    pub urls: Vec<String>,
}

impl From<Deployment> for DeploymentView {
    fn from(deployment: Deployment) -> Self {
        Self {
            id: deployment.id,
            names: deployment.names,
            urls: deployment.urls,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetailResponse {
    pub id: String,
    pub app: AppMetadata,
    pub deployments: Vec<DeploymentView>,
    pub url_status: UrlStatusMap,
}

#[derive(Debug, Deserialize)]
pub struct CheckUrlQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUrlResponse {
    pub is_available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
