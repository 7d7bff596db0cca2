use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use shared::protocol::{GET_APPLICATION_DEPLOYMENT_RECORDS, GET_APPLICATION_RECORDS};
use shared::types::{ApplicationRecord, DeploymentRecord};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("registry answered with HTTP {0}")]
    Status(StatusCode),
    #[error("registry response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("registry reported errors: {0}")]
    Upstream(String),
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRecords<T> {
    query_records: Option<Vec<T>>,
}

/// Read-only client for the registry's GraphQL endpoint
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RegistryClient {
    pub fn new(endpoint: Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("app-dashboardd/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build registry HTTP client")?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// All records tagged `type = ApplicationRecord`
    pub async fn application_records(&self) -> Result<Vec<ApplicationRecord>, RegistryError> {
        self.query_records(GET_APPLICATION_RECORDS, json!({})).await
    }

    /// Deployment records whose `application` attribute is `app_id`
    pub async fn deployment_records(
        &self,
        app_id: &str,
    ) -> Result<Vec<DeploymentRecord>, RegistryError> {
        self.query_records(GET_APPLICATION_DEPLOYMENT_RECORDS, json!({ "appId": app_id }))
            .await
    }

    async fn query_records<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Vec<T>, RegistryError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: GraphQlResponse<QueryRecords<T>> = serde_json::from_slice(&body)?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(RegistryError::Upstream(messages.join("; ")));
        }

        Ok(parsed
            .data
            .and_then(|data| data.query_records)
            .unwrap_or_default())
    }
}
