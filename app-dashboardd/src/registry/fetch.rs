use shared::types::{ApplicationRecord, DeploymentRecord};
use super::client::{RegistryClient, RegistryError};

/// Lifecycle of one upstream fetch for a page view
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Before the fetch has been settled
    Loading,
    Loaded(Vec<T>),
    /// The fetch failed; the cause has been logged and the view shows no records
    Failed,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}

impl<T> FetchState<T> {
    /// Settle a finished fetch. Failures are logged here and never travel further.
    pub fn settle(result: Result<Vec<T>, RegistryError>, what: &str) -> Self {
        match result {
            Ok(records) => {
                tracing::debug!("Fetched {} {}", records.len(), what);
                FetchState::Loaded(records)
            }
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", what, e);
                FetchState::Failed
            }
        }
    }

    /// Records to display; empty while loading or after a failure
    pub fn into_records(self) -> Vec<T> {
        match self {
            FetchState::Loaded(records) => records,
            FetchState::Loading | FetchState::Failed => Vec::new(),
        }
    }
}

pub async fn fetch_applications(client: &RegistryClient) -> FetchState<ApplicationRecord> {
    FetchState::settle(client.application_records().await, "application records")
}

pub async fn fetch_deployments(
    client: &RegistryClient,
    app_id: &str,
) -> FetchState<DeploymentRecord> {
    FetchState::settle(
        client.deployment_records(app_id).await,
        &format!("deployment records for {}", app_id),
    )
}
