use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures::stream::{self, Stream};
use shared::protocol::CHECK_URL_PATH;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use crate::api::views::{
    AppDetailResponse, AppListResponse, AppMetadata, AppSummary, CheckUrlQuery, CheckUrlResponse,
    DeploymentView, DetailQuery, ErrorResponse, ListQuery,
};
use crate::clock::Clock;
use crate::listing::{filter::filter_and_sort, stats::derive_stats};
use crate::probe::{all_settled, UrlProber, UrlStatusMap};
use crate::records::normalize::{Application, Deployment};
use crate::registry::client::RegistryClient;
use crate::registry::fetch::{fetch_applications, fetch_deployments};

/// Shared by every request. Nothing in here is mutated: each page view fetches
/// and derives its data from scratch.
#[derive(Clone)]
pub struct AppState {
    pub registry: RegistryClient,
    pub prober: UrlProber,
    pub clock: Arc<dyn Clock>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(CHECK_URL_PATH, get(check_url))
        .route("/v1/apps", get(list_apps))
        .route("/v1/apps/:id", get(get_app))
        .route("/v1/apps/:id/url-status", get(stream_url_status))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn check_url(
    State(state): State<AppState>,
    Query(params): Query<CheckUrlQuery>,
) -> Result<Json<CheckUrlResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(url) = params.url.filter(|url| !url.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "URL parameter is required".to_string(),
            }),
        ));
    };

    let is_available = state.prober.is_available(&url).await;
    Ok(Json(CheckUrlResponse { is_available }))
}

async fn list_apps(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Json<AppListResponse> {
    let apps: Vec<Application> = fetch_applications(&state.registry)
        .await
        .into_records()
        .into_iter()
        .map(Application::from_record)
        .collect();

    let stats = derive_stats(&apps, state.clock.now());
    let apps = filter_and_sort(&apps, &params.search, params.sort)
        .into_iter()
        .map(AppSummary::from)
        .collect();

    Json(AppListResponse { stats, apps })
}

async fn load_deployments(state: &AppState, app_id: &str) -> Vec<Deployment> {
    fetch_deployments(&state.registry, app_id)
        .await
        .into_records()
        .into_iter()
        .map(Deployment::from_record)
        .collect()
}

/// Every URL across the deployments, in the order they were listed
fn deployment_urls(deployments: &[Deployment]) -> Vec<String> {
    deployments
        .iter()
        .flat_map(|deployment| deployment.urls.iter().cloned())
        .collect()
}

async fn get_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Json<AppDetailResponse> {
    let deployments = load_deployments(&state, &id).await;
    let url_status = state.prober.check_all(&deployment_urls(&deployments)).await;

    Json(AppDetailResponse {
        id,
        app: AppMetadata::from(params),
        deployments: deployments.into_iter().map(DeploymentView::from).collect(),
        url_status,
    })
}

/// Streams the status map as it fills in: the first event has every URL
/// `checking`, the last has every URL settled.
async fn stream_url_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let urls = deployment_urls(&load_deployments(&state, &id).await);
    let (board, statuses) = UrlProber::status_board(&urls);

    // Probing stops if the client goes away before it finishes
    let cancel = CancellationToken::new();
    let events = status_events(statuses, cancel.clone().drop_guard());
    let prober = state.prober.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = prober.probe_all(&urls, &board) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("URL probe for {} cancelled", id);
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn status_events(
    mut statuses: watch::Receiver<UrlStatusMap>,
    guard: DropGuard,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    // Taken before probing starts, so the all-`checking` map is always sent
    let initial = statuses.borrow_and_update().clone();

    stream::unfold(Some((statuses, guard, Some(initial))), |state| async move {
        let Some((mut statuses, guard, pending)) = state else {
            return None;
        };

        let snapshot = match pending {
            Some(initial) => initial,
            None => {
                if statuses.changed().await.is_err() {
                    return None;
                }
                statuses.borrow_and_update().clone()
            }
        };

        let event = Event::default().event("status").json_data(&snapshot);
        let next = if all_settled(&snapshot) {
            None
        } else {
            Some((statuses, guard, None))
        };
        Some((event, next))
    })
}
