use std::collections::BTreeMap;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use shared::types::UrlStatus;
use tokio::sync::watch;

/// Probe state per literal URL string; duplicate URLs share one entry
pub type UrlStatusMap = BTreeMap<String, UrlStatus>;

/// Classifies URLs as reachable or not with header-only requests
#[derive(Clone)]
pub struct UrlProber {
    http: reqwest::Client,
    concurrency: usize,
}

impl UrlProber {
    /// `concurrency` bounds probes in flight; 1 probes one URL at a time in source order
    pub fn new(concurrency: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("app-dashboardd/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build probe HTTP client")?;

        Ok(Self {
            http,
            concurrency: concurrency.max(1),
        })
    }

    /// HEAD `url`; any transport failure or non-2xx status counts as unavailable
    pub async fn is_available(&self, url: &str) -> bool {
        match self.http.head(url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                tracing::debug!("Probe {} -> {}", url, response.status());
                ok
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", url, e);
                false
            }
        }
    }

    /// A status board with every URL marked `checking`
    pub fn status_board(urls: &[String]) -> (watch::Sender<UrlStatusMap>, watch::Receiver<UrlStatusMap>) {
        let initial = urls
            .iter()
            .map(|url| (url.clone(), UrlStatus::Checking))
            .collect();
        watch::channel(initial)
    }

    /// Probe every URL, publishing each result to `board` as soon as it is known
    pub async fn probe_all(&self, urls: &[String], board: &watch::Sender<UrlStatusMap>) {
        let mut results = stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let status = if self.is_available(&url).await {
                    UrlStatus::Available
                } else {
                    UrlStatus::Unavailable
                };
                (url, status)
            })
            .buffer_unordered(self.concurrency);

        while let Some((url, status)) = results.next().await {
            board.send_modify(|map| {
                map.insert(url, status);
            });
        }
    }

    /// Probe every URL and return the settled map
    pub async fn check_all(&self, urls: &[String]) -> UrlStatusMap {
        let (board, statuses) = Self::status_board(urls);
        self.probe_all(urls, &board).await;
        let settled = statuses.borrow().clone();
        settled
    }
}

pub fn all_settled(map: &UrlStatusMap) -> bool {
    map.values().all(|status| status.is_terminal())
}
