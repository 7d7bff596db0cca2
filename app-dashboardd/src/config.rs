use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::Deserialize;

/// Environment variable that overrides `[registry] endpoint`
pub const ENDPOINT_ENV: &str = "REGISTRY_GQL_ENDPOINT";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/app-dashboard/dashboard.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// GraphQL endpoint of the records registry
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Number of reachability probes in flight at once; 1 probes sequentially
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_listen() -> String {
    "[::]:8080".to_string()
}

fn default_concurrency() -> usize {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an explicit path, or from the default path when it exists.
    /// Without either, every setting takes its default.
    pub fn load_or_default(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Apply the endpoint from the environment, if one was provided
    pub fn override_endpoint(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.registry.endpoint = Some(endpoint.trim().to_string());
        }
    }

    /// The upstream endpoint is required before any fetch can happen,
    /// so a missing or malformed one fails startup.
    pub fn registry_endpoint(&self) -> Result<Url> {
        let Some(raw) = self.registry.endpoint.as_deref() else {
            bail!(
                "registry endpoint is not configured; set {} or [registry] endpoint",
                ENDPOINT_ENV
            );
        };

        let url = Url::parse(raw)
            .with_context(|| format!("Invalid registry endpoint: {}", raw))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("registry endpoint must use http or https: {}", raw);
        }

        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe.concurrency == 0 {
            bail!("probe.concurrency must be > 0");
        }
        self.registry_endpoint()?;
        Ok(())
    }
}
