//! Configuration for the marquee server.
//!
//! Loaded from `config.toml` (or the file named by `MARQUEE_CONFIG`) with
//! environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::CatalogConfig;
use crate::discovery::DiscoveryOptions;
use crate::error::AppError;
use crate::recorder::AppwriteConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assets_dir: default_assets_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./assets")
}

/// Where search counts go
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecorderBackend {
    #[default]
    Memory,
    Appwrite,
    Disabled,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecorderConfig {
    #[serde(default)]
    pub backend: RecorderBackend,
    #[serde(default)]
    pub appwrite: AppwriteConfig,
}

/// Per-session tunables
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    /// Idle time before a session is evicted
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
            session_ttl_secs: default_session_ttl(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_trending_limit() -> usize {
    5
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_max_sessions() -> u64 {
    10_000
}

impl DiscoveryConfig {
    pub fn options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            trending_limit: self.trending_limit,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
    /// Write daily rolling files here instead of stdout
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "marquee=debug,tower_http=debug,axum=info,warn".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Sources, later overriding earlier:
    /// 1. Default values
    /// 2. The file named by `MARQUEE_CONFIG`, or `config.toml` (optional)
    /// 3. Environment variables with the `MARQUEE_` prefix
    ///
    /// Nesting uses a double underscore, so `MARQUEE_SERVER__PORT=9000`
    /// sets `server.port`.
    pub fn load() -> Result<Self, AppError> {
        let path = std::env::var("MARQUEE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("catalog.base_url", "https://api.themoviedb.org/3")?
            .set_default("catalog.image_base_url", "https://image.tmdb.org/t/p")?
            .set_default("catalog.timeout_secs", 30)?
            .set_default("discovery.debounce_ms", 500)?
            .set_default("discovery.trending_limit", 5)?
            .add_source(File::with_name(config_path).required(false))
            // MARQUEE_CATALOG__ACCESS_TOKEN=... -> catalog.access_token
            .add_source(
                Environment::with_prefix("MARQUEE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Settings that will leave features unavailable.
    ///
    /// Returned rather than logged: configuration is read before tracing is
    /// installed.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.catalog.has_access_token() {
            warnings.push(
                "Catalog access token not configured - catalog requests will fail".to_string(),
            );
        }

        if self.recorder.backend == RecorderBackend::Appwrite {
            let missing = self.recorder.appwrite.missing_fields();
            if !missing.is_empty() {
                warnings.push(format!(
                    "Appwrite recorder selected but missing: {}",
                    missing.join(", ")
                ));
            }
            if self.recorder.appwrite.api_key.is_none() {
                warnings.push("Appwrite API key not configured".to_string());
            }
        }

        if self.discovery.trending_limit == 0 {
            warnings.push(
                "discovery.trending_limit is 0 - the hero will always show the banner".to_string(),
            );
        }

        warnings
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};
        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.server.port)
    }
}
