//! Application configuration.
//!
//! Layered from built-in defaults, a TOML file and `QUIZDESK__`-prefixed
//! environment variables (`QUIZDESK__SESSION_API__BASE_URL=...`).

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File, FileFormat};
use log::info;
use serde::{Deserialize, Serialize};

use crate::queue::{EventPublisher, HttpQueuePublisher, LogPublisher, QueueConfig};
use crate::session::pagination::DEFAULT_PAGE_SIZE;
use crate::sessions::SessionApiConfig;

pub const APP_NAME: &str = "quizdesk";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub session_api: SessionApiSettings,
    pub queue: QueueSettings,
    pub table: TableConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no verbosity flag is given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Upstream session API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionApiSettings {
    /// Base URL, e.g. "https://api.example.org/api".
    pub base_url: String,
    /// Bearer token. Prefer setting it through `QUIZDESK__SESSION_API__TOKEN`.
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Platform filter applied to table listings.
    pub platform: String,
}

impl Default for SessionApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            token: None,
            timeout_secs: 30,
            platform: "quiz".to_string(),
        }
    }
}

impl SessionApiSettings {
    pub fn client_config(&self) -> SessionApiConfig {
        SessionApiConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Queue gateway settings. Without an endpoint, events are only logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            timeout_secs: 10,
        }
    }
}

impl QueueSettings {
    /// The configured publisher, or a logging one when no endpoint is set.
    pub fn publisher(&self) -> Result<Arc<dyn EventPublisher>> {
        let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else {
            info!("No queue endpoint configured, session events will only be logged");
            return Ok(Arc::new(LogPublisher));
        };
        let publisher = HttpQueuePublisher::new(QueueConfig {
            endpoint: endpoint.trim().to_string(),
            token: self.token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
        .context("configuring queue publisher")?;
        info!("Publishing session events to {}", publisher.endpoint());
        Ok(Arc::new(publisher))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page when a request does not pick a size.
    pub default_per_page: u32,
    /// Minutes an untouched wizard draft is kept.
    pub draft_ttl_minutes: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PAGE_SIZE,
            draft_ttl_minutes: 360,
        }
    }
}

impl TableConfig {
    pub fn draft_ttl(&self) -> Duration {
        Duration::from_secs(self.draft_ttl_minutes.saturating_mul(60))
    }
}

/// Prefix for environment overrides.
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Load configuration from `path` (optional) and the environment.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let env_prefix = env_prefix();
    let built = Config::builder()
        .add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(env_prefix.as_str()).separator("__"))
        .build()
        .with_context(|| format!("reading config from {}", path.display()))?;

    let config: AppConfig = built
        .try_deserialize()
        .context("parsing configuration")?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if !crate::session::pagination::PAGE_SIZE_OPTIONS.contains(&self.table.default_per_page) {
            return Err(anyhow!(
                "table.default_per_page must be one of {:?}, got {}",
                crate::session::pagination::PAGE_SIZE_OPTIONS,
                self.table.default_per_page
            ));
        }
        if self.session_api.platform.trim().is_empty() {
            return Err(anyhow!("session_api.platform must not be empty"));
        }
        Ok(())
    }
}

/// Write the default configuration to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {parent:?}"))?;
    }

    let config = AppConfig::default();
    let toml = toml::to_string_pretty(&config).context("serializing default config to TOML")?;
    let mut body = default_config_header(path);
    body.push_str(&toml);
    fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}

fn default_config_header(path: &Path) -> String {
    format!(
        "# Configuration for {APP_NAME}\n# File: {}\n\n",
        path.display()
    )
}
