use std::collections::HashSet;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
pub use config::ConfigError;
use serde::Deserialize;

use crate::errors::{ReportError, ReportResult};
use crate::report::Racer;

/// Main configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Racers in report order
    #[serde(default)]
    pub racers: Vec<Racer>,
    /// Trade cache connection
    #[serde(default)]
    pub cache: CacheConfig,
    /// Cloudflare KV publish target
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
    /// Page options
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Preview server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Redis connection URL
    #[serde(default = "default_cache_url")]
    pub url: String,
    /// Key prefix; records live under `<prefix>:<racer id>`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: default_cache_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_cache_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_key_prefix() -> String {
    "trades_cur".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub namespace_id: String,
    /// API token sent as a bearer credential.
    /// Prefer APP_CLOUDFLARE__API_TOKEN over the config file.
    #[serde(default)]
    pub api_token: String,
    /// KV key the page is stored under
    #[serde(default = "default_kv_key")]
    pub key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            namespace_id: String::new(),
            api_token: String::new(),
            key: default_kv_key(),
            api_base: default_api_base(),
        }
    }
}

impl CloudflareConfig {
    /// Workers KV "write key-value pair" endpoint
    pub fn values_url(&self) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{}",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.namespace_id,
            self.key
        )
    }
}

fn default_kv_key() -> String {
    "html".to_string()
}

fn default_api_base() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,
    /// Show the first racer's pane on load
    #[serde(default)]
    pub activate_first_tab: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            activate_first_tab: false,
        }
    }
}

fn default_title() -> String {
    "Portfolio - X".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server port (default 3000)
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Server host (default 127.0.0.1)
    #[serde(default = "default_server_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
        }
    }
}

fn default_server_port() -> u16 {
    3000
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

/// `APP_` prefix, `__` between nested keys, e.g. APP_CLOUDFLARE__API_TOKEN
fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Load settings from a configuration file
    ///
    /// A `.env` file, if present, is loaded into the process environment
    /// first so credentials can stay out of the file.
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Config::builder().add_source(File::with_name(config_path)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Self::build_with_env(builder, environment())
    }

    fn build_with_env(
        builder: ConfigBuilder<DefaultState>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        // Environment variables override the file
        builder.add_source(env).build()?.try_deserialize()
    }

    /// Check the racer list; labels become HTML anchors so they must be unique
    pub fn validate(&self) -> ReportResult<()> {
        let mut seen = HashSet::new();
        for racer in &self.racers {
            if racer.app.trim().is_empty() {
                return Err(ReportError::InvalidSettings(format!(
                    "racer {} has an empty app label",
                    racer.id
                )));
            }
            if !seen.insert(racer.app.as_str()) {
                return Err(ReportError::InvalidSettings(format!(
                    "duplicate racer label '{}'",
                    racer.app
                )));
            }
        }
        Ok(())
    }

    /// Check that the Cloudflare target is fully specified
    pub fn validate_for_publish(&self) -> ReportResult<()> {
        self.validate()?;
        let cf = &self.cloudflare;
        for (name, value) in [
            ("account_id", &cf.account_id),
            ("namespace_id", &cf.namespace_id),
            ("api_token", &cf.api_token),
            ("key", &cf.key),
        ] {
            if value.trim().is_empty() {
                return Err(ReportError::InvalidSettings(format!(
                    "cloudflare.{name} is not set"
                )));
            }
        }
        Ok(())
    }
}
