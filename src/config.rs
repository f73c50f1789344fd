//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "salon.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_client_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_client_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here since tracing is configured from the result;
    /// call [`ConfigSource::log`] once it is initialised.
    pub fn load_default() -> (Self, ConfigSource) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("salon").join("config.toml")),
            Some(PathBuf::from("/etc/salon/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file that parses, remembering the ones that failed
    fn load_first(paths: &[PathBuf]) -> (Self, ConfigSource) {
        let mut failures = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    let source = ConfigSource {
                        path: Some(path.clone()),
                        failures,
                    };
                    return (config, source);
                }
                Err(e) => failures.push(e),
            }
        }

        (Self::from_env(), ConfigSource { path: None, failures })
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides (DATABASE_PATH kept for existing deployments)
        if let Some(path) = var("SALON_DATABASE_PATH").or_else(|| var("DATABASE_PATH")) {
            self.database.path = path;
        }

        // API overrides
        if let Some(host) = var("SALON_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("SALON_API_PORT").or_else(|| var("PORT")) {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(origins) = var("SALON_CORS_ORIGINS") {
            self.api.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        // Client overrides
        if let Some(url) = var("SALON_API_URL") {
            self.client.api_url = url;
        }

        // Logging overrides
        if let Some(level) = var("SALON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SALON_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Outcome of [`Config::load_default`]
#[derive(Debug, Default)]
pub struct ConfigSource {
    /// File the configuration came from; `None` means defaults plus environment
    pub path: Option<PathBuf>,
    /// Files that exist but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl ConfigSource {
    /// Report where the configuration came from
    pub fn log(&self) {
        for failure in &self.failures {
            tracing::warn!(error = %failure, "Failed to load config, skipping");
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

/// Initialize the tracing subscriber from logging settings
///
/// `{level}` in `default_directives` is replaced by the configured level.
/// `RUST_LOG` wins over both when set. Output goes to stderr.
pub fn init_tracing(logging: &LoggingConfig, default_directives: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directives.replace("{level}", &logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Salon Configuration
#
# Environment variables override these settings:
# - SALON_DATABASE_PATH (or DATABASE_PATH)
# - SALON_API_HOST
# - SALON_API_PORT (or PORT)
# - SALON_CORS_ORIGINS (comma-separated)
# - SALON_API_URL
# - SALON_LOG_LEVEL
# - SALON_LOG_FORMAT

[database]
# SQLite database file
path = "salon.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8000

# Allowed CORS origins (empty = any origin)
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

# Request timeout in seconds
request_timeout_secs = 30

[client]
# REST API base URL used by the salon CLI
api_url = "http://localhost:8000/api"

# Request timeout in seconds
timeout_secs = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
