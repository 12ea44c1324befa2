//! Configuration for the trade relay
//!
//! Sources are layered lowest to highest: built-in defaults, an optional
//! TOML file, `RELAY_*` environment variables (`__` separates sections, e.g.
//! `RELAY_SERVER__PORT`), and finally the bare `PORT` / `API_KEY` variables
//! used by existing terminal deployments.

use anyhow::{Result, bail};
use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment prefix for layered configuration
pub const ENV_PREFIX: &str = "RELAY";

/// Plain port variable honoured for compatibility
pub const PORT_ENV: &str = "PORT";

/// Plain shared secret variable honoured for compatibility
pub const API_KEY_ENV: &str = "API_KEY";

/// Trade relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Ingest authentication
    pub auth: AuthConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Dashboard front-end
    pub dashboard: DashboardConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable response compression
    pub compression: bool,
}

/// Shared-secret authentication for the ingest endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Pre-shared key the terminal must present. No default.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request header carrying the key
    pub header_name: String,
}

// Keeps the secret out of `{:?}` output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("header_name", &self.header_name)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Allow credentials
    pub allow_credentials: bool,
    /// Max age for preflight requests
    pub max_age_seconds: u64,
}

/// Dashboard front-end configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory of static assets. When unset the embedded page is served.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                timeout_seconds: 30,
                max_body_size: 10 * 1024 * 1024, // 10MB
                compression: true,
            },
            auth: AuthConfig {
                api_key: None,
                header_name: "x-api-key".to_string(),
            },
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec!["*".to_string()],
                allowed_methods: vec![
                    "GET".to_string(),
                    "POST".to_string(),
                    "OPTIONS".to_string(),
                ],
                allowed_headers: vec!["Content-Type".to_string(), "x-api-key".to_string()],
                allow_credentials: false,
                max_age_seconds: 86400, // 24 hours
            },
            dashboard: DashboardConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from file and the process environment
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading environment variables from `env` instead
    /// of the process environment when it is given
    pub fn load_with_env(path: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        let lookup = |key: &str| match &env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        let port_override = lookup(PORT_ENV);
        let api_key_override = lookup(API_KEY_ENV);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env.clone()),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;

        if let Some(port) = port_override {
            config.server.port = match port.trim().parse() {
                Ok(port) => port,
                Err(e) => bail!("Invalid {PORT_ENV} value '{port}': {e}"),
            };
        }
        if let Some(key) = api_key_override {
            config.auth.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server must not start with
    pub fn validate(&self) -> Result<()> {
        match self.auth.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => bail!(
                "No API key configured: set {API_KEY_ENV} or {ENV_PREFIX}_AUTH__API_KEY before starting"
            ),
        }
        if HeaderName::from_bytes(self.auth.header_name.as_bytes()).is_err() {
            bail!("Invalid auth header name '{}'", self.auth.header_name);
        }
        if self.server.timeout_seconds == 0 {
            bail!("server.timeout_seconds must be greater than zero");
        }
        if self.server.max_body_size == 0 {
            bail!("server.max_body_size must be greater than zero");
        }
        if self.cors.enabled
            && self.cors.allow_credentials
            && self.cors.allowed_origins.iter().any(|origin| origin == "*")
        {
            bail!("CORS credentials cannot be combined with a wildcard origin");
        }
        Ok(())
    }

    /// Get server address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
