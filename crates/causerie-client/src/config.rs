//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration against a local development service.

use causerie_shared::constants::MESSAGE_TABLE;

/// Hosted-service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the hosted message service (REST).
    /// Env: `CAUSERIE_SERVICE_URL`
    /// Default: `http://localhost:3000`
    pub base_url: String,

    /// API key sent as the `apikey` header and bearer token.
    /// Env: `CAUSERIE_SERVICE_KEY`
    /// Default: none (development only).
    pub api_key: Option<String>,

    /// Name of the message table exposed by the service.
    /// Env: `CAUSERIE_MESSAGE_TABLE`
    /// Default: `"message"`
    pub table: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            table: MESSAGE_TABLE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("CAUSERIE_SERVICE_URL") {
            if url.is_empty() {
                tracing::warn!("Empty CAUSERIE_SERVICE_URL, using default");
            } else {
                config.base_url = url;
            }
        }

        if let Ok(key) = std::env::var("CAUSERIE_SERVICE_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }

        if let Ok(table) = std::env::var("CAUSERIE_MESSAGE_TABLE") {
            if !table.is_empty() {
                config.table = table;
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
