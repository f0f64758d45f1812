//! Service configuration from environment variables

use tracing::warn;

use crate::core::models::{self, MAX_TEXT_LENGTH, PRIORITY_LANGUAGES};

/// Configuration for the translation service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address for the HTTP server
    pub host: String,
    /// Listen port for the HTTP server
    pub port: u16,
    /// Endpoint of the model runtime hosting the OPUS-MT models
    pub runtime_endpoint: String,
    /// Per-request timeout against the model runtime
    pub timeout_ms: u64,
    /// Maximum accepted input length in characters
    pub max_text_length: usize,
    /// Languages loaded eagerly before the service accepts requests
    pub priority_languages: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            runtime_endpoint: "http://127.0.0.1:8090".to_string(),
            timeout_ms: 30000,
            max_text_length: MAX_TEXT_LENGTH,
            priority_languages: PRIORITY_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| defaults.port.to_string())
            .parse::<u16>()?;

        let runtime_endpoint =
            std::env::var("RUNTIME_ENDPOINT").unwrap_or(defaults.runtime_endpoint);

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| defaults.timeout_ms.to_string())
            .parse::<u64>()?;

        let max_text_length = std::env::var("MAX_TEXT_LENGTH")
            .unwrap_or_else(|_| defaults.max_text_length.to_string())
            .parse::<usize>()?;

        let priority_languages = match std::env::var("PRIORITY_LANGUAGES") {
            Ok(value) => parse_language_list(&value),
            Err(_) => defaults.priority_languages,
        };

        Ok(Self {
            host,
            port,
            runtime_endpoint,
            timeout_ms,
            max_text_length,
            priority_languages,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.runtime_endpoint.is_empty() {
            return Err(anyhow::anyhow!("runtime endpoint is required"));
        }

        if self.max_text_length == 0 {
            return Err(anyhow::anyhow!("max_text_length must be greater than 0"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("request timeout must be greater than 0"));
        }

        for code in &self.priority_languages {
            if !models::is_supported(code) {
                warn!(code = code.as_str(), "priority language not in catalog, it will fail to preload");
            }
        }

        Ok(())
    }
}

/// Parse a comma-separated language list, dropping empty entries
fn parse_language_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
