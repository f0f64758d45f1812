//! Translation engine capability and its HTTP-backed implementation

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// A loaded engine translating English into one fixed target language
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate `text`, bounding the output to `max_output_length` units and
    /// truncating on overflow when `truncate` is set.
    async fn infer(&self, text: &str, max_output_length: usize, truncate: bool) -> Result<String>;
}

/// Capability that materializes an engine from its catalog identifier
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self, engine_identifier: &str) -> Result<Arc<dyn TranslationEngine>>;
}

/// Engine loader backed by a local model-runtime HTTP endpoint.
///
/// The runtime hosts the OPUS-MT models; loading a language asks it to make
/// the model resident, inference posts text against the resident model.
#[derive(Debug, Clone)]
pub struct HttpEngineLoader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEngineLoader {
    /// Create a loader against the given runtime endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl EngineLoader for HttpEngineLoader {
    async fn load(&self, engine_identifier: &str) -> Result<Arc<dyn TranslationEngine>> {
        let body = serde_json::json!({ "model": engine_identifier });

        let response = self
            .client
            .post(format!("{}/models/load", self.endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        debug!(model = engine_identifier, "runtime reported model resident");

        Ok(Arc::new(HttpEngine {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            model: engine_identifier.to_string(),
        }))
    }
}

/// Handle to a model made resident in the runtime
#[derive(Debug, Clone)]
struct HttpEngine {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[async_trait]
impl TranslationEngine for HttpEngine {
    async fn infer(&self, text: &str, max_output_length: usize, truncate: bool) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "text": text,
            "max_length": max_output_length,
            "truncation": truncate,
        });

        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse {
                message: e.to_string(),
            })?;

        let translation = json["translation_text"]
            .as_str()
            .ok_or_else(|| TranslationError::InvalidResponse {
                message: "no translation_text in response".to_string(),
            })?
            .to_string();

        Ok(translation)
    }
}
