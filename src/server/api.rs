//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::core::classifier::classify;
use crate::core::engine::HttpEngineLoader;
use crate::core::models::{self, Category, TranslationResult, LANGUAGE_CATALOG, PRIORITY_LANGUAGES};
use crate::core::orchestrator::Translator;
use crate::core::registry::EngineRegistry;

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: Arc<Translator>,
    max_text_length: usize,
}

/// Translation request; `text` is either a plain message or a JSON document
/// whose string leaves are translated recursively
#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: Value,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

/// Response for plain-message translation
#[derive(Serialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub original_text: String,
    pub detected_category: Category,
    pub translations: TranslationResult,
    pub json_output: String,
    pub target_languages: Vec<String>,
    pub timestamp: String,
}

/// Response for JSON-document translation
#[derive(Serialize)]
pub struct TreeTranslateResponse {
    pub success: bool,
    pub original_json: Value,
    pub translations: Value,
    pub target_languages: Vec<String>,
    pub timestamp: String,
}

/// Language catalog response
#[derive(Serialize)]
struct LanguagesResponse {
    supported_languages: BTreeMap<&'static str, LanguageInfo>,
    loaded_models: Vec<String>,
    priority_languages: Vec<&'static str>,
    total_available: usize,
    total_loaded: usize,
}

#[derive(Serialize)]
struct LanguageInfo {
    name: &'static str,
    model: &'static str,
}

/// Health check response
#[derive(Serialize)]
struct StatusResponse {
    status: String,
    version: String,
    models_loaded: usize,
    supported_languages: usize,
    available_models: Vec<String>,
    auto_category_detection: bool,
    json_format: bool,
    timestamp: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
}

/// Validate a plain text input against the length contract
fn validate_text(text: &str, max_text_length: usize) -> Result<(), String> {
    if text.is_empty() {
        return Err("No text provided for translation".to_string());
    }
    if text.chars().count() > max_text_length {
        return Err(format!(
            "Text exceeds maximum length of {max_text_length} characters"
        ));
    }
    Ok(())
}

/// Codes in `languages` that are neither the source language nor catalogued
fn invalid_codes(languages: &[String]) -> Vec<String> {
    languages
        .iter()
        .filter(|code| code.as_str() != models::SOURCE_LANGUAGE && !models::is_supported(code))
        .cloned()
        .collect()
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Core translation handler for monitoring messages
async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let target_languages = payload.languages.unwrap_or_else(models::catalog_codes);

    let unknown = invalid_codes(&target_languages);
    if !unknown.is_empty() {
        warn!(codes = unknown.join(",").as_str(), "request with invalid language codes");
        return Err(bad_request(format!(
            "Invalid language codes: {}",
            unknown.join(", ")
        )));
    }

    // JSON mode: translate every string leaf, preserving structure
    if payload.text.is_object() {
        let translations = state
            .translator
            .translate_tree(&payload.text, &target_languages)
            .await;

        return Ok(Json(TreeTranslateResponse {
            success: true,
            original_json: payload.text,
            translations,
            target_languages,
            timestamp: timestamp(),
        })
        .into_response());
    }

    let Value::String(raw) = payload.text else {
        return Err(bad_request("Field 'text' must be a string or a JSON object"));
    };

    let text = raw.trim();
    if let Err(message) = validate_text(text, state.max_text_length) {
        warn!("rejected translation request: {message}");
        return Err(bad_request(message));
    }

    let detected_category = classify(text);
    info!(category = %detected_category, "translation request");

    let translations = state
        .translator
        .translate(text, &target_languages, models::SOURCE_LANGUAGE)
        .await;

    let json_output =
        serde_json::to_string_pretty(&translations).unwrap_or_else(|_| "{}".to_string());

    Ok(Json(TranslateResponse {
        success: true,
        original_text: text.to_string(),
        detected_category,
        translations,
        json_output,
        target_languages,
        timestamp: timestamp(),
    })
    .into_response())
}

/// Language catalog and load status handler
async fn languages_handler(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    let supported_languages: BTreeMap<&'static str, LanguageInfo> = LANGUAGE_CATALOG
        .iter()
        .map(|spec| {
            (
                spec.code,
                LanguageInfo {
                    name: spec.display_name,
                    model: spec.engine_identifier,
                },
            )
        })
        .collect();

    let loaded_models = state.translator.registry().loaded_codes().await;

    Json(LanguagesResponse {
        total_available: supported_languages.len(),
        total_loaded: loaded_models.len(),
        supported_languages,
        loaded_models,
        priority_languages: PRIORITY_LANGUAGES.to_vec(),
    })
}

/// Health check handler
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let available_models = state.translator.registry().loaded_codes().await;

    Json(StatusResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models_loaded: available_models.len(),
        supported_languages: LANGUAGE_CATALOG.len(),
        available_models,
        auto_category_detection: true,
        json_format: true,
        timestamp: timestamp(),
    })
}

/// Build the router for the given application state
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/translate", post(translate_handler))
        .route("/api/languages", get(languages_handler))
        .route("/api/status", get(status_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server: preload priority engines, then serve requests
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let loader = Arc::new(HttpEngineLoader::new(
        &config.runtime_endpoint,
        Duration::from_millis(config.timeout_ms),
    )?);
    let registry = Arc::new(EngineRegistry::new(loader));

    info!(
        "preloading priority languages: {}",
        config.priority_languages.join(", ")
    );
    let failed = registry.preload(&config.priority_languages).await;
    if !failed.is_empty() {
        warn!("failed to preload: {}", failed.join(", "));
    }

    let translator = Arc::new(
        Translator::new(registry).with_max_text_length(config.max_text_length),
    );

    let state = Arc::new(AppState {
        translator,
        max_text_length: config.max_text_length,
    });

    // Restrict CORS to the web frontend origins
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = router(state, cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
