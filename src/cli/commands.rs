//! CLI command definitions and handlers

use clap::Subcommand;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::ServiceConfig;
use crate::core::classifier::classify;
use crate::core::engine::HttpEngineLoader;
use crate::core::errors::TranslationError;
use crate::core::models::{self, LANGUAGE_CATALOG};
use crate::core::orchestrator::Translator;
use crate::core::registry::EngineRegistry;
use crate::server;

/// Commands for the alert translation service
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP translation service
    Serve {
        /// Bind address (default: from HOST env, else 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: from PORT env, else 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Translate a single monitoring message and print the language map
    Translate {
        /// The message to translate
        text: String,

        /// Target language codes (default: de, es)
        #[arg(short, long, value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Classify a monitoring message into a severity category
    Classify {
        /// The message to classify
        text: String,
    },

    /// List supported languages and their models
    Languages,
}

/// Handle the serve command
pub async fn handle_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    server::api::run_server(config).await
}

/// Handle one-shot translation from the command line
pub async fn handle_translate(text: String, languages: Vec<String>) -> anyhow::Result<()> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(TranslationError::EmptyInput.into());
    }

    let config = ServiceConfig::from_env()?;
    config.validate()?;

    let length = text.chars().count();
    if length > config.max_text_length {
        return Err(TranslationError::InputTooLong {
            length,
            max: config.max_text_length,
        }
        .into());
    }

    let target_languages = if languages.is_empty() {
        vec!["de".to_string(), "es".to_string()]
    } else {
        languages
    };

    for code in &target_languages {
        if code != models::SOURCE_LANGUAGE && !models::is_supported(code) {
            return Err(TranslationError::UnsupportedLanguage { code: code.clone() }.into());
        }
    }

    let loader = Arc::new(HttpEngineLoader::new(
        &config.runtime_endpoint,
        Duration::from_millis(config.timeout_ms),
    )?);
    let registry = Arc::new(EngineRegistry::new(loader));
    let translator = Translator::new(registry).with_max_text_length(config.max_text_length);

    let category = classify(&text);
    info!(category = %category, "message classified");

    let translations = translator
        .translate(&text, &target_languages, models::SOURCE_LANGUAGE)
        .await;

    println!("category: {category}");
    println!("{}", serde_json::to_string_pretty(&translations)?);

    Ok(())
}

/// Handle the classify command
pub fn handle_classify(text: String) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("no text provided for classification");
    }
    println!("{}", classify(&text));
    Ok(())
}

/// Handle the languages command
pub fn handle_languages() {
    println!("Supported languages (source: {}):", models::SOURCE_LANGUAGE);
    for spec in LANGUAGE_CATALOG {
        println!("  {:4} {:12} {}", spec.code, spec.display_name, spec.engine_identifier);
    }
}
