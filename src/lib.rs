//! Alert Translator - multilingual translation service for monitoring messages
//!
//! Classifies English monitoring messages into severity categories and fans
//! them out to per-language translation engines. Engines are loaded lazily,
//! at most once per language, and stay resident for the process lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::config::ServiceConfig;
pub use crate::core::{
    classifier::classify,
    engine::{EngineLoader, HttpEngineLoader, TranslationEngine},
    errors::TranslationError,
    models::{Category, LanguageSpec, TranslationResult, LANGUAGE_CATALOG, PRIORITY_LANGUAGES},
    orchestrator::Translator,
    registry::EngineRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
