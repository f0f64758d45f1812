//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Language code not present in the static catalog
    #[error("unsupported language code: {code}")]
    UnsupportedLanguage {
        code: String,
    },

    /// Engine failed to initialize for a language
    #[error("engine load failed for '{code}': {message}")]
    LoadError {
        code: String,
        message: String,
    },

    /// Loaded engine failed on a specific input
    #[error("inference failed for '{code}': {message}")]
    InferenceError {
        code: String,
        message: String,
    },

    /// Empty input text
    #[error("no text provided for translation")]
    EmptyInput,

    /// Input text over the configured maximum
    #[error("text exceeds maximum length of {max} characters (got {length})")]
    InputTooLong {
        length: usize,
        max: usize,
    },

    /// Model runtime returned a non-success status
    #[error("runtime error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Invalid response from the model runtime
    #[error("invalid response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
