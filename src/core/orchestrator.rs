//! Multi-language fan-out translation

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::errors::TranslationError;
use crate::core::models::{TranslationResult, MAX_OUTPUT_LENGTH, MAX_TEXT_LENGTH};
use crate::core::registry::EngineRegistry;

/// Localized variants of the framing prefix some engines echo back in front
/// of the translation. At most one is stripped, then the result is trimmed.
const CONTEXT_PREFIXES: &[&str] = &[
    "System monitoring alert: ",
    "Systemüberwachungsalarm: ",               // German
    "Alerta de monitoreo del sistema: ",       // Spanish
    "Alerte de surveillance du système : ",    // French
    "Avviso di monitoraggio del sistema: ",    // Italian
    "Alerta de monitoramento do sistema: ",    // Portuguese
    "Systeembewakingswaarschuwing: ",          // Dutch
    "Системное предупреждение мониторинга: ",  // Russian
    "系统监控警报：",                           // Chinese
    "システム監視アラート：",                    // Japanese
    "시스템 모니터링 경고: ",                    // Korean
];

/// Orchestrates translation of one message into many languages
pub struct Translator {
    registry: Arc<EngineRegistry>,
    max_text_length: usize,
}

impl Translator {
    /// Create a translator over the given engine registry
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self {
            registry,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }

    /// Override the input truncation bound
    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// The engine registry backing this translator
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Translate `text` into each target language, in the given order.
    ///
    /// The result always contains the source-language entry. Per-language
    /// failures never abort the batch: a language whose engine cannot be
    /// loaded maps to an unavailability marker, a language whose engine fails
    /// on this input maps to the untranslated source text.
    pub async fn translate(
        &self,
        text: &str,
        target_languages: &[String],
        source_language: &str,
    ) -> TranslationResult {
        let mut translations = TranslationResult::new();
        translations.insert(source_language.to_string(), text.to_string());

        let batch_start = Instant::now();

        for code in target_languages {
            if code == source_language {
                continue;
            }

            let lang_start = Instant::now();

            if let Err(e) = self.registry.ensure_loaded(code).await {
                warn!(code = code.as_str(), error = %e, "engine unavailable, storing marker");
                translations.insert(code.clone(), unavailable_marker(code));
                continue;
            }

            let Some(engine) = self.registry.engine(code).await else {
                // ensure_loaded succeeded, so this should be unreachable
                translations.insert(code.clone(), unavailable_marker(code));
                continue;
            };

            let bounded = truncate_chars(text, self.max_text_length);
            match engine.infer(bounded, MAX_OUTPUT_LENGTH, true).await {
                Ok(raw) => {
                    let cleaned = strip_context_prefix(&raw);
                    debug!(
                        code = code.as_str(),
                        elapsed_ms = lang_start.elapsed().as_millis() as u64,
                        "translated"
                    );
                    translations.insert(code.clone(), cleaned);
                }
                Err(e) => {
                    let err = TranslationError::InferenceError {
                        code: code.clone(),
                        message: e.to_string(),
                    };
                    warn!(error = %err, "inference failed, falling back to source text");
                    translations.insert(code.clone(), text.to_string());
                }
            }
        }

        info!(
            languages = target_languages.len(),
            elapsed_ms = batch_start.elapsed().as_millis() as u64,
            "translation batch complete"
        );

        translations
    }
}

/// Sentinel stored in place of a translation when no engine could be loaded
pub fn unavailable_marker(code: &str) -> String {
    format!("[Translation unavailable for {code}]")
}

/// Strip at most one leading context-prefix variant, then trim whitespace
fn strip_context_prefix(raw: &str) -> String {
    for prefix in CONTEXT_PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return rest.trim().to_string();
        }
    }
    raw.trim().to_string()
}

/// Truncate to a character count without splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::core::engine::{EngineLoader, TranslationEngine};
    use crate::core::errors::{Result, TranslationError};

    /// Engine returning one canned string regardless of input
    struct CannedEngine {
        response: Option<String>,
    }

    #[async_trait]
    impl TranslationEngine for CannedEngine {
        async fn infer(&self, text: &str, _max: usize, _truncate: bool) -> Result<String> {
            match &self.response {
                Some(response) => Ok(response.clone()),
                // None means "echo", used to observe input truncation
                None => Ok(text.to_string()),
            }
        }
    }

    /// Loader serving canned responses per engine identifier
    struct CannedLoader {
        responses: HashMap<String, Option<String>>,
        broken: bool,
    }

    impl CannedLoader {
        fn with_response(identifier: &str, response: &str) -> Self {
            let mut responses = HashMap::new();
            responses.insert(identifier.to_string(), Some(response.to_string()));
            Self { responses, broken: false }
        }

        fn echoing() -> Self {
            Self { responses: HashMap::new(), broken: false }
        }

        fn broken() -> Self {
            Self { responses: HashMap::new(), broken: true }
        }
    }

    #[async_trait]
    impl EngineLoader for CannedLoader {
        async fn load(&self, engine_identifier: &str) -> Result<Arc<dyn TranslationEngine>> {
            if self.broken {
                return Err(TranslationError::ConfigError {
                    message: "runtime offline".to_string(),
                });
            }
            let response = self.responses.get(engine_identifier).cloned().flatten();
            Ok(Arc::new(CannedEngine { response }))
        }
    }

    /// Engine that always fails inference; its loader always succeeds
    struct FailingEngine;

    #[async_trait]
    impl TranslationEngine for FailingEngine {
        async fn infer(&self, _text: &str, _max: usize, _truncate: bool) -> Result<String> {
            Err(TranslationError::InvalidResponse {
                message: "decoder exploded".to_string(),
            })
        }
    }

    struct FailingEngineLoader;

    #[async_trait]
    impl EngineLoader for FailingEngineLoader {
        async fn load(&self, _engine_identifier: &str) -> Result<Arc<dyn TranslationEngine>> {
            Ok(Arc::new(FailingEngine))
        }
    }

    fn translator(loader: impl EngineLoader + 'static) -> Translator {
        Translator::new(Arc::new(EngineRegistry::new(Arc::new(loader))))
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_translate_seeds_source_and_strips_prefix() {
        let loader = CannedLoader::with_response(
            "Helsinki-NLP/opus-mt-en-de",
            "System monitoring alert: Server ist ausgefallen",
        );
        let translator = translator(loader);

        let result = translator.translate("Server is down", &langs(&["de"]), "en").await;

        assert_eq!(result["en"], "Server is down");
        assert_eq!(result["de"], "Server ist ausgefallen");
    }

    #[tokio::test]
    async fn test_translate_strips_localized_prefix_and_trims() {
        let loader = CannedLoader::with_response(
            "Helsinki-NLP/opus-mt-en-fr",
            "Alerte de surveillance du système : Serveur arrêté ",
        );
        let translator = translator(loader);

        let result = translator.translate("Server is down", &langs(&["fr"]), "en").await;
        assert_eq!(result["fr"], "Serveur arrêté");
    }

    #[tokio::test]
    async fn test_translate_strips_at_most_one_prefix() {
        let loader = CannedLoader::with_response(
            "Helsinki-NLP/opus-mt-en-de",
            "System monitoring alert: Systemüberwachungsalarm: doppelt",
        );
        let translator = translator(loader);

        let result = translator.translate("twice", &langs(&["de"]), "en").await;
        assert_eq!(result["de"], "Systemüberwachungsalarm: doppelt");
    }

    #[tokio::test]
    async fn test_translate_load_failure_stores_marker() {
        let translator = translator(CannedLoader::broken());

        let result = translator.translate("Server is down", &langs(&["de"]), "en").await;

        assert_eq!(result["en"], "Server is down");
        assert_eq!(result["de"], "[Translation unavailable for de]");
    }

    #[tokio::test]
    async fn test_translate_unknown_code_stores_marker() {
        let translator = translator(CannedLoader::echoing());

        let result = translator.translate("Server is down", &langs(&["xx"]), "en").await;
        assert_eq!(result["xx"], "[Translation unavailable for xx]");
    }

    #[tokio::test]
    async fn test_translate_inference_failure_falls_back_to_source_text() {
        let translator = translator(FailingEngineLoader);

        let result = translator.translate("Server is down", &langs(&["de"]), "en").await;

        // Distinct from the load-failure policy: the original text, unmarked
        assert_eq!(result["de"], "Server is down");
    }

    #[tokio::test]
    async fn test_translate_skips_source_language() {
        let translator = translator(CannedLoader::echoing());

        let result = translator.translate("Server is down", &langs(&["en", "de"]), "en").await;

        assert_eq!(result.len(), 2);
        assert_eq!(result["en"], "Server is down");
    }

    #[tokio::test]
    async fn test_translate_truncates_input() {
        let translator = translator(CannedLoader::echoing()).with_max_text_length(5);

        let result = translator.translate("hello world", &langs(&["de"]), "en").await;

        // The echo engine sees only the bounded input
        assert_eq!(result["de"], "hello");
        // The source entry keeps the full original
        assert_eq!(result["en"], "hello world");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("übermäßig", 4), "über");
        assert_eq!(truncate_chars("ok", 10), "ok");
    }
}
