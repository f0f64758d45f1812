//! Lazy per-language engine cache
//!
//! Guarantees at most one resident engine per language code. Engines are
//! loaded on first demand and live for the process lifetime; there is no
//! unload operation.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::core::engine::{EngineLoader, TranslationEngine};
use crate::core::errors::{Result, TranslationError};
use crate::core::models;

/// Registry of loaded per-language translation engines
pub struct EngineRegistry {
    loader: Arc<dyn EngineLoader>,
    engines: RwLock<HashMap<String, Arc<dyn TranslationEngine>>>,
    // Per-code mutexes so concurrent ensure_loaded calls for one code
    // perform exactly one underlying load. Held across the loader await;
    // the outer std mutex is only held to fetch the entry.
    load_locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EngineRegistry {
    /// Create a registry with an injected loader capability
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            loader,
            engines: RwLock::new(HashMap::new()),
            load_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Check whether an engine for `code` is resident
    pub async fn is_loaded(&self, code: &str) -> bool {
        self.engines.read().await.contains_key(code)
    }

    /// Snapshot of the resident language codes, sorted
    pub async fn loaded_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.engines.read().await.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Get the resident engine for `code`, if any
    pub async fn engine(&self, code: &str) -> Option<Arc<dyn TranslationEngine>> {
        self.engines.read().await.get(code).cloned()
    }

    /// Load the engine for `code` unless it is already resident.
    ///
    /// On failure the registry is unchanged; the caller decides whether to
    /// retry. Unknown codes fail without invoking the loader.
    pub async fn ensure_loaded(&self, code: &str) -> Result<()> {
        if self.engines.read().await.contains_key(code) {
            debug!(code, "engine already resident");
            return Ok(());
        }

        let spec = models::find_language(code).ok_or_else(|| {
            TranslationError::UnsupportedLanguage {
                code: code.to_string(),
            }
        })?;

        let lock = self.load_lock(code);
        let _guard = lock.lock().await;

        // Another request may have finished the load while we waited
        if self.engines.read().await.contains_key(code) {
            debug!(code, "engine loaded by concurrent request");
            return Ok(());
        }

        info!(
            code,
            model = spec.engine_identifier,
            "loading {} engine on demand",
            spec.display_name
        );

        let engine = self
            .loader
            .load(spec.engine_identifier)
            .await
            .map_err(|e| TranslationError::LoadError {
                code: code.to_string(),
                message: e.to_string(),
            })?;

        self.engines.write().await.insert(code.to_string(), engine);
        info!(code, "engine resident");
        Ok(())
    }

    /// Load each code in order, continuing past individual failures.
    ///
    /// Returns the codes that failed to load. Used at startup for the
    /// priority languages before the service accepts requests.
    pub async fn preload<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        let mut failed = Vec::new();

        for code in codes {
            let code = code.as_ref();
            if let Err(e) = self.ensure_loaded(code).await {
                warn!(code, error = %e, "preload failed");
                failed.push(code.to_string());
            }
        }

        let resident = self.engines.read().await.len();
        info!(resident, failed = failed.len(), "preload complete");
        failed
    }

    fn load_lock(&self, code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.load_locks.lock().unwrap();
        locks
            .entry(code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoEngine;

    #[async_trait]
    impl TranslationEngine for EchoEngine {
        async fn infer(&self, text: &str, _max: usize, _truncate: bool) -> Result<String> {
            Ok(text.to_string())
        }
    }

    /// Counts load invocations; fails for identifiers in `fail_for`
    struct CountingLoader {
        loads: AtomicUsize,
        fail_for: HashSet<String>,
        delay: Option<Duration>,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_for: HashSet::new(),
                delay: None,
            }
        }

        fn failing_for(identifiers: &[&str]) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_for: identifiers.iter().map(|s| s.to_string()).collect(),
                delay: None,
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_for: HashSet::new(),
                delay: Some(delay),
            }
        }

        fn count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EngineLoader for CountingLoader {
        async fn load(&self, engine_identifier: &str) -> Result<Arc<dyn TranslationEngine>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_for.contains(engine_identifier) {
                return Err(TranslationError::ConfigError {
                    message: format!("model {engine_identifier} not available"),
                });
            }
            Ok(Arc::new(EchoEngine))
        }
    }

    #[tokio::test]
    async fn test_ensure_loaded_is_idempotent() {
        let loader = Arc::new(CountingLoader::new());
        let registry = EngineRegistry::new(loader.clone());

        registry.ensure_loaded("de").await.unwrap();
        registry.ensure_loaded("de").await.unwrap();

        assert_eq!(loader.count(), 1);
        assert!(registry.is_loaded("de").await);
        assert_eq!(registry.loaded_codes().await, vec!["de".to_string()]);
    }

    #[tokio::test]
    async fn test_ensure_loaded_unknown_code() {
        let loader = Arc::new(CountingLoader::new());
        let registry = EngineRegistry::new(loader.clone());

        let err = registry.ensure_loaded("xx").await.unwrap_err();
        assert!(matches!(err, TranslationError::UnsupportedLanguage { .. }));
        // The loader must not even be invoked
        assert_eq!(loader.count(), 0);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_registry_unchanged() {
        let loader = Arc::new(CountingLoader::failing_for(&["Helsinki-NLP/opus-mt-en-de"]));
        let registry = EngineRegistry::new(loader.clone());

        let err = registry.ensure_loaded("de").await.unwrap_err();
        assert!(matches!(err, TranslationError::LoadError { .. }));
        assert!(!registry.is_loaded("de").await);
        assert!(registry.loaded_codes().await.is_empty());
    }

    #[tokio::test]
    async fn test_preload_continues_past_failures() {
        let loader = Arc::new(CountingLoader::failing_for(&["Helsinki-NLP/opus-mt-en-es"]));
        let registry = EngineRegistry::new(loader.clone());

        let failed = registry.preload(&["de", "es", "fr"]).await;

        assert_eq!(failed, vec!["es".to_string()]);
        assert_eq!(
            registry.loaded_codes().await,
            vec!["de".to_string(), "fr".to_string()]
        );
    }

    #[tokio::test]
    async fn test_concurrent_ensure_loaded_loads_once() {
        let loader = Arc::new(CountingLoader::with_delay(Duration::from_millis(20)));
        let registry = Arc::new(EngineRegistry::new(loader.clone()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.ensure_loaded("de").await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(loader.count(), 1);
        assert!(registry.is_loaded("de").await);
    }
}
