//! Single-text translation with memoisation, a per-call timeout and metrics.
//!
//! Everything that translates text goes through [`Translator`]: the
//! orchestrator for document fields, the middleware for plain-text bodies and
//! the per-request helper handlers can call directly.

use crate::cache::{CacheKey, TranslationCache};
use crate::error::{TranslationError, TranslationResult};
use crate::i18n::{language_name, Language, TranslationMetrics};
use crate::preference::normalize_language;
use crate::provider::TranslationProvider;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Translator settings.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Target used when a caller has no preference of its own
    pub default_target_language: Option<String>,
    /// Source assumed when detection fails or answers with an unknown code
    pub fallback_source_language: String,
    /// Upper bound on a single provider call
    pub timeout: Duration,
    pub enable_cache: bool,
    pub cache_size: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_target_language: None,
            fallback_source_language: Language::ENGLISH.code().to_string(),
            timeout: Duration::from_millis(10_000),
            enable_cache: true,
            cache_size: 1000,
        }
    }
}

/// Outcome of a detection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The provider named a language from the catalog
    Detected(String),
    /// Detection failed or named an unknown language; holds the configured
    /// fallback
    Fallback(String),
}

impl Detection {
    pub fn code(&self) -> &str {
        match self {
            Detection::Detected(code) | Detection::Fallback(code) => code,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            Detection::Detected(code) | Detection::Fallback(code) => code,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Detection::Fallback(_))
    }
}

/// Canonical form of a language code: the catalog code when one matches
/// (`ES`, `es-MX` → `es`), otherwise the trimmed, lower-cased input.
pub fn canonical_language(code: &str) -> String {
    normalize_language(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.trim().to_ascii_lowercase())
}

pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    cache: Arc<TranslationCache>,
    metrics: Arc<TranslationMetrics>,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, config: TranslatorConfig) -> Self {
        let cache = Arc::new(TranslationCache::new(config.cache_size));
        Self {
            provider,
            cache,
            metrics: Arc::new(TranslationMetrics::new()),
            config,
        }
    }

    /// Use an existing cache instead of a private one.
    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Report into an existing metrics instance.
    pub fn with_metrics(mut self, metrics: Arc<TranslationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Translate `text` into `target`.
    ///
    /// Language codes are compared and cached in canonical form. Empty text
    /// and a source equal to the target are returned unchanged without
    /// touching the cache or the provider. Errors are returned to the caller,
    /// which decides how to fall back.
    pub async fn translate_text(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> TranslationResult<String> {
        let target = canonical_language(target);
        let source = source.map(canonical_language);
        let (target, source) = (target.as_str(), source.as_deref());

        if text.is_empty() || source == Some(target) {
            return Ok(text.to_string());
        }

        let key = CacheKey::new(text, target, source);
        if self.config.enable_cache {
            if let Some(cached) = self.cache.get(&key) {
                self.metrics.record_cache_hit();
                debug!("Cache hit for {} chars -> {}", text.len(), target);
                return Ok(cached);
            }
            self.metrics.record_cache_miss();
        }

        self.metrics.record_api_call();
        let result = self
            .bounded(self.provider.translate(text, target, source))
            .await;

        match result {
            Ok(translated) => {
                if self.config.enable_cache {
                    self.cache.put(key, translated.clone());
                }
                Ok(translated)
            }
            Err(e) => {
                self.metrics.record_api_failure();
                Err(e)
            }
        }
    }

    /// Detect the language of `text`.
    ///
    /// Never fails: a provider error, a timeout or a code missing from the
    /// catalog all yield [`Detection::Fallback`] with the configured fallback
    /// language.
    pub async fn detect_language(&self, text: &str) -> Detection {
        self.metrics.record_api_call();
        let detected = self.bounded(self.provider.detect_language(text)).await;

        let fallback = || Detection::Fallback(self.config.fallback_source_language.clone());
        match detected {
            Ok(code) => match Language::from_code(&code) {
                Ok(language) => Detection::Detected(language.code().to_string()),
                Err(_) => {
                    debug!(
                        "Detected code '{}' is not supported, using fallback '{}'",
                        code, self.config.fallback_source_language
                    );
                    self.metrics.record_detection_fallback();
                    fallback()
                }
            },
            Err(e) => {
                warn!(
                    "Language detection failed ({}), using fallback '{}'",
                    e, self.config.fallback_source_language
                );
                self.metrics.record_api_failure();
                self.metrics.record_detection_fallback();
                fallback()
            }
        }
    }

    async fn bounded<F>(&self, call: F) -> TranslationResult<String>
    where
        F: Future<Output = TranslationResult<String>>,
    {
        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TranslationError::Timeout(
                self.config.timeout.as_millis() as u64,
            )),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Display name for a language code (the code itself when unknown).
    pub fn language_name(&self, code: &str) -> String {
        language_name(code)
    }

    pub fn default_target_language(&self) -> Option<&str> {
        self.config.default_target_language.as_deref()
    }

    pub fn fallback_source_language(&self) -> &str {
        &self.config.fallback_source_language
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }
}
