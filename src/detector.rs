use crate::cache::BoundedCache;
use crate::translator::{Detection, Translator};
use std::sync::Arc;
use tracing::debug;

/// Characters of input sent to the provider for detection
pub const SAMPLE_CHARS: usize = 200;

const DEFAULT_CACHE_SIZE: usize = 100;

/// Source-language detection with sampling and memoisation.
///
/// Only the first [`SAMPLE_CHARS`] characters are looked at, and detections
/// are remembered per sample so repeated texts cost one provider call. A
/// fallback answer is used for the current call only and never remembered.
pub struct LanguageDetector {
    translator: Arc<Translator>,
    cache: BoundedCache<String, String>,
}

impl LanguageDetector {
    pub fn new(translator: Arc<Translator>) -> Self {
        Self::with_cache_size(translator, DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache_size(translator: Arc<Translator>, cache_size: usize) -> Self {
        Self {
            translator,
            cache: BoundedCache::new(cache_size),
        }
    }

    /// Language code for `text`. Blank text yields the fallback language
    /// without calling the provider.
    pub async fn detect(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return self.translator.fallback_source_language().to_string();
        }

        let sample = sample(text);
        if let Some(code) = self.cache.get(&sample) {
            return code;
        }

        match self.translator.detect_language(&sample).await {
            Detection::Detected(code) => {
                debug!("Detected source language '{}'", code);
                self.cache.put(sample, code.clone());
                code
            }
            Detection::Fallback(code) => code,
        }
    }

    /// Forget every memoised detection, returning how many there were.
    pub fn clear_cache(&self) -> usize {
        let cleared = self.cache.len();
        self.cache.clear();
        cleared
    }
}

fn sample(text: &str) -> String {
    text.chars().take(SAMPLE_CHARS).collect()
}
