//! Translation metrics and observability module.
//!
//! Counters for cache efficiency, provider traffic and how often a field fell
//! back to its untranslated text. One instance is shared by a `Translator`
//! and everything built on top of it.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Translation counters.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Translations served from the cache
    cache_hits: AtomicUsize,

    /// Translations not found in the cache
    cache_misses: AtomicUsize,

    /// Calls made to the translation provider
    api_calls: AtomicUsize,

    /// Provider calls that failed or timed out
    api_failures: AtomicUsize,

    /// Detection calls that fell back to the configured language
    detection_fallbacks: AtomicUsize,

    /// Fields left untranslated because translation failed
    field_fallbacks: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_fallback(&self) {
        self.detection_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_field_fallback(&self) {
        self.field_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    pub fn detection_fallbacks(&self) -> usize {
        self.detection_fallbacks.load(Ordering::Relaxed)
    }

    pub fn field_fallbacks(&self) -> usize {
        self.field_fallbacks.load(Ordering::Relaxed)
    }

    /// Snapshot of the current counters with derived rates.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let calls = self.api_calls();
        let failures = self.api_failures();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            api_calls: calls,
            api_failures: failures,
            api_success_rate,
            detection_fallbacks: self.detection_fallbacks(),
            field_fallbacks: self.field_fallbacks(),
        }
    }
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub api_calls: usize,
    pub api_failures: usize,

    /// API success rate as a percentage (0-100)
    pub api_success_rate: f64,

    pub detection_fallbacks: usize,
    pub field_fallbacks: usize,
}
