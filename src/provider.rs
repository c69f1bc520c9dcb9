//! Translation backend abstraction.
//!
//! The orchestrator only ever talks to a `TranslationProvider`, so the HTTP
//! client for a real service and the deterministic mock used in tests are
//! interchangeable.

use crate::error::TranslationResult;
use async_trait::async_trait;

/// A machine translation backend.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `text` into `target`.
    ///
    /// `source` is the language of `text` when known; `None` lets the backend
    /// work it out.
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> TranslationResult<String>;

    /// Guess the language of `text`, answering with a language code.
    ///
    /// The answer is not validated here; callers check it against the
    /// language catalog.
    async fn detect_language(&self, text: &str) -> TranslationResult<String>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}
