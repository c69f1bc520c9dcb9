//! Deterministic in-process translation provider.
//!
//! Lets the orchestrator, the middleware and the binaries run without a
//! network or API key. Also records how often it was called, which the cache
//! tests rely on.

use crate::error::{TranslationError, TranslationResult};
use crate::provider::TranslationProvider;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How the mock transforms text.
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target code: "hello" → "hello_fr"
    Suffix,

    /// Upper-case the text: "hello" → "HELLO"
    Uppercase,

    /// Encode every input: "hello" → "translated:hello:auto-fr"
    Tagged,

    /// Predefined (text, target) → translation pairs, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Fail every call with the given message
    Error(String),

    /// Return input unchanged
    NoOp,
}

#[derive(Debug)]
pub struct MockProvider {
    mode: MockMode,
    delay: Duration,
    fail_on: HashSet<String>,
    detected_language: String,
    detection_fails: bool,
    early_detection_failures: usize,
    translate_calls: AtomicUsize,
    detect_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay: Duration::ZERO,
            fail_on: HashSet::new(),
            detected_language: "en".to_string(),
            detection_fails: false,
            early_detection_failures: 0,
            translate_calls: AtomicUsize::new(0),
            detect_calls: AtomicUsize::new(0),
        }
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail whenever asked to translate exactly `text`.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on.insert(text.to_string());
        self
    }

    /// Answer every detection request with `code`.
    pub fn detecting(mut self, code: &str) -> Self {
        self.detected_language = code.to_string();
        self
    }

    /// Fail every detection request.
    pub fn with_failing_detection(mut self) -> Self {
        self.detection_fails = true;
        self
    }

    /// Time out the first `count` detection requests, then answer normally.
    pub fn failing_first_detections(mut self, count: usize) -> Self {
        self.early_detection_failures = count;
        self
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    pub fn detect_calls(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn apply_translation(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> TranslationResult<String> {
        if self.fail_on.contains(text) {
            return Err(TranslationError::Provider {
                status: 500,
                body: format!("mock failure for '{}'", text),
            });
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Uppercase => Ok(text.to_uppercase()),
            MockMode::Tagged => Ok(format!(
                "translated:{}:{}-{}",
                text,
                source.unwrap_or("auto"),
                target
            )),
            MockMode::Mappings(map) => Ok(map
                .get(&(text.to_string(), target.to_string()))
                .cloned()
                .unwrap_or_else(|| format!("{}_{}", text, target))),
            MockMode::Error(message) => Err(TranslationError::Network(message.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> TranslationResult<String> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(text, target, source)
    }

    async fn detect_language(&self, _text: &str) -> TranslationResult<String> {
        let call = self.detect_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        if self.detection_fails {
            return Err(TranslationError::Network("mock detection failure".to_string()));
        }
        if call < self.early_detection_failures {
            return Err(TranslationError::Timeout(0));
        }
        Ok(self.detected_language.clone())
    }

    fn provider_name(&self) -> &str {
        "Mock Provider"
    }
}
