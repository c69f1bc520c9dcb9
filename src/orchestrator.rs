//! Structured field translation over JSON documents.
//!
//! `apply` resolves every field specifier against the document, translates
//! the string leaves it finds and merges the results back, either over the
//! source leaves or under a separate response root. It always returns a
//! usable document: translation failures degrade to the original text.
//!
//! Specifiers are fetched concurrently, leaves within one specifier
//! sequentially. All writes happen after every fetch has finished, in
//! declaration order, so two specifiers writing the same destination resolve
//! the same way on every run (the later specifier wins).
//!
//! A preserved translation is never written where it would replace or reach
//! through a leaf that was resolved as a source, and never into an array
//! under a named key. Such destinations are skipped.

use crate::detector::LanguageDetector;
use crate::formatter::ResponseFormatter;
use crate::path::{self, display_steps, FieldPath, PathStep};
use crate::translator::{canonical_language, Translator};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default response root when originals are preserved
pub const DEFAULT_RESPONSE_FIELD: &str = "translatedMessage";

/// Where translated text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePolicy {
    /// Overwrite the source leaf
    Replace,
    /// Leave the source leaf alone and write under this root, mirroring the
    /// source path (`items.0.title` → `<root>.items.0.title`)
    PreserveAt(FieldPath),
}

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub merge: MergePolicy,
    /// Detect each leaf's language first and pass it on as the source
    pub detect_source_language: bool,
}

impl ApplyOptions {
    pub fn replace() -> Self {
        Self {
            merge: MergePolicy::Replace,
            detect_source_language: false,
        }
    }

    pub fn preserve_at(response_field: &str) -> Self {
        Self {
            merge: MergePolicy::PreserveAt(FieldPath::parse(response_field)),
            detect_source_language: false,
        }
    }

    pub fn with_detection(mut self, detect: bool) -> Self {
        self.detect_source_language = detect;
        self
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self::preserve_at(DEFAULT_RESPONSE_FIELD)
    }
}

/// Translated text for one resolved leaf.
struct LeafResult {
    steps: Vec<PathStep>,
    text: String,
    source: Option<String>,
    translated: bool,
}

/// Everything one specifier wants written into the document.
struct FieldOutcome {
    leaves: Vec<LeafResult>,
    placeholders: Vec<(Vec<PathStep>, Value)>,
}

/// Entry counts dropped by [`TranslationOrchestrator::clear_caches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearedCaches {
    pub translations: usize,
    pub detections: usize,
}

pub struct TranslationOrchestrator {
    translator: Arc<Translator>,
    detector: LanguageDetector,
    formatter: ResponseFormatter,
}

impl TranslationOrchestrator {
    pub fn new(translator: Arc<Translator>) -> Self {
        Self {
            detector: LanguageDetector::new(translator.clone()),
            translator,
            formatter: ResponseFormatter::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: ResponseFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    /// Forget memoised translations and source-language detections.
    pub fn clear_caches(&self) -> ClearedCaches {
        let translations = self.translator.cache().len();
        self.translator.clear_cache();
        ClearedCaches {
            translations,
            detections: self.detector.clear_cache(),
        }
    }

    /// Translate the fields of `doc` named by `fields` into `target`.
    ///
    /// A missing or blank `target` returns `doc` unchanged, as does a `null`
    /// or non-string scalar document. A string document is translated as a
    /// whole.
    pub async fn apply(
        &self,
        doc: Value,
        fields: &[FieldPath],
        target: Option<&str>,
        options: &ApplyOptions,
    ) -> Value {
        let Some(target) = target
            .filter(|t| !t.trim().is_empty())
            .map(canonical_language)
        else {
            return doc;
        };
        let target = target.as_str();

        match doc {
            Value::String(text) => Value::String(self.translate_text(&text, target, options).await),
            Value::Object(_) | Value::Array(_) => {
                self.apply_to_structure(doc, fields, target, options).await
            }
            other => other,
        }
    }

    /// Translate one whole text, keeping the original on failure.
    pub async fn translate_text(&self, text: &str, target: &str, options: &ApplyOptions) -> String {
        if text.is_empty() {
            return String::new();
        }
        let source = self.source_for(text, options).await;
        match self
            .translator
            .translate_text(text, target, source.as_deref())
            .await
        {
            Ok(translated) => self.formatter.format_value(translated),
            Err(e) => {
                warn!("Whole-text translation failed, keeping original: {}", e);
                self.translator.metrics().record_field_fallback();
                text.to_string()
            }
        }
    }

    async fn apply_to_structure(
        &self,
        doc: Value,
        fields: &[FieldPath],
        target: &str,
        options: &ApplyOptions,
    ) -> Value {
        if fields.is_empty() {
            return doc;
        }

        let outcomes = join_all(
            fields
                .iter()
                .map(|field| self.translate_field(&doc, field, target, options)),
        )
        .await;

        let sources: Vec<Vec<PathStep>> = outcomes
            .iter()
            .flat_map(|outcome| outcome.leaves.iter().map(|leaf| leaf.steps.clone()))
            .collect();

        let mut doc = doc;
        let mut translated_fields = Vec::new();
        let mut detected_source = None;

        for (field, outcome) in fields.iter().zip(outcomes) {
            if detected_source.is_none() {
                detected_source = outcome.leaves.iter().find_map(|leaf| leaf.source.clone());
            }
            if write_outcome(&mut doc, outcome, &options.merge, &sources) {
                translated_fields.push(field.to_string());
            }
        }

        if !translated_fields.is_empty() {
            self.formatter
                .add_metadata(&mut doc, detected_source.as_deref(), target, &translated_fields);
        }

        doc
    }

    async fn translate_field(
        &self,
        doc: &Value,
        field: &FieldPath,
        target: &str,
        options: &ApplyOptions,
    ) -> FieldOutcome {
        let locations = path::resolve(doc, field);
        if locations.is_empty() {
            debug!("Field '{}' has no string values, skipping", field);
        }

        let mut leaves = Vec::with_capacity(locations.len());
        for location in locations {
            let source = self.source_for(&location.text, options).await;
            let result = self
                .translator
                .translate_text(&location.text, target, source.as_deref())
                .await;

            let (text, translated) = match result {
                Ok(text) => (self.formatter.format_value(text), true),
                Err(e) => {
                    warn!(
                        "Translation of '{}' failed, keeping original: {}",
                        display_steps(&location.steps),
                        e
                    );
                    self.translator.metrics().record_field_fallback();
                    (location.text, false)
                }
            };

            leaves.push(LeafResult {
                steps: location.steps,
                text,
                source,
                translated,
            });
        }

        FieldOutcome {
            leaves,
            placeholders: path::resolve_placeholders(doc, field),
        }
    }

    async fn source_for(&self, text: &str, options: &ApplyOptions) -> Option<String> {
        if options.detect_source_language {
            Some(self.detector.detect(text).await)
        } else {
            None
        }
    }
}

/// Merge one specifier's results into `doc`. Returns whether any translated
/// text was written.
fn write_outcome(
    doc: &mut Value,
    outcome: FieldOutcome,
    merge: &MergePolicy,
    sources: &[Vec<PathStep>],
) -> bool {
    let mut wrote_translation = false;

    match merge {
        MergePolicy::Replace => {
            for leaf in outcome.leaves.into_iter().filter(|leaf| leaf.translated) {
                if let Some(slot) = path::get_mut(doc, &leaf.steps) {
                    *slot = Value::String(leaf.text);
                    wrote_translation = true;
                }
            }
        }
        MergePolicy::PreserveAt(root) => {
            let root = root.as_steps();
            let clashes = |destination: &[PathStep]| {
                sources.iter().any(|source| path::overlaps(source, destination))
            };

            for (steps, placeholder) in outcome.placeholders {
                let destination = mirrored(&root, &steps);
                if path::get(doc, &destination).is_none() && !clashes(&destination) {
                    path::set_with_autocreate(doc, &destination, placeholder);
                }
            }
            for leaf in outcome.leaves {
                let destination = mirrored(&root, &leaf.steps);
                if clashes(&destination) {
                    warn!(
                        "Skipping '{}': it would overwrite a translated source field",
                        display_steps(&destination)
                    );
                    continue;
                }
                if !path::set_with_autocreate(doc, &destination, Value::String(leaf.text)) {
                    debug!(
                        "Skipping '{}': a named key cannot be stored in an array",
                        display_steps(&destination)
                    );
                    continue;
                }
                wrote_translation |= leaf.translated;
            }
        }
    }

    wrote_translation
}

fn mirrored(root: &[PathStep], steps: &[PathStep]) -> Vec<PathStep> {
    root.iter().chain(steps.iter()).cloned().collect()
}
