//! Post-processing of translated values and the optional metadata block.

use chrono::Utc;
use serde_json::{json, Value};

pub const DEFAULT_METADATA_FIELD: &str = "translationInfo";

#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Strip surrounding whitespace from translated text
    pub trim: bool,
    /// Upper-case the first character of translated text
    pub capitalize_first: bool,
    /// Attach a metadata block to object documents
    pub include_metadata: bool,
    pub metadata_field: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            trim: false,
            capitalize_first: false,
            include_metadata: false,
            metadata_field: DEFAULT_METADATA_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseFormatter {
    options: FormatOptions,
}

impl ResponseFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn format_value(&self, text: String) -> String {
        let text = if self.options.trim {
            text.trim().to_string()
        } else {
            text
        };

        if self.options.capitalize_first {
            capitalize_first(&text)
        } else {
            text
        }
    }

    /// Attach `translationInfo` to an object document.
    ///
    /// Does nothing when metadata is disabled or `doc` is not an object.
    pub fn add_metadata(
        &self,
        doc: &mut Value,
        source: Option<&str>,
        target: &str,
        translated_fields: &[String],
    ) {
        if !self.options.include_metadata {
            return;
        }
        if let Value::Object(map) = doc {
            map.insert(
                self.options.metadata_field.clone(),
                json!({
                    "sourceLanguage": source.unwrap_or(crate::cache::AUTO_SOURCE),
                    "targetLanguage": target,
                    "translatedFields": translated_fields,
                    "translatedAt": Utc::now().to_rfc3339(),
                }),
            );
        }
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
