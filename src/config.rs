use crate::formatter::{FormatOptions, DEFAULT_METADATA_FIELD};
use crate::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::middleware::MiddlewareOptions;
use crate::orchestrator::{ApplyOptions, DEFAULT_RESPONSE_FIELD};
use crate::path::FieldPath;
use crate::preference::{LanguagePreference, DEFAULT_HEADER_NAME, DEFAULT_QUERY_PARAM};
use crate::translator::TranslatorConfig;
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,

    // Translation
    pub default_target_language: Option<String>,
    pub fallback_source_language: String,
    pub translation_timeout_ms: u64,
    pub cache_enabled: bool,
    pub cache_size: usize,

    // Response fields
    pub translate_fields: Vec<String>,
    pub response_field: String,
    pub preserve_original: bool,
    pub detect_source_language: bool,

    // Output formatting
    pub include_metadata: bool,
    pub metadata_field: String,
    pub trim_translations: bool,
    pub capitalize_translations: bool,

    // Language preference
    pub lang_query_param: String,
    pub lang_header_name: String,

    // Server
    pub admin_api_key: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Gemini
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY not set")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            // Translation
            default_target_language: non_empty_var("DEFAULT_TARGET_LANGUAGE"),
            fallback_source_language: std::env::var("FALLBACK_SOURCE_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
            translation_timeout_ms: std::env::var("TRANSLATION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_enabled: bool_var("TRANSLATION_CACHE_ENABLED", true),
            cache_size: std::env::var("TRANSLATION_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),

            // Response fields
            translate_fields: std::env::var("TRANSLATE_FIELDS")
                .map(|v| parse_list(&v))
                .unwrap_or_else(|_| vec!["message".to_string()]),
            response_field: std::env::var("TRANSLATE_RESPONSE_FIELD")
                .unwrap_or_else(|_| DEFAULT_RESPONSE_FIELD.to_string()),
            preserve_original: bool_var("TRANSLATE_PRESERVE_ORIGINAL", true),
            detect_source_language: bool_var("TRANSLATE_DETECT_SOURCE", false),

            // Output formatting
            include_metadata: bool_var("TRANSLATE_INCLUDE_METADATA", false),
            metadata_field: non_empty_var("TRANSLATE_METADATA_FIELD")
                .unwrap_or_else(|| DEFAULT_METADATA_FIELD.to_string()),
            trim_translations: bool_var("TRANSLATE_TRIM", false),
            capitalize_translations: bool_var("TRANSLATE_CAPITALIZE", false),

            // Language preference
            lang_query_param: std::env::var("LANG_QUERY_PARAM")
                .unwrap_or_else(|_| DEFAULT_QUERY_PARAM.to_string()),
            lang_header_name: std::env::var("LANG_HEADER_NAME")
                .unwrap_or_else(|_| DEFAULT_HEADER_NAME.to_string()),

            // Server
            admin_api_key: non_empty_var("ADMIN_API_KEY"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            default_target_language: self.default_target_language.clone(),
            fallback_source_language: self.fallback_source_language.clone(),
            timeout: Duration::from_millis(self.translation_timeout_ms),
            enable_cache: self.cache_enabled,
            cache_size: self.cache_size,
        }
    }

    pub fn apply_options(&self) -> ApplyOptions {
        let apply = if self.preserve_original {
            ApplyOptions::preserve_at(&self.response_field)
        } else {
            ApplyOptions::replace()
        };
        apply.with_detection(self.detect_source_language)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            trim: self.trim_translations,
            capitalize_first: self.capitalize_translations,
            include_metadata: self.include_metadata,
            metadata_field: self.metadata_field.clone(),
        }
    }

    pub fn middleware_options(&self) -> MiddlewareOptions {
        MiddlewareOptions {
            fields: self
                .translate_fields
                .iter()
                .map(|f| FieldPath::parse(f))
                .collect(),
            apply: self.apply_options(),
            preference: LanguagePreference::new(
                &self.lang_query_param,
                &self.lang_header_name,
                self.default_target_language.clone(),
            ),
            ..MiddlewareOptions::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bool_var(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
