//! Machine translation for selected fields of outgoing JSON responses.
//!
//! The core is [`orchestrator::TranslationOrchestrator`], which walks a
//! document by dotted field paths (`items.*.title`), translates the string
//! leaves through a [`provider::TranslationProvider`] and merges the results
//! back. [`middleware::translate_response`] mounts it on an axum router.

pub mod cache;
pub mod config;
pub mod detector;
pub mod error;
pub mod formatter;
pub mod gemini;
pub mod i18n;
pub mod middleware;
pub mod mock;
pub mod orchestrator;
pub mod path;
pub mod preference;
pub mod provider;
pub mod retry;
pub mod security;
pub mod translator;

pub use error::{TranslationError, TranslationResult};
pub use orchestrator::{ApplyOptions, MergePolicy, TranslationOrchestrator};
pub use path::FieldPath;
pub use translator::{Translator, TranslatorConfig};
