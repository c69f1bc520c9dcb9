//! Language catalog, validated language codes and translation metrics.
//!
//! - `registry`: static table of supported language codes and display names
//! - `language`: `Language`, a code validated against the registry
//! - `metrics`: counters for cache and provider activity

mod language;
mod metrics;
mod registry;

pub use language::{language_name, Language};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
