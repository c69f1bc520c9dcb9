//! Target-language selection for one request.
//!
//! Precedence, highest first: explicit override, query parameter, request
//! header, configured default. A source that is empty or does not name a
//! catalogued language is skipped rather than ending the search.

use crate::i18n::LanguageRegistry;
use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use std::collections::HashMap;

pub const DEFAULT_QUERY_PARAM: &str = "lang";
pub const DEFAULT_HEADER_NAME: &str = "x-accept-language";

/// Pick the effective target language, or `None` when nothing usable is set.
pub fn resolve_language(
    explicit: Option<&str>,
    query: Option<&str>,
    header: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    [explicit, query, header, default]
        .into_iter()
        .flatten()
        .find_map(normalize_language)
        .map(str::to_string)
}

/// Reduce a raw preference to a catalog code.
///
/// Accepts plain codes (`FR`), region tags (`fr-CA`, `pt_BR`) and
/// `Accept-Language`-style lists, of which only the first entry counts
/// (`de-DE,de;q=0.9` → `de`).
pub fn normalize_language(raw: &str) -> Option<&'static str> {
    let first = raw.split([',', ';']).next()?.trim();
    let primary = first.split(['-', '_']).next()?.trim();
    if primary.is_empty() {
        return None;
    }
    LanguageRegistry::get()
        .get_by_code(primary)
        .map(|config| config.code)
}

/// Where to look for the language on an incoming request.
#[derive(Debug, Clone)]
pub struct LanguagePreference {
    pub query_param: String,
    pub header_name: String,
    pub default_language: Option<String>,
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_PARAM, DEFAULT_HEADER_NAME, None)
    }
}

impl LanguagePreference {
    pub fn new(query_param: &str, header_name: &str, default_language: Option<String>) -> Self {
        Self {
            query_param: query_param.to_string(),
            header_name: header_name.to_ascii_lowercase(),
            default_language,
        }
    }

    /// Resolve the target language from an explicit override and the request's
    /// query string and headers.
    pub fn resolve_from_request(
        &self,
        explicit: Option<&str>,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Option<String> {
        let params = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map(|Query(params)| params)
            .unwrap_or_default();
        let query = params.get(&self.query_param).map(String::as_str);
        let header = headers
            .get(self.header_name.as_str())
            .and_then(|value| value.to_str().ok());

        resolve_language(explicit, query, header, self.default_language.as_deref())
    }
}
