use thiserror::Error;

/// Errors raised while talking to a translation backend.
///
/// None of these ever reach the caller of the orchestrator: field-level
/// processing catches them and keeps the original text.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Backend answered with a non-success HTTP status
    #[error("Provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    /// Request never produced a response (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered but the payload did not have the expected shape
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Call exceeded the configured timeout
    #[error("Translation timed out after {0}ms")]
    Timeout(u64),

    /// Backend returned no usable text
    #[error("Provider returned an empty result")]
    EmptyResult,

    /// Language code not present in the catalog
    #[error("Unsupported language code: '{0}'")]
    UnsupportedLanguage(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslationError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Rate limiting (429) and server errors (5xx) are transient, as are
    /// network failures and timeouts. Other 4xx client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Provider { status, .. } => *status == 429 || *status >= 500,
            TranslationError::Network(_) | TranslationError::Timeout(_) => true,
            TranslationError::InvalidResponse(_)
            | TranslationError::EmptyResult
            | TranslationError::UnsupportedLanguage(_)
            | TranslationError::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::Network(format!("request timed out: {}", error))
        } else if error.is_decode() {
            TranslationError::InvalidResponse(error.to_string())
        } else {
            TranslationError::Network(error.to_string())
        }
    }
}

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;
