use crate::config::Config;
use crate::error::{TranslationError, TranslationResult};
use crate::i18n::language_name;
use crate::provider::TranslationProvider;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Translation provider backed by the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryConfig,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslationError::Config(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::provider_call(),
        })
    }

    pub fn from_config(config: &Config) -> TranslationResult<Self> {
        Self::new(
            &config.gemini_api_key,
            &config.gemini_model,
            &config.gemini_api_url,
        )
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the first candidate's text, trimmed.
    async fn generate(&self, prompt: &str) -> TranslationResult<String> {
        with_retry_if(
            &self.retry,
            "Gemini generateContent",
            || self.generate_once(prompt),
            TranslationError::is_retryable,
        )
        .await
    }

    async fn generate_once(&self, prompt: &str) -> TranslationResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Provider { status, body });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                TranslationError::InvalidResponse("response contained no candidates".to_string())
            })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TranslationError::EmptyResult);
        }
        Ok(text.to_string())
    }
}

fn translate_prompt(text: &str, target: &str, source: Option<&str>) -> String {
    let target = language_name(target);
    match source {
        Some(source) => format!(
            "Translate this text from {} to {}. Return only the translated text without explanations or notes.\n\nText: \"{}\"",
            language_name(source),
            target,
            text
        ),
        None => format!(
            "Translate this text to {}. Return only the translated text without explanations or notes.\n\nText: \"{}\"",
            target, text
        ),
    }
}

fn detect_prompt(text: &str) -> String {
    format!(
        "Detect the language of the following text and respond with only the ISO 639-1 language code (e.g., 'en', 'es', 'fr', etc.).\n\nText: \"{}\"",
        text
    )
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> TranslationResult<String> {
        debug!(
            "Gemini translate {} chars {} -> {}",
            text.len(),
            source.unwrap_or("auto"),
            target
        );
        self.generate(&translate_prompt(text, target, source)).await
    }

    async fn detect_language(&self, text: &str) -> TranslationResult<String> {
        let answer = self.generate(&detect_prompt(text)).await?;
        Ok(answer
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c.is_whitespace())
            .to_lowercase())
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}
