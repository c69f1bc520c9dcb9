//! axum response adapter.
//!
//! `translate_response` is mounted with `axum::middleware::from_fn_with_state`.
//! It resolves the request's target language, lets the handler run, then
//! buffers the response body, hands it to a [`ResponseHook`] and sends the
//! hook's result. The translated body is fully awaited before anything is
//! written to the client.
//!
//! Bodies larger than `max_body_bytes` are sent untranslated, byte for byte.

use crate::orchestrator::{ApplyOptions, TranslationOrchestrator};
use crate::path::FieldPath;
use crate::preference::LanguagePreference;
use crate::translator::Translator;
use async_trait::async_trait;
use axum::body::{Body, Bytes, HttpBody};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Largest body the adapter will buffer
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Decides per request whether translation is bypassed.
pub type SkipPredicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Response extension marking a body that has already been translated.
#[derive(Debug, Clone, Copy)]
pub struct Translated;

/// An outgoing body as the hook sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Parse a JSON body, falling back to plain text when it is not valid JSON.
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(raw),
        }
    }

    pub fn into_string(self) -> Result<String, serde_json::Error> {
        match self {
            Payload::Json(value) => serde_json::to_string(&value),
            Payload::Text(text) => Ok(text),
        }
    }
}

/// Per-request data available to a hook.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub target_language: Option<String>,
}

/// Extension point called with the outgoing payload before it is sent.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn before_transmit(&self, payload: Payload, ctx: &RequestContext) -> Payload;
}

#[derive(Clone)]
pub struct MiddlewareOptions {
    pub fields: Vec<FieldPath>,
    pub apply: ApplyOptions,
    /// Target that overrides whatever the request asks for
    pub explicit_language: Option<String>,
    pub preference: LanguagePreference,
    pub skip: Option<SkipPredicate>,
    pub max_body_bytes: usize,
}

impl Default for MiddlewareOptions {
    fn default() -> Self {
        Self {
            fields: vec![FieldPath::parse("message")],
            apply: ApplyOptions::default(),
            explicit_language: None,
            preference: LanguagePreference::default(),
            skip: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl MiddlewareOptions {
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| FieldPath::parse(f)).collect();
        self
    }

    pub fn with_apply(mut self, apply: ApplyOptions) -> Self {
        self.apply = apply;
        self
    }

    pub fn with_explicit_language(mut self, language: &str) -> Self {
        self.explicit_language = Some(language.to_string());
        self
    }

    pub fn with_preference(mut self, preference: LanguagePreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_skip<F>(mut self, skip: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(skip));
        self
    }
}

/// State shared by every request passing through the layer.
pub struct TranslationLayerState {
    orchestrator: Arc<TranslationOrchestrator>,
    options: MiddlewareOptions,
}

impl TranslationLayerState {
    pub fn new(orchestrator: Arc<TranslationOrchestrator>, options: MiddlewareOptions) -> Self {
        Self {
            orchestrator,
            options,
        }
    }

    pub fn orchestrator(&self) -> &Arc<TranslationOrchestrator> {
        &self.orchestrator
    }

    pub fn options(&self) -> &MiddlewareOptions {
        &self.options
    }

    fn should_skip(&self, request: &Request) -> bool {
        self.options
            .skip
            .as_ref()
            .map(|skip| skip(request))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ResponseHook for TranslationLayerState {
    async fn before_transmit(&self, payload: Payload, ctx: &RequestContext) -> Payload {
        let Some(target) = ctx.target_language.as_deref() else {
            return payload;
        };

        match payload {
            Payload::Json(value) => Payload::Json(
                self.orchestrator
                    .apply(value, &self.options.fields, Some(target), &self.options.apply)
                    .await,
            ),
            Payload::Text(text) => Payload::Text(
                self.orchestrator
                    .translate_text(&text, target, &self.options.apply)
                    .await,
            ),
        }
    }
}

/// Translate strings into the request's language from inside a handler.
///
/// Inserted as a request extension by [`translate_response`]; extract it with
/// `Extension<RequestTranslator>`.
#[derive(Clone)]
pub struct RequestTranslator {
    translator: Arc<Translator>,
    target: Option<String>,
}

impl RequestTranslator {
    pub fn new(translator: Arc<Translator>, target: Option<String>) -> Self {
        Self { translator, target }
    }

    pub fn target_language(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// `text` in the request's language, or unchanged when no language was
    /// resolved or translation fails.
    pub async fn translate(&self, text: &str) -> String {
        let Some(target) = self.target.as_deref() else {
            return text.to_string();
        };
        match self.translator.translate_text(text, target, None).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Direct translation failed, keeping original: {}", e);
                text.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Text,
}

fn body_kind(headers: &HeaderMap) -> Option<BodyKind> {
    let content_type = headers
        .get(header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .to_ascii_lowercase();
    let mime = content_type.split(';').next().unwrap_or("").trim();

    if mime == "application/json" || mime.ends_with("+json") {
        Some(BodyKind::Json)
    } else if mime.starts_with("text/") {
        Some(BodyKind::Text)
    } else {
        None
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

enum Buffered {
    /// The whole body, within the limit
    Complete(Bytes),
    /// Too large to translate; replays everything read so far followed by
    /// the rest of the original stream
    Oversized(Body),
}

/// Read `body` into memory unless it turns out to exceed `limit` bytes.
///
/// A body whose size hint already exceeds the limit is handed back
/// untouched. Otherwise chunks are read until the end or until the limit is
/// crossed, in which case nothing is lost: the chunks read so far are put
/// back in front of the unread remainder.
async fn buffer_body(body: Body, limit: usize) -> Result<Buffered, axum::Error> {
    if body.size_hint().lower() > limit as u64 {
        return Ok(Buffered::Oversized(body));
    }

    let mut remaining = Box::pin(body.into_data_stream());
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut total = 0usize;

    while let Some(chunk) = remaining.next().await {
        let chunk = chunk?;
        total += chunk.len();
        chunks.push(chunk);

        if total > limit {
            let replay = stream::iter(chunks.into_iter().map(Ok::<Bytes, axum::Error>));
            return Ok(Buffered::Oversized(Body::from_stream(replay.chain(remaining))));
        }
    }

    let mut buffer = Vec::with_capacity(total);
    for chunk in &chunks {
        buffer.extend_from_slice(chunk);
    }
    Ok(Buffered::Complete(Bytes::from(buffer)))
}

/// axum middleware translating JSON and text responses.
pub async fn translate_response(
    State(state): State<Arc<TranslationLayerState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if state.should_skip(&request) {
        debug!("Skipping translation for {}", request.uri());
        return next.run(request).await;
    }

    let target = state.options.preference.resolve_from_request(
        state.options.explicit_language.as_deref(),
        request.uri(),
        request.headers(),
    );
    request.extensions_mut().insert(RequestTranslator::new(
        state.orchestrator.translator().clone(),
        target.clone(),
    ));

    let response = next.run(request).await;

    let Some(target) = target else {
        return response;
    };
    if response.extensions().get::<Translated>().is_some() {
        debug!("Response already translated, passing through");
        return response;
    }
    let Some(kind) = body_kind(response.headers()) else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    if declared_length(&parts.headers).is_some_and(|len| len > state.options.max_body_bytes) {
        debug!("Response body exceeds translation limit, passing through");
        return Response::from_parts(parts, body);
    }

    let bytes = match buffer_body(body, state.options.max_body_bytes).await {
        Ok(Buffered::Complete(bytes)) => bytes,
        Ok(Buffered::Oversized(body)) => {
            debug!("Response body exceeds translation limit, passing through");
            return Response::from_parts(parts, body);
        }
        Err(e) => {
            warn!("Failed to read response body for translation: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let raw = match String::from_utf8(bytes.to_vec()) {
        Ok(raw) => raw,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    let payload = match kind {
        BodyKind::Json => Payload::parse(raw),
        BodyKind::Text => Payload::Text(raw),
    };

    let ctx = RequestContext {
        target_language: Some(target.clone()),
    };
    let translated = state.before_transmit(payload, &ctx).await;

    let body = match translated.into_string() {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to serialise translated body, sending original: {}", e);
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    info!("Translated response into '{}'", target);
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    parts.extensions.insert(Translated);
    Response::from_parts(parts, Body::from(Bytes::from(body)))
}
