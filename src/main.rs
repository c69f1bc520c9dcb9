use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use response_translator::config::Config;
use response_translator::formatter::ResponseFormatter;
use response_translator::gemini::GeminiProvider;
use response_translator::i18n::MetricsReport;
use response_translator::middleware::{
    translate_response, MiddlewareOptions, RequestTranslator, TranslationLayerState,
};
use response_translator::orchestrator::TranslationOrchestrator;
use response_translator::security::is_authorized;
use response_translator::translator::Translator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<TranslationOrchestrator>,
    admin_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("response_translator=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let provider = GeminiProvider::from_config(&config)
        .context("Failed to initialize Gemini provider")?;
    let translator = Arc::new(Translator::new(
        Arc::new(provider),
        config.translator_config(),
    ));
    info!(
        "Using {} ({}) for translation",
        translator.provider_name(),
        config.gemini_model
    );

    if config.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY not set, cache administration is disabled");
    }

    let orchestrator = Arc::new(
        TranslationOrchestrator::new(translator)
            .with_formatter(ResponseFormatter::new(config.format_options())),
    );

    let app = build_router(
        orchestrator,
        config.middleware_options(),
        config.admin_api_key.clone(),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(
    orchestrator: Arc<TranslationOrchestrator>,
    options: MiddlewareOptions,
    admin_api_key: Option<String>,
) -> Router {
    let layer_state = Arc::new(TranslationLayerState::new(orchestrator.clone(), options));

    let translated = Router::new()
        .route("/api/greeting", get(greeting))
        .route("/api/text", get(plain_text))
        .route_layer(from_fn_with_state(layer_state, translate_response));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/admin/cache/clear", post(clear_cache))
        .merge(translated)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            orchestrator,
            admin_api_key,
        })
}

async fn health() -> &'static str {
    "OK"
}

async fn greeting(Extension(translator): Extension<RequestTranslator>) -> Json<Value> {
    Json(json!({
        "message": "Hello, welcome to our service!",
        "description": "This response was written in English.",
        "items": [
            { "title": "Fast delivery", "price": 10 },
            { "title": "Friendly support", "price": 0 }
        ],
        "footer": translator.translate("Thank you for visiting").await,
    }))
}

async fn plain_text() -> &'static str {
    "This is a plain text response."
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.orchestrator.translator().metrics().report())
}

async fn clear_cache(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !is_authorized(&headers, state.admin_api_key.as_deref()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        );
    }

    let cleared = state.orchestrator.clear_caches();
    info!(
        "Cleared {} cached translations and {} cached detections",
        cleared.translations, cleared.detections
    );
    (StatusCode::OK, Json(json!({ "cleared": cleared })))
}
