use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use frx_pdf_service::{api, config::Config, render::FrxEngine, render::ReportRenderer, state::AppState};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting frx PDF service...");

    let config = Config::load()?;
    tracing::info!(
        "Configuration loaded (templates: {})",
        config.templates.dir.display()
    );

    let default_template = config.template_path(&config.templates.default_template);
    if !default_template.exists() {
        tracing::warn!(
            "Default template not found at {}. The generate endpoint will reject requests until it exists; generate-fallback keeps working.",
            default_template.display()
        );
    }

    let renderer: Arc<dyn ReportRenderer> = Arc::new(FrxEngine::new());
    let state = AppState::new(renderer, config.clone());

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("frx PDF service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /api/pdf/generate");
    tracing::info!("  - POST /api/pdf/generate-fallback");
    tracing::info!("  - GET  /api/pdf/health");
    tracing::info!("  - GET  /api/pdf/template-check");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_request_size_mb * 1024 * 1024;

    Router::new()
        .route("/api/pdf/generate", post(api::generate))
        .route("/api/pdf/generate-fallback", post(api::generate_fallback))
        .route("/api/pdf/health", get(api::health_check))
        .route("/api/pdf/template-check", get(api::template_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,frx_pdf_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
