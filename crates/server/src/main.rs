use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

mod ai;
mod routes;

use ai::AiClient;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<AiClient>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/generate/diagram", post(routes::generate_diagram))
        .route("/api/generate/icon", post(routes::generate_icon))
        .route("/api/generate/shape", post(routes::generate_shape))
        .route("/api/generate/layout", post(routes::generate_layout))
        .route("/api/generate/style", post(routes::generate_style))
        .route("/api/generate/assets", post(routes::generate_assets))
        .route("/api/layout/resolve", post(routes::resolve_position))
        .route("/api/layout/auto", post(routes::auto_layout))
        .route("/api/style/apply", post(routes::apply_style))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,shared=info".into()),
        )
        .init();

    let ai = AiClient::from_env();
    if !ai.has_key() {
        tracing::warn!("ANTHROPIC_API_KEY not set; generation endpoints return local fallbacks");
    }
    let state = AppState { ai: Arc::new(ai) };

    let addr = std::env::var("STACKVIZ_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {e}");
    }
}
