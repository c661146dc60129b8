//! HTTP server implementation for the pages

use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::handlers;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the router for the library and watch pages
pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let home_route = format!("/{}", config.catalog.home_page.trim_start_matches('/'));
    let catalog_route = format!("/{}", config.catalog.catalog_page.trim_start_matches('/'));
    let player_route = format!("/{}", config.catalog.player_page.trim_start_matches('/'));
    let static_dir = config.server.static_dir.clone();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/videos.json", get(catalog_handler))
        .route("/", get(home_handler))
        .route(&home_route, get(home_handler))
        .route(&catalog_route, get(library_handler))
        .route(&player_route, get(watch_handler));

    let app = match static_dir {
        Some(dir) => {
            info!("📁 Serving static files from {}", dir.display());
            app.fallback_service(ServeDir::new(dir))
        }
        None => app.fallback(not_found_handler),
    };

    app.with_state(AppState { config }).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

/// Configure and start the HTTP server
pub async fn start_http_server(config: Arc<Config>, port: u16) -> Result<()> {
    let app = router(config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 Page server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check()))
}

async fn catalog_handler(State(state): State<AppState>) -> impl IntoResponse {
    match handlers::catalog_document(&state.config).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => {
            warn!("Catalog request failed: {}", e);
            let status = StatusCode::BAD_GATEWAY;
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}

async fn home_handler(State(state): State<AppState>) -> Html<String> {
    Html(handlers::home(&state.config).await)
}

async fn library_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    Html(handlers::library(&state.config, query.as_deref().unwrap_or("")).await)
}

async fn watch_handler(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    Html(handlers::watch(&state.config, query.as_deref().unwrap_or("")).await)
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
