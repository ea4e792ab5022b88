// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    booking_handler, chat_handler, health_handler, index_handler, metrics_handler,
    upload_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::uploads::UploadStore;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gemini_client: Arc<GeminiClient>,
    pub uploads: UploadStore,
}

pub fn create_router(config: AppConfig, gemini_client: GeminiClient) -> Result<Router> {
    let body_limit = config.server.max_body_bytes;
    let state = AppState {
        uploads: UploadStore::new(&config.uploads.dir),
        config: Arc::new(config),
        gemini_client: Arc::new(gemini_client),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/ai_chat", post(chat_handler))
        .route("/upload_file", post(upload_handler))
        .route("/book_appointment", post(booking_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        // Multipart extraction has its own default cap; lift it to match
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
