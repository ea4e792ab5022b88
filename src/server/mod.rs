//! Axum-based HTTP server for medassist.
//!
//! Serves the landing page, the Gemini-backed chat endpoint, file uploads
//! and the appointment form, plus health and Prometheus endpoints.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints.
//! - `middleware`: Request ID tracking and request metrics.
//! - `routes`: The router configuration and shared state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{
    BookingForm, ChatReply, ChatRequest, HealthResponse, HealthStatus, StatusResponse,
    UploadResponse, NO_REPLY_FALLBACK,
};
pub use routes::{create_router, AppState};
