// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{AppError, FormError};
use crate::metrics;
use crate::prompt::{build_prompt, to_gemini_request};
use crate::vision::{is_allowed, validate_image, ImagePayload};
use askama::Template;
use axum::{
    extract::{multipart::MultipartRejection, rejection::FormRejection, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Reply used when Gemini answers without any text.
pub const NO_REPLY_FALLBACK: &str = "Sorry, I could not generate a response.";

// ============================================================================
// INDEX
// ============================================================================

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    model: &'a str,
    max_upload_mb: usize,
}

pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = IndexTemplate {
        model: &state.config.gemini.model,
        max_upload_mb: state.config.server.max_body_bytes / (1024 * 1024),
    };
    Ok(Html(page.render()?))
}

// ============================================================================
// CHAT
// ============================================================================

/// Body of `POST /ai_chat`. Every field may be omitted or null.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub problem_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Paths previously returned by `/upload_file`, in prompt order.
    #[serde(default)]
    pub file_info: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Handler for /ai_chat
pub async fn chat_handler(
    State(state): State<AppState>,
    body: String, // Raw JSON for clearer deserialization errors
) -> Result<Json<ChatReply>, AppError> {
    let req: ChatRequest = serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to deserialize chat request: {}", e);
        AppError::Validation(format!("Invalid JSON body: {}", e))
    })?;

    let file_paths = req.file_info.unwrap_or_default();
    info!(
        "Received chat request: topic={}, message={}, files={}",
        req.problem_description.as_deref().map_or(false, |s| !s.is_empty()),
        req.message.as_deref().map_or(false, |s| !s.is_empty()),
        file_paths.len()
    );

    let images = load_images(&state, &file_paths).await?;

    let segments = build_prompt(
        req.problem_description.as_deref(),
        images,
        req.message.as_deref(),
    );
    if segments.is_empty() {
        warn!("Chat request carries no topic, image or message; sending an empty prompt");
    }

    let response = state
        .gemini_client
        .generate_content(&to_gemini_request(segments))
        .await?;

    let reply = response.text().unwrap_or_else(|| {
        warn!(
            "Gemini returned no text (block reason: {:?})",
            response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
        );
        NO_REPLY_FALLBACK.to_string()
    });

    debug!("Chat reply is {} chars", reply.len());
    Ok(Json(ChatReply { reply }))
}

/// Read and validate every referenced file, in order.
///
/// A missing, unreadable or corrupt file aborts the request. A decodable
/// image in a format Gemini is not sent is skipped.
async fn load_images(state: &AppState, paths: &[String]) -> Result<Vec<ImagePayload>, AppError> {
    let mut images = Vec::with_capacity(paths.len());

    for path in paths {
        let data = state.uploads.read(path).await.map_err(|e| {
            warn!("Cannot load {}: {}", path, e);
            e
        })?;

        let validated = tokio::task::spawn_blocking(move || validate_image(data))
            .await
            .map_err(|e| AppError::Internal(format!("Image validation task failed: {}", e)))?;

        match validated {
            Ok(image) => images.push(image),
            Err(AppError::InvalidImage(reason)) => {
                warn!("Unsupported file type for {}: {}", path, reason);
                metrics::record_image_rejected("unsupported_format");
            }
            Err(e) => {
                warn!("Cannot process {}: {}", path, e);
                metrics::record_image_rejected("undecodable");
                return Err(e);
            }
        }
    }

    Ok(images)
}

// ============================================================================
// UPLOAD
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
}

/// Handler for /upload_file
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, FormError> {
    match receive_upload(&state, multipart).await {
        Ok(path) => {
            metrics::record_upload(true);
            Ok(Json(UploadResponse {
                status: "success".to_string(),
                filename: path.to_string_lossy().into_owned(),
            }))
        }
        Err(e) => {
            metrics::record_upload(false);
            Err(FormError(e))
        }
    }
}

async fn receive_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PathBuf, AppError> {
    let no_file_part = || AppError::Validation("No file part".to_string());

    let mut multipart = multipart.map_err(|e| {
        warn!("Upload is not a multipart form: {}", e);
        no_file_part()
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        // A part without a filename parameter is a plain form field
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(no_file_part)?;

    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    if !is_allowed(&filename) {
        info!("Rejected upload with disallowed extension: {}", filename);
        return Err(AppError::Validation("Invalid file type".to_string()));
    }

    state.uploads.store(&filename, &data).await
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the upload size limit".to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

// ============================================================================
// BOOKING
// ============================================================================

/// Form fields of `POST /book_appointment`.
#[derive(Debug, Default, Deserialize)]
pub struct BookingForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub doctor: Option<String>,
    pub datetime: Option<String>,
}

impl BookingForm {
    fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.doctor, &self.datetime]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Handler for /book_appointment. Nothing is stored; the request is logged.
pub async fn booking_handler(
    form: Result<Form<BookingForm>, FormRejection>,
) -> Result<Json<StatusResponse>, FormError> {
    let all_required = || FormError(AppError::Validation("All fields are required.".to_string()));

    let Form(booking) = form.map_err(|e| {
        warn!("Unreadable booking form: {}", e);
        all_required()
    })?;

    if !booking.is_complete() {
        return Err(all_required());
    }

    info!(
        patient = booking.name.as_deref().unwrap_or_default(),
        email = booking.email.as_deref().unwrap_or_default(),
        doctor = booking.doctor.as_deref().unwrap_or_default(),
        datetime = booking.datetime.as_deref().unwrap_or_default(),
        "Booking requested"
    );

    Ok(Json(StatusResponse {
        status: "success".to_string(),
        message: "Booking request submitted successfully!".to_string(),
    }))
}

// ============================================================================
// HEALTH & METRICS
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "Model {} via {}",
            state.gemini_client.model(),
            state.gemini_client.base_url()
        ),
    };
    checks.insert("configuration".to_string(), config_check);

    let uploads_check = match state.uploads.ensure_dir().await {
        Ok(()) => HealthCheck {
            status: "ok".to_string(),
            message: format!("Writable: {}", state.uploads.dir().display()),
        },
        Err(e) => {
            overall_status = HealthStatus::Degraded;
            HealthCheck {
                status: "error".to_string(),
                message: format!("{}: {}", state.uploads.dir().display(), e),
            }
        }
    };
    checks.insert("uploads_directory".to_string(), uploads_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> Response {
    match metrics::gather_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => AppError::Internal(format!("Failed to encode metrics: {}", e)).into_response(),
    }
}
