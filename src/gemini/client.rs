// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use zeroize::Zeroizing;

/// Client for the Google Gemini API.
///
/// One `generateContent` call per chat request. There is no retry: any
/// failure is returned to the handler as [`AppError::Upstream`].
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Zeroizing<String>,
    sanitize_logs: bool,
}

impl GeminiClient {
    /// Build a client with a pooled HTTP connection. The request timeout is
    /// only set when configured.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: Zeroizing::new(config.api_key.clone()),
            sanitize_logs: true,
        })
    }

    /// Whether upstream error bodies are scrubbed of API keys before logging.
    pub fn with_log_sanitizing(mut self, enabled: bool) -> Self {
        self.sanitize_logs = enabled;
        self
    }

    /// Model every request is sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call Gemini `generateContent` (blocking, non-streaming).
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Calling generateContent API for model: {}", self.model);

        let start = Instant::now();
        let result = self.send(&url, request).await;
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(response) => {
                metrics::record_gemini_call(&self.model, 200, elapsed);
                if let Some(usage) = &response.usage_metadata {
                    metrics::record_tokens(
                        &self.model,
                        usage.prompt_token_count.unwrap_or(0),
                        usage.candidates_token_count.unwrap_or(0),
                    );
                }
            }
            Err(UpstreamFailure { status, .. }) => {
                metrics::record_gemini_call(&self.model, *status, elapsed);
            }
        }

        result.map_err(|failure| AppError::Upstream(failure.message))
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, UpstreamFailure> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                UpstreamFailure::new(0, format!("HTTP error: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            UpstreamFailure::new(
                status.as_u16(),
                format!("Failed to read response body: {}", e),
            )
        })?;

        if !status.is_success() {
            let detail = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            let detail = if self.sanitize_logs {
                sanitize(&detail)
            } else {
                detail
            };
            error!("Gemini API error: HTTP {} - {}", status, detail);
            return Err(UpstreamFailure::new(
                status.as_u16(),
                format!("HTTP {}: {}", status, detail),
            ));
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            UpstreamFailure::new(status.as_u16(), format!("Response parsing error: {}", e))
        })
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }
}

struct UpstreamFailure {
    status: u16,
    message: String,
}

impl UpstreamFailure {
    fn new(status: u16, message: String) -> Self {
        Self { status, message }
    }
}
