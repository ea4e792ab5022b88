// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, GEMINI_API_CALLS, GEMINI_API_DURATION, IMAGES_REJECTED, REQUESTS_TOTAL,
    REQUEST_DURATION, TOKENS_TOTAL, UPLOADS_TOTAL,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record Gemini API call metrics. Status `0` means no response.
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record token usage
pub fn record_tokens(model: &str, input: u32, output: u32) {
    if input > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "input"])
            .inc_by(input as f64);
    }
    if output > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "output"])
            .inc_by(output as f64);
    }
}

pub fn record_upload(stored: bool) {
    let result = if stored { "stored" } else { "rejected" };
    UPLOADS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_image_rejected(reason: &str) {
    IMAGES_REJECTED.with_label_values(&[reason]).inc();
}
