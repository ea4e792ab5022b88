// Prompt segments → Gemini request
// Author: kelexine (https://github.com/kelexine)

use super::Segment;
use crate::models::gemini::{Content, GenerateContentRequest, InlineData, Part};
use base64::Engine;
use tracing::debug;

/// Wrap the segments as a single user turn, one part per segment.
pub fn to_gemini_request(segments: Vec<Segment>) -> GenerateContentRequest {
    let parts: Vec<Part> = segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Part::Text {
                text,
                thought: None,
            },
            Segment::Image(image) => Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(image.data()),
                },
            },
        })
        .collect();

    debug!("Built Gemini request with {} parts", parts.len());

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
    }
}
