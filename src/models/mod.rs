//! Data models for the upstream Google Gemini API.
//!
//! Request and response bodies for `generateContent` live in `gemini`.

// Author: kelexine (https://github.com/kelexine)

pub mod gemini;

pub use gemini::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
