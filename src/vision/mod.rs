//! Image validation for files referenced by chat requests.
//!
//! Uploaded files are checked twice: by extension when they arrive
//! ([`is_allowed`]) and by content when a chat request references them
//! ([`validate_image`]). Only the content check decides the MIME type that
//! is sent to Gemini.
//!
//! # Submodules
//!
//! - `models`: The validated payload type, the MIME table and size limits.
//! - `validate`: Decoding, format detection and the extension gate.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod validate;

pub use models::ImagePayload;
pub use validate::{is_allowed, validate_image};
