// medassist - Gemini-backed health information assistant
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod server;
pub mod uploads;
pub mod utils;
pub mod vision;
