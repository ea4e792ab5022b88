// CLI module for medassist
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// medassist - Gemini-backed health information assistant
#[derive(Parser, Debug)]
#[command(name = "medassist", version, about, long_about = None)]
pub struct Args {
    /// Config file to load instead of ~/.medassist/config.toml
    #[arg(short, long, env = "MEDASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for uploaded files (overrides uploads.dir)
    #[arg(long)]
    pub uploads_dir: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.uploads_dir {
            config.uploads.dir = dir.clone();
        }
    }
}
