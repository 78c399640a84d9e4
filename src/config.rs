use std::path::PathBuf;

use anyhow::Context;

/// Runtime configuration. Every value defaults to the service's fixed
/// constants; environment variables override them.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    /// Static file listener (the web server).
    pub web_port: u16,
    /// Item API listener.
    pub api_port: u16,
    pub public_dir: PathBuf,
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_port: std::env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("WEB_PORT must be a valid port number")?,
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("API_PORT must be a valid port number")?,
            public_dir: std::env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "items.json".to_string())
                .into(),
        })
    }
}
