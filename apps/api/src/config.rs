use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default CORS allow-list: the admin SPA and marketing site dev servers.
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:8080,http://localhost:3000";

/// Application configuration loaded from environment variables.
/// Every path and limit the store and media pipeline need is carried here,
/// so nothing reads process-wide state after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the per-collection JSON files.
    pub data_dir: PathBuf,
    /// Directory holding uploaded files and their derivatives.
    pub uploads_dir: PathBuf,
    pub cors_origins: Vec<String>,
    /// Optional absolute prefix for returned upload URLs (e.g. behind a CDN).
    /// When unset, URLs are server-relative (`/uploads/<name>`).
    pub public_base_url: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            uploads_dir: PathBuf::from(
                std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            public_base_url: std::env::var("PUBLIC_BASE_URL").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
