use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::extraction::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Application configuration loaded from environment variables.
/// Nothing is required at startup: a missing `GEMINI_API_KEY` surfaces as an
/// extraction error, and without `REDIS_URL` snapshots are kept on disk.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub redis_url: Option<String>,
    pub snapshot_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            redis_url: optional_env("REDIS_URL"),
            snapshot_dir: optional_env("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }

    /// Request body limit for an upload carrying a resume and a job description.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_mul(2)
            .saturating_add(64 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            redis_url: None,
            snapshot_dir: PathBuf::from("./data"),
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// An unset or blank variable counts as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
