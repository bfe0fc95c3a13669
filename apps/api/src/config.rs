use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::env_file;

/// Maximum accepted request body size: 16 MiB, enforced by the server layer
/// before any handler runs.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_PORT: u16 = 5000;

/// Application configuration, built once at startup and passed by ownership
/// into the app factory. Every path defaults to a location under the process
/// working directory and can be overridden through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base = std::env::current_dir().context("Cannot determine working directory")?;

        // Fill in missing variables from an optional .env at the project
        // root; values already in the environment are never overwritten.
        env_file::load(&base.join(".env"));

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| {
                format!("sqlite://{}", base.join("database.db").display())
            }),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| base.join("uploads")),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| base.join("frontend").join("dist")),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: match std::env::var("PORT") {
                Ok(raw) => raw
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                Err(_) => DEFAULT_PORT,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
