//! Configuration loader
//!
//! Loads SDK configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `REQNEST_BASE_URL`: Backend base URL (required)
//! - `REQNEST_TIMEOUT_SECS`: Request timeout in seconds (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./reqnest.json` or `./reqnest.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../reqnest.json` / `../reqnest.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use reqnest_domain::constants::DEFAULT_TIMEOUT_SECS;
use reqnest_domain::{ReqNestError, Result};

use super::SdkConfig;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
/// Whatever the source, the result is validated before being returned.
///
/// # Errors
/// Returns `ReqNestError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The base URL is missing or malformed
pub fn load() -> Result<SdkConfig> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `ReqNestError::Config` if `REQNEST_BASE_URL` is missing or
/// `REQNEST_TIMEOUT_SECS` has an invalid value.
pub fn load_from_env() -> Result<SdkConfig> {
    let base_url = env_var("REQNEST_BASE_URL")?;

    let timeout_secs = match std::env::var("REQNEST_TIMEOUT_SECS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| ReqNestError::Config(format!("Invalid timeout: {}", e)))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    Ok(SdkConfig { base_url, timeout_secs })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ReqNestError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<SdkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ReqNestError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ReqNestError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ReqNestError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<SdkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ReqNestError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ReqNestError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ReqNestError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("reqnest.json"),
            cwd.join("reqnest.toml"),
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("../reqnest.json"),
            cwd.join("../reqnest.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("reqnest.json"),
                exe_dir.join("reqnest.toml"),
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ReqNestError::Config(format!("Missing required environment variable: {}", key))
    })
}
