//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# chat-migrate configuration
# Auto-generated - edit as needed

[migration]
# Maximum characters per packet body (default: 50000)
size_limit = 50000

# Target platform when --platform is not given: Gemini, Grok or Claude
platform = "Gemini"

# Directory packets are written to
output_dir = "packets"

[input]
# Default export file when --input is not given (optional)
# export_path = "/path/to/conversations.json"

[classifier]
# Environment variable holding the API key for remote persona analysis
api_key_env = "API_KEY"

# Model used for remote persona analysis
model = "gemini-2.5-flash"

# Request timeout in seconds
timeout_secs = 30

# Trailing messages sampled, and characters kept from each
sample_messages = 10
sample_chars = 200
"#;

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = AppConfig::config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Render configuration as TOML.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })
}

/// Create the default configuration file at `path` if it doesn't exist.
///
/// Returns whether a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Create the default configuration file if it doesn't exist.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<bool> {
    ensure_config_at(&AppConfig::config_file_path())
}
