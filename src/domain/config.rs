//! Application configuration.
//!
//! Every section defaults independently, so a partial `config.toml`
//! only overrides the keys it names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::platform::TargetPlatform;

/// Default maximum packet body size, in characters.
pub const DEFAULT_SIZE_LIMIT: usize = 50_000;

/// Packet generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Maximum characters accumulated into one packet body.
    #[serde(default = "default_size_limit")]
    pub size_limit: usize,

    /// Platform used when none is given on the command line.
    #[serde(default)]
    pub platform: TargetPlatform,

    /// Directory packets are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            size_limit: default_size_limit(),
            platform: TargetPlatform::default(),
            output_dir: default_output_dir(),
        }
    }
}

const fn default_size_limit() -> usize {
    DEFAULT_SIZE_LIMIT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("packets")
}

/// Input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Export file used when `--input` is not given.
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

/// Remote persona classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of trailing messages sent for analysis.
    #[serde(default = "default_sample_messages")]
    pub sample_messages: usize,

    /// Characters kept from each sampled message.
    #[serde(default = "default_sample_chars")]
    pub sample_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            sample_messages: default_sample_messages(),
            sample_chars: default_sample_chars(),
        }
    }
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_sample_messages() -> usize {
    10
}

const fn default_sample_chars() -> usize {
    200
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Packet generation.
    #[serde(default)]
    pub migration: MigrationConfig,

    /// Input selection.
    #[serde(default)]
    pub input: InputConfig,

    /// Remote classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chat-migrate")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.migration.size_limit, 50_000);
        assert_eq!(config.migration.platform, TargetPlatform::Gemini);
        assert_eq!(config.classifier.sample_messages, 10);
        assert_eq!(config.classifier.sample_chars, 200);
        assert!(config.input.export_path.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [migration]
            platform = "Claude"
            "#,
        )
        .unwrap();
        assert_eq!(config.migration.platform, TargetPlatform::Claude);
        assert_eq!(config.migration.size_limit, DEFAULT_SIZE_LIMIT);
        assert_eq!(config.classifier.model, "gemini-2.5-flash");
    }
}
