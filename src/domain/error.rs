//! Domain-level error types for chat-migrate.
//!
//! All errors are typed with `thiserror`. Per-record problems inside an
//! export (missing ids, dangling parents, non-text parts) are not errors;
//! they are skipped during parsing.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// The export's top level is not an array of conversations.
    #[error("Invalid export format: {message}")]
    InvalidFormat { message: String },

    /// Invalid or missing data requested by the user.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Remote persona classification failed or is not configured.
    ///
    /// Always recoverable: callers fall back to the local heuristic.
    #[error("Classifier error: {message}")]
    Classifier { message: String },
}

impl AppError {
    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a classifier error.
    pub fn classifier(message: impl Into<String>) -> Self {
        Self::Classifier {
            message: message.into(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_message() {
        let err = AppError::InvalidFormat {
            message: "expected an array of conversations".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid export format: expected an array of conversations"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = AppError::io(
            "Failed to read export",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
