//! Domain layer - core types shared by every other layer.
//!
//! This layer contains pure domain models, platform rules and error types
//! without any external dependencies (network, filesystem, etc.).

pub mod config;
pub mod error;
pub mod models;
pub mod platform;

pub use config::{AppConfig, ClassifierConfig, DEFAULT_SIZE_LIMIT};
pub use error::{AppError, Result};
pub use models::{
    ExportStats, MigrationChunk, ParsedConversation, ParsedMessage, PersonaAnalysis, Role,
};
pub use platform::TargetPlatform;
