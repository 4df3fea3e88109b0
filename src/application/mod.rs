//! Application layer - use cases and orchestration.
//!
//! This layer rebuilds conversations from an export and turns them into
//! archives, migration packets and persona reports.

pub mod chunker;
pub mod formatter;
pub mod parser;
pub mod persona;
pub mod reconstruct;

pub use chunker::build_packets;
pub use formatter::{
    format_archive_markdown, format_conversations_json, format_conversations_table,
    format_persona, format_stats, format_transcript, OutputFormat,
};
pub use parser::{parse_export, parse_export_str, parse_export_with_stats};
pub use persona::{analyze_persona, ClassificationSample, PersonaClassifier, PersonaReport};
pub use reconstruct::reconstruct;
