//! Infrastructure layer - external adapters (filesystem, network).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod export_reader;
pub mod gemini;
pub mod packet_writer;

pub use config::{ensure_config_exists, load_config, render_config};
pub use export_reader::load_export;
pub use gemini::GeminiClassifier;
pub use packet_writer::{write_packets, write_text};
