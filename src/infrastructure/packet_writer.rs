//! Writing archives and migration packets to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, MigrationChunk, Result};

/// Writes each packet to `dir/<filename>`, creating `dir` if needed.
///
/// # Errors
/// Returns error if the directory or any file cannot be written.
pub fn write_packets(dir: &Path, packets: &[MigrationChunk]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::io(format!("Failed to create directory {}", dir.display()), e)
    })?;

    packets
        .iter()
        .map(|packet| {
            let path = dir.join(&packet.filename);
            write_text(&path, &packet.content)?;
            tracing::debug!(
                part = packet.part_number,
                total = packet.total_parts,
                "Wrote {}",
                path.display()
            );
            Ok(path)
        })
        .collect()
}

/// Writes text to `path`, creating parent directories.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }

    fs::write(path, content)
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn packet(part: usize, total: usize) -> MigrationChunk {
        MigrationChunk {
            filename: format!("Chat_Part{part}_Grok.txt"),
            content: format!("body {part}"),
            part_number: part,
            total_parts: total,
        }
    }

    #[test]
    fn test_write_packets() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("packets");

        let paths = write_packets(&out, &[packet(1, 2), packet(2, 2)]).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "body 2");
        assert!(out.join("Chat_Part1_Grok.txt").exists());
    }

    #[test]
    fn test_write_text_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("chat.md");

        write_text(&path, "# Chat").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# Chat");
    }
}
