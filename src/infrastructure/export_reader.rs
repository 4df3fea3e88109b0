//! Reading ChatGPT exports from disk.

use std::fs;
use std::path::Path;

use crate::application::parse_export_str;
use crate::domain::{AppError, ExportStats, ParsedConversation, Result};

/// Reads and parses a `conversations.json` export.
///
/// # Errors
/// Returns error if the file cannot be read, is not JSON, or is not an
/// array of conversations.
pub fn load_export(path: &Path) -> Result<(Vec<ParsedConversation>, ExportStats)> {
    tracing::info!("Reading export: {}", path.display());

    if !path.exists() {
        return Err(AppError::Config {
            message: format!("Export file not found: {}", path.display()),
        });
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;

    parse_export_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_export(&dir.path().join("conversations.json")).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_object_export_is_invalid_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        fs::write(&path, r#"{"id": "x"}"#).unwrap();

        assert!(matches!(
            load_export(&path),
            Err(AppError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_loads_conversations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        fs::write(
            &path,
            r#"[{
                "id": "c1",
                "title": "Hello",
                "create_time": 1700000000.25,
                "current_node": "b",
                "mapping": {
                    "a": { "id": "a", "message": null, "parent": null, "children": ["b"] },
                    "b": {
                        "id": "b",
                        "parent": "a",
                        "children": [],
                        "message": {
                            "id": "mb",
                            "author": { "role": "user", "name": null, "metadata": {} },
                            "create_time": null,
                            "content": { "content_type": "text", "parts": ["Hi there"] },
                            "status": "finished_successfully"
                        }
                    }
                }
            }]"#,
        )
        .unwrap();

        let (conversations, stats) = load_export(&path).unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].messages[0].content, "Hi there");
        assert_eq!(stats.total_records, 1);
    }
}
