//! JSON parsing for ChatGPT `conversations.json` exports.
//!
//! Handles conversion from the raw export array to parsed conversations.
//! Only the top-level shape is validated; malformed entries are skipped.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{AppError, ExportStats, ParsedConversation, Result, Role};

use super::reconstruct::reconstruct;

/// Title used when an entry has none.
pub const UNTITLED: &str = "Untitled Conversation";

/// Raw conversation entry as stored in the export.
///
/// Every field is lenient: a value of the wrong type reads as absent, so
/// one odd field never costs the whole conversation.
#[derive(Debug, Deserialize)]
pub struct RawConversation {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub create_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub mapping: Option<HashMap<String, RawNode>>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_node: Option<String>,
}

/// One vertex of a conversation's mapping graph.
#[derive(Debug, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<RawMessage>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<String>,
    #[serde(rename = "children", default, deserialize_with = "lenient")]
    pub _children: Vec<String>,
}

/// Message payload carried by a node.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<RawAuthor>,
    #[serde(default, deserialize_with = "lenient")]
    pub create_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

/// Content parts are usually strings; anything else is ignored later.
#[derive(Debug, Deserialize)]
pub struct RawContent {
    #[serde(default, deserialize_with = "lenient")]
    pub parts: Option<Vec<Value>>,
}

/// Reads a field, falling back to its default when the value has the
/// wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Parses an export held in a string.
///
/// # Errors
/// Returns `JsonParse` if the text is not JSON, or `InvalidFormat` if the
/// top level is not an array.
pub fn parse_export_str(json: &str) -> Result<(Vec<ParsedConversation>, ExportStats)> {
    let raw: Value = serde_json::from_str(json).map_err(AppError::json_parse)?;
    parse_export_with_stats(raw)
}

/// Parses the export array into conversations, most recent first.
///
/// # Errors
/// Returns `InvalidFormat` if `raw` is not an array.
pub fn parse_export(raw: Value) -> Result<Vec<ParsedConversation>> {
    parse_export_with_stats(raw).map(|(conversations, _)| conversations)
}

/// Like [`parse_export`], also returning counts of what was kept and
/// skipped.
///
/// # Errors
/// Returns `InvalidFormat` if `raw` is not an array.
pub fn parse_export_with_stats(raw: Value) -> Result<(Vec<ParsedConversation>, ExportStats)> {
    let Value::Array(entries) = raw else {
        return Err(AppError::InvalidFormat {
            message: "expected an array of conversations".into(),
        });
    };

    let mut stats = ExportStats {
        total_records: entries.len(),
        ..Default::default()
    };
    let mut conversations = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let raw: RawConversation = match serde_json::from_value(entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(index, "Skipping malformed conversation: {}", e);
                stats.skipped_records += 1;
                continue;
            }
        };

        match parse_conversation(raw) {
            Some(Ok(conv)) => conversations.push(conv),
            Some(Err(id)) => {
                tracing::debug!(id = %id, "Skipping conversation with no usable messages");
                stats.empty_conversations += 1;
            }
            None => {
                tracing::debug!(index, "Skipping conversation without id or mapping");
                stats.skipped_records += 1;
            }
        }
    }

    // Stable sort keeps export order for equal creation times
    conversations.sort_by(|a, b| b.create_time.total_cmp(&a.create_time));

    stats.conversation_count = conversations.len();
    for conv in &conversations {
        stats.total_messages += conv.message_count();
        stats.user_messages += conv.count_role(Role::User);
        stats.assistant_messages += conv.count_role(Role::Assistant);
        stats.system_messages += conv.count_role(Role::System);
    }

    tracing::info!(
        "Parsed {} conversations with {} messages ({} skipped, {} empty)",
        stats.conversation_count,
        stats.total_messages,
        stats.skipped_records,
        stats.empty_conversations
    );

    Ok((conversations, stats))
}

/// Reconstructs one entry.
///
/// `None` when the entry lacks an id or mapping; `Some(Err(id))` when it
/// reconstructs to zero messages.
fn parse_conversation(raw: RawConversation) -> Option<std::result::Result<ParsedConversation, String>> {
    let id = raw.id.filter(|id| !id.is_empty())?;
    let mapping = raw.mapping?;

    let messages = reconstruct(&mapping, raw.current_node.as_deref());
    if messages.is_empty() {
        return Some(Err(id));
    }

    let title = raw
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    Some(Ok(ParsedConversation {
        id,
        title,
        create_time: raw.create_time.unwrap_or_default(),
        messages,
    }))
}
