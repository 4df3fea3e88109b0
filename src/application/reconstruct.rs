//! Linear transcript reconstruction from an export's node mapping.
//!
//! A conversation is stored as a tree of nodes; the active branch is
//! recovered by walking parent links backward from the current node.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::domain::{ParsedMessage, Role};

use super::parser::{RawMessage, RawNode};

/// Walks `mapping` from `leaf_id` to the root and returns the usable
/// messages oldest first.
///
/// A missing leaf yields no messages. A dangling parent reference ends the
/// walk. Each node is visited at most once and the walk takes at most
/// `mapping.len()` steps, so cyclic parent chains terminate.
#[must_use]
pub fn reconstruct(mapping: &HashMap<String, RawNode>, leaf_id: Option<&str>) -> Vec<ParsedMessage> {
    let Some(leaf_id) = leaf_id.filter(|id| !id.is_empty()) else {
        return Vec::new();
    };

    let mut messages = Vec::new();
    let mut current = Some(leaf_id);
    let mut visited: HashSet<&str> = HashSet::new();

    while let Some(node_id) = current {
        if visited.len() == mapping.len() || !visited.insert(node_id) {
            tracing::debug!(leaf = leaf_id, node = node_id, "Parent chain is cyclic, stopping walk");
            break;
        }

        let Some(node) = mapping.get(node_id) else {
            tracing::debug!(node = node_id, "Dangling node reference, stopping walk");
            break;
        };

        let fallback_id = node.id.as_deref().unwrap_or(node_id);
        if let Some(message) = node.message.as_ref().and_then(|m| to_parsed(m, fallback_id)) {
            messages.push(message);
        }

        current = node.parent.as_deref().filter(|p| !p.is_empty());
    }

    messages.reverse();
    messages
}

/// Builds a message from a raw node payload, if it carries usable text.
fn to_parsed(message: &RawMessage, node_id: &str) -> Option<ParsedMessage> {
    let role = message
        .author
        .as_ref()
        .and_then(|a| a.role.as_deref())
        .and_then(Role::from_export)?;

    let parts = message.content.as_ref()?.parts.as_ref()?;
    let content = join_text_parts(parts)?;

    Some(ParsedMessage {
        id: message
            .id
            .clone()
            .unwrap_or_else(|| node_id.to_string()),
        role,
        content,
        timestamp: message.create_time,
    })
}

/// Joins the string parts with newlines; `None` if nothing but whitespace
/// remains. Non-string parts (images, attachments) are ignored.
fn join_text_parts(parts: &[Value]) -> Option<String> {
    let text = parts
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
