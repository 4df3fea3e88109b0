//! Domain models for reconstructed chat data.
//!
//! These models represent conversations rebuilt from a ChatGPT export and
//! the migration packets generated from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user (human).
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System message.
    System,
}

impl Role {
    /// Parses an export role string. Tool and other roles are not kept.
    #[must_use]
    pub fn from_export(role: &str) -> Option<Self> {
        match role {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Role string as it appears in the export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Assistant => write!(f, "Assistant"),
            Self::System => write!(f, "System"),
        }
    }
}

/// One chronological turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Message identifier (falls back to the node id).
    pub id: String,
    /// Who wrote the message.
    pub role: Role,
    /// All string content parts joined by newlines.
    pub content: String,
    /// Unix seconds, when the export carries one.
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// A conversation rebuilt from the export's node mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedConversation {
    /// Conversation identifier.
    pub id: String,
    /// Title, or the untitled placeholder.
    pub title: String,
    /// Creation time in Unix seconds.
    pub create_time: f64,
    /// Messages, oldest first.
    pub messages: Vec<ParsedMessage>,
}

impl ParsedConversation {
    /// Number of reconstructed messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.create_time)
    }

    /// Short form of the id for listings.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Count of messages written by the given role.
    #[must_use]
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// Title with every non-alphanumeric character replaced by `_`.
    #[must_use]
    pub fn sanitized_title(&self) -> String {
        self.title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Filename for the Markdown archive export.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}.md", self.sanitized_title().to_lowercase())
    }
}

/// Converts Unix seconds (possibly fractional) to a UTC timestamp.
#[must_use]
pub fn to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// One size-bounded, platform-formatted packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationChunk {
    /// Suggested destination filename.
    pub filename: String,
    /// Header, formatted messages and footer.
    pub content: String,
    /// 1-based part number.
    pub part_number: usize,
    /// Number of parts in the batch.
    pub total_parts: usize,
}

impl MigrationChunk {
    /// Whether this is the last packet of its batch.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.part_number == self.total_parts
    }
}

/// Result of a persona/tone analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaAnalysis {
    /// Detected tone.
    pub tone: String,
    /// Descriptive keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// A system prompt that replicates the persona.
    pub suggested_prompt: String,
    /// Whether a remote model produced this analysis.
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// Summary statistics for a parsed export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportStats {
    /// Entries in the export array.
    pub total_records: usize,
    /// Entries skipped for missing id/mapping or malformed structure.
    pub skipped_records: usize,
    /// Entries that reconstructed to zero messages.
    pub empty_conversations: usize,
    /// Conversations kept.
    pub conversation_count: usize,
    /// Total messages across kept conversations.
    pub total_messages: usize,
    /// User messages.
    pub user_messages: usize,
    /// Assistant messages.
    pub assistant_messages: usize,
    /// System messages.
    pub system_messages: usize,
}
