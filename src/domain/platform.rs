//! Target platforms for migration packets.
//!
//! Each platform owns its message format, packet header and packet footer,
//! so adding a platform means adding one variant to each match below.

use serde::{Deserialize, Serialize};

use super::models::{ParsedMessage, Role};

/// Instruction placed at the top of every packet.
const IMPORT_INSTRUCTION: &str = "The following is a transcript of a past conversation. Please ingest this history to understand the user's preferences, the assistant's established persona, and the current project state.";

/// Destination assistant whose ingestion format a packet targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TargetPlatform {
    /// Structured Markdown headings.
    #[default]
    Gemini,
    /// Narrative script.
    Grok,
    /// XML-like markup.
    Claude,
}

impl TargetPlatform {
    /// Parses a platform tag, falling back to the narrative platform for
    /// anything unrecognized.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "gemini" | "structured" => Self::Gemini,
            "claude" | "markup" | "xml" => Self::Claude,
            "grok" | "narrative" => Self::Grok,
            other => {
                tracing::warn!(platform = other, "Unknown platform, using narrative format");
                Self::Grok
            }
        }
    }

    /// Tag used in packet filenames.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Grok => "Grok",
            Self::Claude => "Claude",
        }
    }

    /// Renders one message in this platform's format.
    #[must_use]
    pub fn format_message(self, msg: &ParsedMessage) -> String {
        match self {
            Self::Gemini => {
                let heading = if msg.role == Role::User { "USER" } else { "MODEL" };
                format!("## {heading}\n{}", msg.content)
            }
            Self::Claude => format!(
                "<message role=\"{}\">\n{}\n</message>",
                msg.role.as_str(),
                msg.content
            ),
            Self::Grok => {
                let speaker = if msg.role == Role::User {
                    "The User"
                } else {
                    "The Assistant"
                };
                format!("{speaker}: {}", msg.content)
            }
        }
    }

    /// Header opening packet `part` (1-based).
    #[must_use]
    pub fn header(self, part: usize) -> String {
        let base = format!("CONTEXT IMPORT (Part {part}): {IMPORT_INSTRUCTION}");
        match self {
            Self::Claude => format!(
                "<system_instruction>\n{base}\n</system_instruction>\n<chat_history_part_{part}>"
            ),
            Self::Gemini | Self::Grok => {
                let continuation = if part > 1 {
                    "[CONTINUATION OF PREVIOUS PART]\n"
                } else {
                    ""
                };
                format!("{base}\n{continuation}\nSTART TRANSCRIPT:\n\n")
            }
        }
    }

    /// Footer closing packet `part` out of `total`.
    #[must_use]
    pub fn footer(self, part: usize, total: usize) -> String {
        let is_last = part >= total;
        match self {
            Self::Claude if is_last => "</chat_history_part_final>".to_string(),
            Self::Claude => format!("</chat_history_part_{part}>"),
            Self::Gemini | Self::Grok if is_last => "\n\nEND TRANSCRIPT".to_string(),
            Self::Gemini | Self::Grok => format!("\n\n[CONTINUED IN PART {}]", part + 1),
        }
    }
}

impl std::str::FromStr for TargetPlatform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl From<String> for TargetPlatform {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl std::fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: Role, content: &str) -> ParsedMessage {
        ParsedMessage {
            id: "m".into(),
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    #[test]
    fn test_structured_format() {
        let p = TargetPlatform::Gemini;
        assert_eq!(p.format_message(&message(Role::User, "Hi")), "## USER\nHi");
        assert_eq!(
            p.format_message(&message(Role::System, "Rules")),
            "## MODEL\nRules"
        );
    }

    #[test]
    fn test_markup_format_keeps_role_string() {
        let p = TargetPlatform::Claude;
        assert_eq!(
            p.format_message(&message(Role::System, "Rules")),
            "<message role=\"system\">\nRules\n</message>"
        );
    }

    #[test]
    fn test_narrative_format() {
        let p = TargetPlatform::Grok;
        assert_eq!(
            p.format_message(&message(Role::User, "Hi")),
            "The User: Hi"
        );
        assert_eq!(
            p.format_message(&message(Role::System, "Rules")),
            "The Assistant: Rules"
        );
    }

    #[test]
    fn test_unknown_tag_falls_back_to_narrative() {
        assert_eq!(TargetPlatform::from_tag("ChatGPT"), TargetPlatform::Grok);
        assert_eq!(TargetPlatform::from_tag("CLAUDE"), TargetPlatform::Claude);
        assert_eq!(TargetPlatform::from_tag("xml"), TargetPlatform::Claude);
        assert_eq!(
            "structured".parse::<TargetPlatform>(),
            Ok(TargetPlatform::Gemini)
        );
    }

    #[test]
    fn test_text_header_continuation_notice() {
        let first = TargetPlatform::Grok.header(1);
        let second = TargetPlatform::Grok.header(2);
        assert!(first.starts_with("CONTEXT IMPORT (Part 1): "));
        assert!(!first.contains("[CONTINUATION OF PREVIOUS PART]"));
        assert!(second.contains("\n[CONTINUATION OF PREVIOUS PART]\n\nSTART TRANSCRIPT:\n\n"));
    }

    #[test]
    fn test_footers() {
        assert_eq!(TargetPlatform::Gemini.footer(1, 3), "\n\n[CONTINUED IN PART 2]");
        assert_eq!(TargetPlatform::Gemini.footer(3, 3), "\n\nEND TRANSCRIPT");
        assert_eq!(TargetPlatform::Claude.footer(2, 3), "</chat_history_part_2>");
        assert_eq!(TargetPlatform::Claude.footer(3, 3), "</chat_history_part_final>");
    }

    #[test]
    fn test_markup_header() {
        let header = TargetPlatform::Claude.header(2);
        assert!(header.starts_with("<system_instruction>\nCONTEXT IMPORT (Part 2): "));
        assert!(header.ends_with("</system_instruction>\n<chat_history_part_2>"));
    }
}
