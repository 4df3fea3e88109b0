//! Migration packet generation.
//!
//! Formatted messages are packed greedily, in order, into bodies bounded by
//! a character limit. Headers and footers are added in a second pass once
//! the total part count is known.

use crate::domain::{MigrationChunk, ParsedConversation, TargetPlatform};

/// Separator appended after every formatted message in a body.
const MESSAGE_SEPARATOR: &str = "\n\n";

/// Builds the packets for `conversation` on `platform`.
///
/// `size_limit` bounds when a body is sealed, not the output size: a single
/// message longer than the limit still lands whole in its own packet.
#[must_use]
pub fn build_packets(
    conversation: &ParsedConversation,
    platform: TargetPlatform,
    size_limit: usize,
) -> Vec<MigrationChunk> {
    let fragments = conversation
        .messages
        .iter()
        .map(|msg| platform.format_message(msg));
    let bodies = seal_bodies(fragments, size_limit);
    let total = bodies.len();
    let title = conversation.sanitized_title();

    tracing::info!(
        conversation = %conversation.id,
        platform = %platform,
        parts = total,
        "Built migration packets"
    );

    bodies
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            let part = index + 1;
            let header = platform.header(part);
            let footer = platform.footer(part, total);

            MigrationChunk {
                filename: format!("{title}_Part{part}_{}.txt", platform.tag()),
                content: format!("{header}\n{body}{footer}"),
                part_number: part,
                total_parts: total,
            }
        })
        .collect()
}

/// Packs fragments into bodies, sealing the current body before a fragment
/// that would push it past `size_limit` characters.
fn seal_bodies(fragments: impl IntoIterator<Item = String>, size_limit: usize) -> Vec<String> {
    let mut bodies = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for fragment in fragments {
        let fragment_chars = fragment.chars().count();

        if current_chars > 0 && current_chars + fragment_chars > size_limit {
            tracing::debug!(chars = current_chars, "Sealing packet body");
            bodies.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        current.push_str(&fragment);
        current.push_str(MESSAGE_SEPARATOR);
        current_chars += fragment_chars + MESSAGE_SEPARATOR.len();
    }

    if current_chars > 0 {
        bodies.push(current);
    }

    bodies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParsedMessage, Role, DEFAULT_SIZE_LIMIT};

    fn message(role: Role, content: &str) -> ParsedMessage {
        ParsedMessage {
            id: format!("m-{}", content.len()),
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    fn conversation(messages: Vec<ParsedMessage>) -> ParsedConversation {
        ParsedConversation {
            id: "conv-1".into(),
            title: "My Chat: v2".into(),
            create_time: 0.0,
            messages,
        }
    }

    fn sample() -> ParsedConversation {
        conversation(vec![
            message(Role::User, "Hi"),
            message(Role::Assistant, "Hello, how can I help?"),
            message(Role::User, "Convert this."),
        ])
    }

    #[test]
    fn test_single_markup_packet() {
        let packets = build_packets(&sample(), TargetPlatform::Claude, 1000);

        assert_eq!(packets.len(), 1);
        let packet = &packets[0];
        assert_eq!(packet.part_number, 1);
        assert_eq!(packet.total_parts, 1);
        assert!(packet.is_last());
        assert!(packet.content.starts_with("<system_instruction>"));
        assert!(packet.content.ends_with("</chat_history_part_final>"));
        assert!(packet
            .content
            .contains("<chat_history_part_1>\n<message role=\"user\">\nHi\n</message>\n\n"));
        assert_eq!(packet.filename, "My_Chat__v2_Part1_Claude.txt");
    }

    #[test]
    fn test_single_structured_packet_exact() {
        let conv = conversation(vec![message(Role::User, "Hi")]);
        let packets = build_packets(&conv, TargetPlatform::Gemini, DEFAULT_SIZE_LIMIT);

        let expected = format!(
            "{}\n## USER\nHi\n\n\n\nEND TRANSCRIPT",
            TargetPlatform::Gemini.header(1)
        );
        assert_eq!(packets[0].content, expected);
        assert!(packets[0]
            .content
            .starts_with("CONTEXT IMPORT (Part 1): The following is a transcript"));
    }

    #[test]
    fn test_oversized_message_stays_whole() {
        let big = "x".repeat(120_000);
        let conv = conversation(vec![message(Role::Assistant, &big)]);
        let packets = build_packets(&conv, TargetPlatform::Grok, 50_000);

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].total_parts, 1);
        assert!(packets[0].content.contains(&big));
    }

    #[test]
    fn test_oversized_message_gets_own_body() {
        let big = "y".repeat(500);
        let bodies = seal_bodies(
            vec!["a".repeat(10), big.clone(), "b".repeat(10)],
            100,
        );

        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[1], format!("{big}\n\n"));
    }

    #[test]
    fn test_bodies_respect_limit() {
        let fragments: Vec<String> = (0..50).map(|i| format!("{i:03}-{}", "z".repeat(30))).collect();
        let bodies = seal_bodies(fragments, 200);

        assert!(bodies.len() > 1);
        for body in &bodies {
            // The trailing separator of the last fragment is not counted
            assert!(body.chars().count() <= 200 + MESSAGE_SEPARATOR.len());
        }
    }

    #[test]
    fn test_bodies_reproduce_fragments_in_order() {
        let fragments: Vec<String> = (0..40).map(|i| format!("fragment {i} {}", "q".repeat(i * 3))).collect();
        let bodies = seal_bodies(fragments.clone(), 150);

        let joined: String = bodies.concat();
        let expected: String = fragments.iter().map(|f| format!("{f}\n\n")).collect();
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_limit_counts_characters() {
        // Four chars but twelve bytes each
        let fragments = vec!["日本語だ".to_string(), "日本語だ".to_string()];
        let bodies = seal_bodies(fragments, 10);
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn test_multi_part_numbering_and_footers() {
        let messages = (0..6)
            .map(|i| message(Role::User, &format!("{i}{}", "m".repeat(40))))
            .collect();
        let packets = build_packets(&conversation(messages), TargetPlatform::Gemini, 100);

        let total = packets.len();
        assert!(total > 1);
        for (index, packet) in packets.iter().enumerate() {
            assert_eq!(packet.part_number, index + 1);
            assert_eq!(packet.total_parts, total);
            assert_eq!(
                packet.filename,
                format!("My_Chat__v2_Part{}_Gemini.txt", index + 1)
            );
        }

        assert!(packets[0].content.ends_with("\n\n[CONTINUED IN PART 2]"));
        assert!(packets[1]
            .content
            .contains("[CONTINUATION OF PREVIOUS PART]"));
        assert!(packets[total - 1].content.ends_with("\n\nEND TRANSCRIPT"));
    }

    #[test]
    fn test_multi_part_markup_closing_tags() {
        let messages = (0..4)
            .map(|i| message(Role::Assistant, &format!("{i}{}", "c".repeat(80))))
            .collect();
        let packets = build_packets(&conversation(messages), TargetPlatform::Claude, 120);

        assert_eq!(packets.len(), 4);
        assert!(packets[0].content.ends_with("</chat_history_part_1>"));
        assert!(packets[2].content.ends_with("</chat_history_part_3>"));
        assert!(packets[3].content.contains("<chat_history_part_4>"));
        assert!(packets[3].content.ends_with("</chat_history_part_final>"));
    }

    #[test]
    fn test_empty_conversation_yields_no_packets() {
        assert!(build_packets(&conversation(Vec::new()), TargetPlatform::Grok, 100).is_empty());
    }
}
