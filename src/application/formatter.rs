//! Output formatting for parsed conversations.
//!
//! Supports the Markdown archive, a transcript view, JSON and table
//! listings, plus statistics and persona reports.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportStats, ParsedConversation, ParsedMessage, PersonaAnalysis, Role};

use super::persona::PersonaReport;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Markdown,
    /// JSON format for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" | "text" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: markdown, json")),
        }
    }
}

/// Formats the Markdown archive of a conversation.
pub fn format_archive_markdown(conv: &ParsedConversation) -> String {
    let header = format!(
        "# {}\n**Date:** {}\n**Messages:** {}\n\n---\n\n",
        conv.title,
        format_date(conv),
        conv.message_count()
    );

    let body = conv
        .messages
        .iter()
        .map(|m| format!("### **{}**\n{}\n", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");

    header + &body
}

/// Formats a conversation for terminal reading.
pub fn format_transcript(conv: &ParsedConversation, messages: &[ParsedMessage]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", conv.title.bold()));
    out.push_str(&format!(
        "{} • {} messages ({} user, {} assistant)\n\n",
        format_date(conv),
        conv.message_count(),
        conv.count_role(Role::User),
        conv.count_role(Role::Assistant)
    ));

    if messages.len() < conv.message_count() {
        out.push_str(&format!(
            "{}\n\n",
            format!(
                "… {} earlier messages hidden",
                conv.message_count() - messages.len()
            )
            .dimmed()
        ));
    }

    for msg in messages {
        let label = match msg.role {
            Role::User => "User".cyan().bold(),
            Role::Assistant => "Assistant".green().bold(),
            Role::System => "System".yellow().bold(),
        };
        out.push_str(&format!("{label}\n{}\n\n", msg.content));
    }

    out
}

/// Formats conversations as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_conversations_json(
    conversations: &[ParsedConversation],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(conversations)
}

/// Formats a numbered table listing of conversations.
pub fn format_conversations_table(conversations: &[(usize, &ParsedConversation)]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "ID", "Created", "Msgs", "Title"]);

    for (number, conv) in conversations {
        let created = conv.created_at().map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        );

        table.add_row(vec![
            number.to_string(),
            conv.short_id().to_string(),
            created,
            conv.message_count().to_string(),
            truncate(&conv.title, 45),
        ]);
    }

    table.to_string()
}

/// Formats export statistics for display.
pub fn format_stats(stats: &ExportStats, largest: Option<&ParsedConversation>) -> String {
    let mut out = format!(
        "{}\n  Records in export: {}\n  Conversations: {}\n  Skipped records: {}\n  Empty conversations: {}\n  Total messages: {}\n  User messages: {}\n  Assistant messages: {}\n  System messages: {}",
        "📊 Statistics".bold(),
        stats.total_records.to_string().cyan(),
        stats.conversation_count.to_string().cyan(),
        stats.skipped_records.to_string().yellow(),
        stats.empty_conversations.to_string().yellow(),
        stats.total_messages.to_string().cyan(),
        stats.user_messages.to_string().green(),
        stats.assistant_messages.to_string().blue(),
        stats.system_messages.to_string().magenta()
    );

    if let Some(conv) = largest {
        out.push_str(&format!(
            "\n  Largest conversation: {} ({} messages)",
            truncate(&conv.title, 40),
            conv.message_count()
        ));
    }

    out
}

/// Formats a persona analysis report.
pub fn format_persona(report: &PersonaReport) -> String {
    let mut out = String::new();

    if let Some(reason) = &report.fallback_reason {
        out.push_str(&format!(
            "{} {}\n\n",
            "⚠ Remote analysis failed, using local scan:".yellow(),
            reason
        ));
    }

    match &report.analysis {
        Some(analysis) => out.push_str(&format_analysis(analysis)),
        None => out.push_str("No assistant messages to analyze."),
    }

    out
}

fn format_analysis(analysis: &PersonaAnalysis) -> String {
    let source = if analysis.is_ai_generated {
        "✨ Remote Insight"
    } else {
        "⚡ Basic Analysis"
    };

    format!(
        "{}\n  Detected tone: {}\n  Keywords: {}\n  Suggested system prompt:\n    {}",
        source.bold(),
        analysis.tone.cyan(),
        analysis.keywords.join(", "),
        analysis.suggested_prompt.green()
    )
}

fn format_date(conv: &ParsedConversation) -> String {
    conv.created_at().map_or_else(
        || "unknown date".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
