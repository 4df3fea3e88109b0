//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use chat_migrate::application::OutputFormat;
use chat_migrate::domain::TargetPlatform;
use clap::{Parser, Subcommand};

/// Chat Migrate - Rebuild ChatGPT export transcripts and repackage them
/// for other assistants.
///
/// Typical flow: chat-migrate -i conversations.json list | show 1 | migrate 1 -p claude
#[derive(Parser, Debug)]
#[command(name = "chat-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the exported conversations.json.
    #[arg(short, long, env = "CHAT_MIGRATE_INPUT", global = true)]
    pub input: Option<PathBuf>,

    /// Output format: markdown or json.
    #[arg(short, long, default_value = "markdown", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List conversations, most recent first.
    List {
        /// Maximum number of conversations to show (0 = all).
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only show conversations whose title contains this text.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a conversation transcript.
    Show {
        /// Conversation number from `list`, or ID (full or partial).
        conversation: String,

        /// Show only the last N messages.
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Write the Markdown archive of a conversation.
    Archive {
        /// Conversation number from `list`, or ID (full or partial).
        conversation: String,

        /// Output file path (defaults to the sanitized title).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build migration packets for another assistant.
    Migrate {
        /// Conversation number from `list`, or ID (full or partial).
        conversation: String,

        /// Target platform: gemini, grok or claude.
        #[arg(short, long, value_parser = parse_platform)]
        platform: Option<TargetPlatform>,

        /// Maximum characters per packet body.
        #[arg(short, long)]
        size_limit: Option<usize>,

        /// Output directory for packet files.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print a single-part result to stdout instead of writing files.
        #[arg(long)]
        stdout: bool,
    },

    /// Detect the assistant's persona in a conversation.
    Persona {
        /// Conversation number from `list`, or ID (full or partial).
        conversation: String,

        /// Use the remote model, falling back to the local scan on failure.
        #[arg(long)]
        deep: bool,
    },

    /// Show statistics about the export.
    Stats,

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write the default configuration file if missing.
    Init,
    /// Print the configuration file path.
    Path,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}

/// Platform tags never fail to parse; unknown tags use the narrative format.
fn parse_platform(tag: &str) -> Result<TargetPlatform, String> {
    Ok(TargetPlatform::from_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from([
            "chat-migrate",
            "-i",
            "conversations.json",
            "migrate",
            "3",
            "--platform",
            "claude",
            "--size-limit",
            "1000",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("conversations.json")));
        match cli.command {
            Commands::Migrate {
                conversation,
                platform,
                size_limit,
                ..
            } => {
                assert_eq!(conversation, "3");
                assert_eq!(platform, Some(TargetPlatform::Claude));
                assert_eq!(size_limit, Some(1000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_platform_is_narrative() {
        let cli = Cli::try_parse_from(["chat-migrate", "migrate", "1", "-p", "mistral"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                platform: Some(TargetPlatform::Grok),
                ..
            }
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
