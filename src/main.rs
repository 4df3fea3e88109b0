//! Chat Migrate - Rebuild ChatGPT conversations and move them elsewhere.
//!
//! Reads a ChatGPT `conversations.json` export, reconstructs each
//! conversation, and writes Markdown archives or migration packets for
//! Gemini, Grok or Claude.
//!
//! QUICK START:
//!   chat-migrate -i conversations.json list          # Numbered list, newest first
//!   chat-migrate -i conversations.json show 1        # Read the first conversation
//!   chat-migrate -i conversations.json migrate 1 -p claude
//!   chat-migrate -i conversations.json persona 1 --deep

mod cli;

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chat_migrate::application::{
    analyze_persona, build_packets, format_archive_markdown, format_conversations_json,
    format_conversations_table, format_persona, format_stats, format_transcript,
    ClassificationSample, OutputFormat, PersonaClassifier, PersonaReport,
};
use chat_migrate::domain::{self, AppConfig, AppError, ParsedConversation, TargetPlatform};
use chat_migrate::infrastructure::{
    ensure_config_exists, load_config, load_export, render_config, write_packets, write_text,
    GeminiClassifier,
};
use cli::{Cli, Commands, ConfigAction};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;
    let config = load_config()?;

    if let Commands::Config { action } = &cli.command {
        return cmd_config(action, &config);
    }

    let input = resolve_input(cli.input.as_deref(), &config)?;
    let (conversations, stats) = load_export(&input)?;

    match cli.command {
        Commands::List { limit, search } => {
            cmd_list(&conversations, limit, search.as_deref(), format)?;
        }
        Commands::Show { conversation, last } => {
            let conv = select_conversation(&conversations, &conversation)?;
            cmd_show(conv, last, format)?;
        }
        Commands::Archive {
            conversation,
            output,
        } => {
            let conv = select_conversation(&conversations, &conversation)?;
            cmd_archive(conv, output)?;
        }
        Commands::Migrate {
            conversation,
            platform,
            size_limit,
            dir,
            stdout,
        } => {
            let conv = select_conversation(&conversations, &conversation)?;
            let platform = platform.unwrap_or(config.migration.platform);
            let size_limit = size_limit.unwrap_or(config.migration.size_limit);
            let dir = dir.unwrap_or_else(|| config.migration.output_dir.clone());
            cmd_migrate(conv, platform, size_limit, &dir, stdout)?;
        }
        Commands::Persona { conversation, deep } => {
            let conv = select_conversation(&conversations, &conversation)?;
            cmd_persona(conv, deep, &config)?;
        }
        Commands::Stats => {
            let largest = conversations.iter().max_by_key(|c| c.message_count());
            println!("{}", format_stats(&stats, largest));
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Picks the export path from the command line or the config file.
fn resolve_input(input: Option<&Path>, config: &AppConfig) -> domain::Result<PathBuf> {
    input
        .map(Path::to_path_buf)
        .or_else(|| config.input.export_path.clone())
        .ok_or_else(|| AppError::Config {
            message: "No export given. Use --input <conversations.json> or set [input] export_path"
                .into(),
        })
}

/// Finds a conversation by 1-based list number, or by ID (partial match).
///
/// A number outside the list is tried as an ID, since IDs often start
/// with digits.
fn select_conversation<'a>(
    conversations: &'a [ParsedConversation],
    selector: &str,
) -> domain::Result<&'a ParsedConversation> {
    let by_number = selector
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| conversations.get(index));
    if let Some(conv) = by_number {
        return Ok(conv);
    }

    conversations
        .iter()
        .find(|c| c.id == selector)
        .or_else(|| {
            conversations
                .iter()
                .find(|c| c.id.starts_with(selector) || c.id.contains(selector))
        })
        .ok_or_else(|| AppError::InvalidData {
            message: format!(
                "Conversation '{selector}' not found (use a number 1-{} or an ID)",
                conversations.len()
            ),
        })
}

/// List conversations command.
fn cmd_list(
    conversations: &[ParsedConversation],
    limit: usize,
    search: Option<&str>,
    format: OutputFormat,
) -> domain::Result<()> {
    let needle = search.map(str::to_lowercase);
    let mut rows: Vec<(usize, &ParsedConversation)> = conversations
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c))
        .filter(|(_, c)| {
            needle
                .as_ref()
                .is_none_or(|n| c.title.to_lowercase().contains(n))
        })
        .collect();

    if limit > 0 {
        rows.truncate(limit);
    }

    match format {
        OutputFormat::Markdown => {
            println!("{}", format_conversations_table(&rows));
            println!(
                "Showing {} of {} conversations",
                rows.len(),
                conversations.len()
            );
        }
        OutputFormat::Json => {
            let selected: Vec<ParsedConversation> = rows.iter().map(|(_, c)| (*c).clone()).collect();
            println!(
                "{}",
                format_conversations_json(&selected).map_err(AppError::json_parse)?
            );
        }
    }

    Ok(())
}

/// Show a single conversation.
fn cmd_show(
    conv: &ParsedConversation,
    last: Option<usize>,
    format: OutputFormat,
) -> domain::Result<()> {
    let start = last.map_or(0, |n| conv.messages.len().saturating_sub(n));
    let messages = &conv.messages[start..];

    let output = match format {
        OutputFormat::Markdown => format_transcript(conv, messages),
        OutputFormat::Json => format_conversations_json(std::slice::from_ref(conv))
            .map_err(AppError::json_parse)?,
    };

    println!("{output}");
    Ok(())
}

/// Write the Markdown archive of a conversation.
fn cmd_archive(conv: &ParsedConversation, output: Option<PathBuf>) -> domain::Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(conv.archive_filename()));
    write_text(&path, &format_archive_markdown(conv))?;

    println!(
        "{} Archived {} → {}",
        "✓".green().bold(),
        conv.title.cyan(),
        path.display()
    );
    Ok(())
}

/// Build and write migration packets.
fn cmd_migrate(
    conv: &ParsedConversation,
    platform: TargetPlatform,
    size_limit: usize,
    dir: &Path,
    stdout: bool,
) -> domain::Result<()> {
    let packets = build_packets(conv, platform, size_limit);

    if stdout {
        if let [packet] = packets.as_slice() {
            println!("{}", packet.content);
            return Ok(());
        }
        eprintln!(
            "{} Split into {} parts; writing files instead of printing",
            "⚠".yellow(),
            packets.len()
        );
    }

    let paths = write_packets(dir, &packets)?;

    if packets.len() > 1 {
        println!(
            "{} Large chat detected: split into {} parts for safe ingestion",
            "📦".bold(),
            packets.len()
        );
    }

    for (packet, path) in packets.iter().zip(&paths) {
        println!(
            "{} Part {}/{} → {}",
            "✓".green(),
            packet.part_number,
            packet.total_parts,
            path.display()
        );
    }

    Ok(())
}

/// Persona analysis command.
fn cmd_persona(conv: &ParsedConversation, deep: bool, config: &AppConfig) -> domain::Result<()> {
    let sample = ClassificationSample::from_messages(
        &conv.messages,
        config.classifier.sample_messages,
        config.classifier.sample_chars,
    );

    let report = if deep {
        match GeminiClassifier::from_config(&config.classifier) {
            Ok(classifier) => {
                let runtime = tokio::runtime::Runtime::new()
                    .map_err(|e| AppError::io("Failed to start async runtime", e))?;
                runtime.block_on(analyze_persona(
                    &conv.messages,
                    Some(&classifier as &dyn PersonaClassifier),
                    &sample,
                ))
            }
            Err(e) => {
                tracing::warn!("Remote persona analysis unavailable: {}", e);
                PersonaReport::local(&conv.messages, Some(e.to_string()))
            }
        }
    } else {
        PersonaReport::local(&conv.messages, None)
    };

    println!("{}", format_persona(&report));
    Ok(())
}

/// Configuration command.
fn cmd_config(action: &ConfigAction, config: &AppConfig) -> domain::Result<()> {
    match action {
        ConfigAction::Show => println!("{}", render_config(config)?),
        ConfigAction::Init => {
            let path = AppConfig::config_file_path();
            if ensure_config_exists()? {
                println!("{} Created {}", "✓".green().bold(), path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigAction::Path => println!("{}", AppConfig::config_file_path().display()),
    }
    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
