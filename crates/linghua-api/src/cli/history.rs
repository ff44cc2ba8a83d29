//! History subcommands: show, clear, and export the persisted chat history.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use linghua_core::chat::controller::{CLEAR_CONFIRM_PROMPT, ChatController};
use linghua_core::chat::escape::unescape_for_terminal;
use linghua_core::chat::html::HtmlTranscript;
use linghua_types::chat::{ChatHistory, ChatRole};

use crate::state::AppState;

/// Characters of message content shown per table row.
const PREVIEW_CHARS: usize = 40;

/// Chat history subcommands.
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List stored messages, oldest first.
    Show,

    /// Delete every stored message.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Write the transcript as a standalone HTML page.
    Export {
        /// Output file.
        path: PathBuf,
    },
}

/// Handle a history subcommand.
pub async fn handle_history_command(cmd: HistoryCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        HistoryCommand::Show => show(state, json).await,
        HistoryCommand::Clear { force } => clear(state, force, json).await,
        HistoryCommand::Export { path } => export(state, &path, json).await,
    }
}

async fn show(state: &AppState, json: bool) -> Result<()> {
    let history = state.open_history().await;
    let history = history.history();

    if json {
        println!("{}", serde_json::to_string_pretty(history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!();
        println!("  {}", style("No chat history yet.").dim());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", history_table(history));
    println!();
    println!(
        "  {} of {} messages",
        style(history.len()).cyan(),
        state.config.history_limit
    );
    println!();
    Ok(())
}

async fn clear(state: &AppState, force: bool, json: bool) -> Result<()> {
    let mut history = state.open_history().await;
    let count = history.history().len();

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(CLEAR_CONFIRM_PROMPT)
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    history.clear().await.context("Failed to clear chat history")?;
    tracing::info!(count, "Chat history cleared from CLI");

    if json {
        let result = serde_json::json!({ "cleared": count });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Cleared {} messages",
            style("ok").green(),
            style(count).cyan()
        );
        println!();
    }
    Ok(())
}

async fn export(state: &AppState, path: &Path, json: bool) -> Result<()> {
    let history = state.open_history().await;
    let count = history.history().len();

    let view = Arc::new(HtmlTranscript::new());
    let chat = ChatController::from_config(history, Arc::clone(&view), &state.config);
    chat.load_history().await;

    tokio::fs::write(path, view.to_page("零花黔全能助手"))
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        let result = serde_json::json!({
            "path": path.display().to_string(),
            "messages": count,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Exported {} messages to {}",
            style("ok").green(),
            style(count).cyan(),
            style(path.display()).cyan()
        );
        println!();
    }
    Ok(())
}

fn history_table(history: &ChatHistory) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Content").fg(Color::Cyan),
        ]);

    for (i, message) in history.iter().enumerate() {
        let role = match message.role {
            ChatRole::User => Cell::new("You").fg(Color::Green),
            ChatRole::Assistant => Cell::new("零花黔").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            role,
            Cell::new(message.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(preview(&message.content)),
        ]);
    }

    table
}

/// First line of the decoded content, truncated to `PREVIEW_CHARS`.
fn preview(content: &str) -> String {
    let decoded = unescape_for_terminal(content);
    let first_line = decoded.lines().next().unwrap_or_default();
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
