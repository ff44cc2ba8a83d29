//! Main chat loop orchestration.
//!
//! Opens the persisted history, renders it under the greeting, then reads
//! lines until EOF. Each message goes through the `ChatController`, and the
//! loop waits for the simulated reply before prompting again.

use std::sync::Arc;

use console::style;
use tracing::{debug, info};

use linghua_core::chat::controller::ChatController;
use linghua_infra::sqlite::kv::SqliteKvStore;
use linghua_types::error::ChatError;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TerminalView;

type TerminalChat = ChatController<SqliteKvStore, TerminalView>;

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let history = state.open_history().await;
    let stored = history.history().len();

    let view = Arc::new(TerminalView::new());
    let mut chat = ChatController::from_config(history, view, &state.config);

    print_welcome_banner(stored, state.config.history_limit, chat.quick_replies());
    chat.load_history().await;
    info!(stored, "Chat session started");

    let prompt = format!("{} ", style("You >").green().bold());
    let mut chat_input =
        ChatInput::open(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.next_event().await {
            InputEvent::Eof => {
                chat.wait_for_reply().await;
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("  {}", style("(Use /exit or Ctrl+D to leave)").dim());
                continue;
            }
            InputEvent::Line(text) => {
                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Quick(None) => commands::print_quick_replies(chat.quick_replies()),
                        ChatCommand::Quick(Some(n)) => {
                            let outcome = chat.send_quick_reply(n - 1).await;
                            finish_send(&mut chat, outcome).await;
                        }
                        ChatCommand::ClearHistory => {
                            if chat.clear().await {
                                println!("  {}", style("对话记录已清空").dim());
                            }
                        }
                        ChatCommand::ClearScreen => chat_input.clear_screen(),
                        ChatCommand::History => {
                            let count = chat.history().await.len();
                            println!(
                                "\n  {} {}/{}\n",
                                style("Stored messages:").bold(),
                                style(count).cyan(),
                                state.config.history_limit
                            );
                        }
                        ChatCommand::Exit => {
                            chat.wait_for_reply().await;
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Unknown(what) => {
                            println!(
                                "  {} Unknown command: {}. Type /help for available commands.",
                                style("?").yellow(),
                                what
                            );
                        }
                    }
                    continue;
                }

                let outcome = chat.send(&text).await;
                finish_send(&mut chat, outcome).await;
            }
        }
    }

    chat_input.close();
    info!(stored = chat.history().await.len(), "Chat session ended");
    Ok(())
}

/// Wait for the reply after a successful send; report anything else.
async fn finish_send(chat: &mut TerminalChat, outcome: Result<(), ChatError>) {
    match outcome {
        Ok(()) => chat.wait_for_reply().await,
        // The controller already showed the notice.
        Err(ChatError::EmptyInput) => {}
        Err(ChatError::Busy) => {
            debug!("Input ignored while a reply is pending");
        }
        Err(e @ ChatError::UnknownQuickReply(_)) => {
            println!("  {} {}", style("?").yellow(), e);
        }
    }
}
