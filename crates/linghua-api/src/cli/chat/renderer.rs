//! Terminal implementation of the chat panel.
//!
//! `TerminalView` prints one styled bubble per message: user lines are
//! prefixed `You >` in green, assistant replies get the robot label and are
//! rendered through a `termimad` skin. From `set_busy(true)` until the reply
//! is rendered an `indicatif` spinner stands in for the disabled send button.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use linghua_core::chat::escape::unescape_for_terminal;
use linghua_core::chat::view::ChatView;
use linghua_types::chat::ChatRole;

/// Assistant display name.
pub const ASSISTANT_NAME: &str = "零花黔";

/// Terminal chat panel.
pub struct TerminalView {
    skin: MadSkin,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Red);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            spinner: Mutex::new(None),
        }
    }

    fn stop_spinner(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for TerminalView {
    fn reset(&self) {
        self.stop_spinner();
        println!();
        println!("  {}", style("--- 对话记录 ---").dim());
        println!();
    }

    fn render(&self, role: ChatRole, content: &str) {
        let text = unescape_for_terminal(content);
        match role {
            ChatRole::User => {
                // The spinner stays up while Busy; print above it.
                let print = || println!("  {} {}\n", style("You >").green().bold(), text);
                let spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
                match spinner.as_ref() {
                    Some(bar) => bar.suspend(print),
                    None => print(),
                }
            }
            ChatRole::Assistant => {
                self.stop_spinner();
                println!("  {} {}", style("🤖").bold(), style(ASSISTANT_NAME).red().bold());
                let rendered = format!("{}", self.skin.term_text(&text));
                for line in rendered.lines() {
                    println!("     {line}");
                }
                println!();
            }
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("  {} {}", style("!").yellow().bold(), message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.stop_spinner();
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt failed, treating as declined");
                false
            }
        }
    }

    fn set_busy(&self, busy: bool) {
        if !busy {
            self.stop_spinner();
            return;
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.red} {msg}") {
            bar.set_style(spinner_style);
        }
        bar.set_message("正在思考...");
        bar.enable_steady_tick(Duration::from_millis(80));

        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = spinner.replace(bar) {
            previous.finish_and_clear();
        }
    }
}
