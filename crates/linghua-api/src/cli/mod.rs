//! CLI command definitions for the `linghua` binary.
//!
//! Uses clap derive macros for argument parsing. Each top-level command
//! corresponds to one section of the assistant page.

pub mod chat;
pub mod creative;
pub mod data;
pub mod history;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use linghua_types::section::Section;

/// 零花黔全能助手: marketing assistant for self-service car washes.
#[derive(Parser)]
#[command(name = "linghua", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the assistant (interactive).
    Chat,

    /// Inspect or manage the persisted chat history.
    History {
        #[command(subcommand)]
        action: history::HistoryCommand,
    },

    /// Show the monthly revenue chart.
    Data,

    /// Generate marketing copy for a theme.
    Copy {
        /// Copy theme, e.g. "会员充值活动".
        #[arg(default_value = "")]
        theme: String,
    },

    /// Request a promotional image for a description.
    Image {
        /// Image description.
        #[arg(default_value = "")]
        description: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Default log directives for the given verbosity flags.
pub fn log_directives(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,linghua_core=debug,linghua_infra=debug",
        _ => "trace",
    }
}

/// Switch to a page section and print its heading.
pub fn navigate(section: Section, json: bool) {
    tracing::debug!(section = %section, "Navigating to section");
    if !json {
        println!();
        println!("  {}", style(section.title()).red().bold());
    }
}
