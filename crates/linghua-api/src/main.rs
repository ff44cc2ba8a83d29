//! Linghua assistant entry point.
//!
//! Binary name: `linghua`
//!
//! Parses CLI arguments, initializes logging, the data directory, and the
//! key-value store, then dispatches to the section the command names.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use linghua_types::section::Section;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    linghua_observe::tracing_setup::init_tracing(cli::log_directives(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let result = run(cli).await;
    linghua_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "linghua", &mut std::io::stdout());
        return Ok(());
    }

    match cli.command {
        Commands::Data => {
            cli::navigate(Section::Data, cli.json);
            cli::data::show_revenue(cli.json)?;
        }

        Commands::Copy { theme } => {
            cli::navigate(Section::Content, cli.json);
            cli::creative::generate_copy(&theme, cli.json)?;
        }

        Commands::Image { description } => {
            cli::navigate(Section::Image, cli.json);
            cli::creative::request_image(&description, cli.json)?;
        }

        Commands::Chat => {
            let state = AppState::init().await?;
            cli::navigate(Section::Chat, false);
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::History { action } => {
            let state = AppState::init().await?;
            cli::history::handle_history_command(action, &state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
