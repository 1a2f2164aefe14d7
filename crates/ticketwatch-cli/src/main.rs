mod check;
mod run;
mod state;
#[cfg(test)]
mod test_support;
mod watch;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ticketwatch")]
#[command(about = "Watch ticket sale pages and post changes to a webhook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate every target once.
    Run {
        /// Render and decide without posting or writing state.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run repeatedly on a cron schedule until interrupted.
    Watch {
        /// Six-field cron expression (seconds first).
        #[arg(long, env = "TICKETWATCH_CRON", default_value = "0 */5 * * * *")]
        cron: String,
    },
    /// Validate configuration and the target list without rendering.
    Check,
    /// Inspect persisted state.
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

#[derive(Debug, Subcommand)]
enum StateCommands {
    /// Print the last fingerprint and post time recorded per URL.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Arc::new(ticketwatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run { dry_run } => {
            let outcome = run::run_once(&config, dry_run).await?;
            run::print_summary(&outcome);
            Ok(run::exit_code(&outcome))
        }
        Commands::Watch { cron } => {
            watch::watch(config, &cron).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            check::check(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::State {
            command: StateCommands::Show,
        } => {
            state::show(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests;
