//! Remind CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Answer one task with the think-act-observe loop
//! - `tools`   — List the built-in tools
//! - `config`  — Show, locate, or validate configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "remind",
    about = "Remind — a bounded reasoning-acting agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a task, using tools as needed
    Run {
        /// The task or question
        task: String,

        /// Override the cycle budget
        #[arg(long)]
        max_cycles: Option<usize>,

        /// Replay model replies from a JSON array of strings instead of calling a model
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,

        /// Print the full outcome and final run state as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in tools
    Tools,

    /// Configuration management (prints the default config when no action is given)
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for answers
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Run {
            task,
            max_cycles,
            script,
            json,
        } => {
            commands::run::run(commands::run::RunArgs {
                task,
                max_cycles,
                script,
                json,
            })
            .await?
        }
        Commands::Tools => commands::tools::run().await?,
        Commands::Config { action } => match action {
            None => commands::config_cmd::default_config().await?,
            Some(ConfigAction::Show) => commands::config_cmd::show().await?,
            Some(ConfigAction::Path) => commands::config_cmd::path().await?,
            Some(ConfigAction::Validate) => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
