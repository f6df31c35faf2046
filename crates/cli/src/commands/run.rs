//! `remind run` — answer one task with the think-act-observe loop.

use remind_agent::{ReactAgent, RunOutcome};
use remind_config::AppConfig;
use remind_core::error::ProviderError;
use remind_core::provider::Provider;
use remind_core::state::WorkflowState;
use remind_providers::ScriptedProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct RunArgs {
    pub task: String,
    pub max_cycles: Option<usize>,
    pub script: Option<PathBuf>,
    pub json: bool,
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(max_cycles) = args.max_cycles {
        config.agent.max_cycles = max_cycles;
        config.validate()?;
    }

    let provider: Arc<dyn Provider> = match &args.script {
        Some(path) => Arc::new(ScriptedProvider::from_json_file(path)?),
        None => match remind_providers::build_from_config(&config) {
            Ok(provider) => provider,
            Err(e @ ProviderError::NotConfigured(_)) => {
                print_key_help();
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        },
    };

    let tools = Arc::new(remind_tools::default_registry(&config.tools.file_root));
    debug!(
        provider = provider.name(),
        tools = tools.len(),
        file_root = %config.tools.file_root.display(),
        max_cycles = config.agent.max_cycles,
        "Starting run"
    );
    let agent = ReactAgent::from_config(provider, tools, &config.agent);

    // Ctrl+C stops the run at the next cycle boundary
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut state = WorkflowState::new();
    let outcome = agent
        .run_with_cancellation(&args.task, &mut state, &cancel)
        .await?;

    if args.json {
        let report = serde_json::json!({ "outcome": outcome, "state": state });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_transcript(&outcome);
    }

    Ok(())
}

/// Cycles go to stderr, the answer alone to stdout.
fn print_transcript(outcome: &RunOutcome) {
    for (i, cycle) in outcome.cycles.iter().enumerate() {
        eprintln!("  [{}] Thought:      {}", i + 1, cycle.thought);
        eprintln!("      Action:       {}", cycle.action);
        eprintln!("      Action Input: {}", cycle.action_input);
        eprintln!("      Observation:  {}", first_line(&cycle.observation));
    }
    if !outcome.is_complete {
        eprintln!("  (cycle budget exhausted)");
    }
    println!("{}", outcome.answer());
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn print_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    REMIND_API_KEY = 'sk-...'");
    eprintln!("    OPENAI_API_KEY = 'sk-...'");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    eprintln!("  Local endpoints need no key: REMIND_BASE_URL=http://localhost:11434/v1");
    eprintln!("  To replay a recorded run offline: remind run --script replies.json \"...\"");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_of_multiline_observation() {
        assert_eq!(first_line("a\nb\nc"), "a");
        assert_eq!(first_line(""), "");
    }
}
