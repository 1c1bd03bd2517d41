use arena_core::BattleOutcome;

use crate::config::ArenaConfig;
use crate::wiring::{build_directory, build_orchestrator, open_store};
use crate::OutputFormat;

/// Resolve one duel and print the outcome.
///
/// An outcome that could not be recorded is still printed before the
/// error is returned.
pub(crate) async fn cmd_duel(
    config: &ArenaConfig,
    fighter_1: &str,
    fighter_2: &str,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config.history_path.as_deref()).await?;
    let directory = build_directory(config)?;
    let orchestrator = build_orchestrator(config, &directory, store);

    match orchestrator.resolve_duel(fighter_1, fighter_2).await {
        Ok(outcome) => {
            print_outcome(&outcome, output)?;
            Ok(())
        }
        Err(e) => {
            if let Some(outcome) = e.outcome() {
                print_outcome(outcome, output)?;
            }
            Err(e.into())
        }
    }
}

fn print_outcome(outcome: &BattleOutcome, output: OutputFormat) -> Result<(), serde_json::Error> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => {
            for line in &outcome.log {
                println!("{}", line);
            }
            println!(
                "Winner: {} ({}, {} turns)",
                outcome.winner, outcome.decision, outcome.turns
            );
        }
    }
    Ok(())
}
