use arena_duel::HistoryQuery;
use arena_storage::{BattleRecord, HistoryFilter};
use time::format_description::well_known::Rfc3339;

use crate::config::ArenaConfig;
use crate::wiring::open_store;
use crate::OutputFormat;

/// Print past battles, newest first.
pub(crate) async fn cmd_history(
    config: &ArenaConfig,
    filter: HistoryFilter,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.history_path.is_none() {
        tracing::warn!("no history file configured; an in-memory history is always empty");
    }
    let store = open_store(config.history_path.as_deref()).await?;
    let battles = HistoryQuery::new(store).query_history(filter).await?;

    match output {
        OutputFormat::Json => {
            let body = serde_json::json!({ "battles": battles });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            if battles.is_empty() {
                println!("No battles recorded.");
            }
            for battle in &battles {
                println!("{}", summary_line(battle));
            }
        }
    }
    Ok(())
}

fn summary_line(battle: &BattleRecord) -> String {
    let when = battle
        .created_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| battle.created_at.to_string());
    format!(
        "#{} {} {} vs {} -> {}",
        battle.id, when, battle.fighter_1_id, battle.fighter_2_id, battle.winner
    )
}
