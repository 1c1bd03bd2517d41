//! The duel pipeline: fetch both fighters, simulate, record.

use std::sync::Arc;
use std::time::Duration;

use arena_core::{simulate, BattleOutcome, Fighter};
use arena_storage::{BattleStore, NewBattleRecord, StorageError};
use time::OffsetDateTime;

use crate::directory::{DirectoryError, FighterDirectory};
use crate::error::DuelError;
use crate::rng::RngSource;

/// How long each fighter fetch may take unless configured otherwise.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves duels against an injected directory and store.
///
/// The orchestrator holds no per-duel state; one instance is shared by all
/// concurrent requests.
pub struct DuelOrchestrator {
    directory: Arc<dyn FighterDirectory>,
    store: Arc<dyn BattleStore>,
    rng: RngSource,
    fetch_timeout: Duration,
}

impl DuelOrchestrator {
    pub fn new(
        directory: Arc<dyn FighterDirectory>,
        store: Arc<dyn BattleStore>,
        rng: RngSource,
    ) -> Self {
        Self {
            directory,
            store,
            rng,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Fight `fighter_id_1` against `fighter_id_2` and record the result.
    ///
    /// Both fighters are fetched concurrently. Nothing is simulated or
    /// written unless both fetches succeed. If the write fails the outcome
    /// is still returned inside [`DuelError::NotRecorded`].
    pub async fn resolve_duel(
        &self,
        fighter_id_1: &str,
        fighter_id_2: &str,
    ) -> Result<BattleOutcome, DuelError> {
        let id_1 = fighter_id_1.trim();
        let id_2 = fighter_id_2.trim();
        if id_1.is_empty() || id_2.is_empty() {
            return Err(DuelError::InvalidInput(
                "both fighter ids are required".to_string(),
            ));
        }

        let (first, second) = tokio::try_join!(self.fetch(id_1), self.fetch(id_2))?;

        let mut rng = self.rng.next_stream();
        let outcome = simulate(&first, &second, &mut rng);

        let record = NewBattleRecord {
            fighter_1_id: id_1.to_string(),
            fighter_2_id: id_2.to_string(),
            winner: outcome.winner.clone(),
            log: outcome.log.clone(),
            created_at: OffsetDateTime::now_utc(),
        };

        // The write runs detached so dropping this future cannot cut it short.
        let store = Arc::clone(&self.store);
        let saved = match tokio::spawn(async move { store.save(record).await }).await {
            Ok(result) => result,
            Err(e) => Err(StorageError::Backend(format!("task join error: {}", e))),
        };

        match saved {
            Ok(stored) => {
                tracing::info!(
                    battle_id = stored.id,
                    fighter_1 = id_1,
                    fighter_2 = id_2,
                    winner = %outcome.winner,
                    turns = outcome.turns,
                    decision = %outcome.decision,
                    "duel resolved"
                );
                Ok(outcome)
            }
            Err(source) => {
                tracing::error!(
                    fighter_1 = id_1,
                    fighter_2 = id_2,
                    winner = %outcome.winner,
                    error = %source,
                    "duel resolved but not recorded"
                );
                Err(DuelError::NotRecorded {
                    outcome: Box::new(outcome),
                    source,
                })
            }
        }
    }

    async fn fetch(&self, id: &str) -> Result<Fighter, DuelError> {
        let fetch = self.directory.fetch_fighter(id, self.fetch_timeout);
        let result = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(DirectoryError::Timeout(self.fetch_timeout)),
        };
        result.map_err(|source| {
            tracing::warn!(fighter_id = id, error = %source, "fighter fetch failed");
            DuelError::FighterUnavailable {
                fighter_id: id.to_string(),
                source,
            }
        })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
