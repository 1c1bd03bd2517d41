use std::sync::Arc;

use arena_storage::{BattleRecord, BattleStore, HistoryFilter, StorageError};

/// Read access to past battles.
#[derive(Clone)]
pub struct HistoryQuery {
    store: Arc<dyn BattleStore>,
}

impl HistoryQuery {
    pub fn new(store: Arc<dyn BattleStore>) -> Self {
        Self { store }
    }

    /// Battles matching `filter`, newest first.
    ///
    /// An empty result is not an error. Store failures are returned as is.
    pub async fn query_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<BattleRecord>, StorageError> {
        let records = self.store.query(&filter).await?;
        tracing::debug!(
            limit = filter.resolved_limit(),
            fighter_id = filter.fighter().unwrap_or(""),
            returned = records.len(),
            "history query"
        );
        Ok(records)
    }
}
