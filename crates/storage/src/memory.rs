//! Process-local battle store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::filter::HistoryFilter;
use crate::record::{BattleRecord, NewBattleRecord};
use crate::traits::BattleStore;

/// Battle store backed by a vector. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBattleStore {
    records: RwLock<Vec<BattleRecord>>,
}

impl MemoryBattleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored battles.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BattleStore for MemoryBattleStore {
    async fn save(&self, record: NewBattleRecord) -> Result<BattleRecord, StorageError> {
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |r| r.id + 1);
        let stored = record.with_id(id);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<BattleRecord>, StorageError> {
        let snapshot = self.records.read().await.clone();
        Ok(filter.apply(snapshot))
    }
}
