use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A battle ready to be written. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBattleRecord {
    pub fighter_1_id: String,
    pub fighter_2_id: String,
    pub winner: String,
    /// Log lines exactly as the simulator produced them.
    #[serde(rename = "logs")]
    pub log: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl NewBattleRecord {
    pub(crate) fn with_id(self, id: u64) -> BattleRecord {
        BattleRecord {
            id,
            fighter_1_id: self.fighter_1_id,
            fighter_2_id: self.fighter_2_id,
            winner: self.winner,
            log: self.log,
            created_at: self.created_at,
        }
    }
}

/// A persisted battle. Never updated after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Surrogate key, strictly increasing within one store.
    pub id: u64,
    pub fighter_1_id: String,
    pub fighter_2_id: String,
    pub winner: String,
    #[serde(rename = "logs")]
    pub log: Vec<String>,
    /// RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl BattleRecord {
    /// True when `fighter_id` fought in this battle, in either slot.
    pub fn involves(&self, fighter_id: &str) -> bool {
        self.fighter_1_id == fighter_id || self.fighter_2_id == fighter_id
    }
}
