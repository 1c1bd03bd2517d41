use serde::{Deserialize, Serialize};

use crate::record::BattleRecord;

/// Number of records returned when the caller gives no usable limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Hard ceiling on one history page.
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Selection for a history query.
///
/// `limit` is kept exactly as the caller sent it; use
/// [`resolved_limit`](Self::resolved_limit) to get the effective bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub limit: Option<i64>,
    pub fighter_id: Option<String>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn for_fighter(mut self, fighter_id: impl Into<String>) -> Self {
        self.fighter_id = Some(fighter_id.into());
        self
    }

    /// The effective result bound.
    ///
    /// Absent or non-positive limits fall back to [`DEFAULT_HISTORY_LIMIT`];
    /// anything above [`MAX_HISTORY_LIMIT`] is capped. The result is always
    /// positive and never exceeds a positive caller value.
    pub fn resolved_limit(&self) -> usize {
        match self.limit {
            Some(n) if n > 0 => usize::try_from(n)
                .unwrap_or(MAX_HISTORY_LIMIT)
                .min(MAX_HISTORY_LIMIT),
            _ => DEFAULT_HISTORY_LIMIT,
        }
    }

    /// The fighter to filter on. Blank ids mean "no filter".
    pub fn fighter(&self) -> Option<&str> {
        self.fighter_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// True if the record passes the fighter filter.
    pub fn matches(&self, record: &BattleRecord) -> bool {
        match self.fighter() {
            Some(id) => record.involves(id),
            None => true,
        }
    }

    /// Filter, order newest first, and bound `records`.
    ///
    /// Ordering is by `created_at` descending; records written in the same
    /// instant are ordered by id descending. Backends that cannot push the
    /// query down use this directly.
    pub fn apply<I>(&self, records: I) -> Vec<BattleRecord>
    where
        I: IntoIterator<Item = BattleRecord>,
    {
        let mut selected: Vec<BattleRecord> =
            records.into_iter().filter(|r| self.matches(r)).collect();
        selected.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        selected.truncate(self.resolved_limit());
        selected
    }
}
