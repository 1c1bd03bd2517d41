use async_trait::async_trait;

use crate::error::StorageError;
use crate::filter::HistoryFilter;
use crate::record::{BattleRecord, NewBattleRecord};

/// The storage trait for battle history backends.
///
/// ## Write semantics
///
/// `save` is all-or-nothing: when it returns `Ok`, the full record is
/// durable for that backend; when it returns `Err`, nothing visible was
/// written. Records are never updated or deleted through this trait.
///
/// ## Query semantics
///
/// `query` returns the records matching the filter's fighter (either
/// slot), newest first, bounded by [`HistoryFilter::resolved_limit`]. An
/// empty result is not an error.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so they can live in
/// axum application state and be shared across spawned tasks.
#[async_trait]
pub trait BattleStore: Send + Sync + 'static {
    /// Persist a new battle and return it with its assigned id.
    async fn save(&self, record: NewBattleRecord) -> Result<BattleRecord, StorageError>;

    /// Read battle history.
    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<BattleRecord>, StorageError>;
}
