//! Battle history persistence.
//!
//! [`BattleStore`] is the port the duel orchestrator writes to and the
//! history query reads from. Two backends ship with the crate:
//!
//! - [`MemoryBattleStore`] -- process-local, for tests and throwaway runs
//! - [`JsonlBattleStore`] -- append-only JSON-lines file on disk
//!
//! Backends are checked against [`conformance::run_conformance_suite`].

pub mod conformance;
mod error;
mod filter;
mod jsonl;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use filter::{HistoryFilter, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use jsonl::JsonlBattleStore;
pub use memory::MemoryBattleStore;
pub use record::{BattleRecord, NewBattleRecord};
pub use traits::BattleStore;
