//! arena-duel: resolving duels and reading them back.
//!
//! The [`DuelOrchestrator`] fetches two fighters from a [`FighterDirectory`],
//! runs [`arena_core::simulate()`] and writes the result to a
//! [`BattleStore`](arena_storage::BattleStore). [`HistoryQuery`] reads
//! battles back out of the same store.
//!
//! Both collaborators are injected, so callers choose the backends:
//!
//! - [`StaticFighterDirectory`] -- fighters held in process
//! - [`HttpFighterDirectory`] -- fighters served by a remote directory

pub mod directory;
mod error;
mod history;
mod orchestrator;
mod rng;

pub use directory::http::HttpFighterDirectory;
pub use directory::static_directory::{LoadError, StaticFighterDirectory};
pub use directory::{DirectoryError, FighterDirectory};
pub use error::{DuelError, ErrorCategory};
pub use history::HistoryQuery;
pub use orchestrator::{DuelOrchestrator, DEFAULT_FETCH_TIMEOUT};
pub use rng::RngSource;
