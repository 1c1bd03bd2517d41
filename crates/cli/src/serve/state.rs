//! Application state shared across request handlers.

use arena_duel::{DuelOrchestrator, HistoryQuery};

pub(crate) struct AppState {
    /// Resolves `POST /duel`.
    pub(crate) orchestrator: DuelOrchestrator,
    /// Serves `GET /history`.
    pub(crate) history: HistoryQuery,
}
