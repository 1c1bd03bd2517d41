use arena_core::BattleOutcome;
use arena_storage::StorageError;
use serde::Serialize;
use std::fmt;

use crate::directory::DirectoryError;

/// Why a duel request did not complete normally.
#[derive(Debug, thiserror::Error)]
pub enum DuelError {
    /// The request was rejected before any fighter was fetched.
    #[error("invalid duel request: {0}")]
    InvalidInput(String),

    /// A fighter could not be fetched. Nothing was simulated or written.
    #[error("fighter '{fighter_id}' unavailable: {source}")]
    FighterUnavailable {
        fighter_id: String,
        #[source]
        source: DirectoryError,
    },

    /// The duel was fought but the record could not be written.
    /// The computed outcome is still returned.
    #[error("duel resolved but not recorded: {source}")]
    NotRecorded {
        outcome: Box<BattleOutcome>,
        #[source]
        source: StorageError,
    },
}

/// Coarse error classes exposed to callers and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BadInput,
    Directory,
    Persistence,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::BadInput => "bad_input",
            ErrorCategory::Directory => "directory",
            ErrorCategory::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DuelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DuelError::InvalidInput(_) => ErrorCategory::BadInput,
            DuelError::FighterUnavailable { .. } => ErrorCategory::Directory,
            DuelError::NotRecorded { .. } => ErrorCategory::Persistence,
        }
    }

    /// The outcome of a duel that was fought but not recorded.
    pub fn outcome(&self) -> Option<&BattleOutcome> {
        match self {
            DuelError::NotRecorded { outcome, .. } => Some(&**outcome),
            _ => None,
        }
    }
}
