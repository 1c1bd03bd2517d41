//! Fighter directory abstraction.
//!
//! A [`FighterDirectory`] owns fighter attributes. The arena never stores
//! fighters itself: every duel fetches both snapshots fresh.
//!
//! Two implementations ship with the crate:
//! - [`StaticFighterDirectory`](static_directory::StaticFighterDirectory) -- in-process map, also backs the directory service
//! - [`HttpFighterDirectory`](http::HttpFighterDirectory) -- remote directory over HTTP

pub mod http;
pub mod static_directory;

use arena_core::Fighter;
use async_trait::async_trait;
use std::time::Duration;

// ──────────────────────────────────────────────
// DirectoryError
// ──────────────────────────────────────────────

/// Errors that can occur when fetching a fighter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The directory answered and has no fighter with this id.
    #[error("fighter '{id}' not found")]
    NotFound { id: String },

    /// The directory could not be reached or answered with an error.
    #[error("fighter directory unavailable: {0}")]
    Unavailable(String),

    /// No answer within the allowed time.
    #[error("fighter directory did not answer within {0:?}")]
    Timeout(Duration),

    /// The directory answered with something that is not a fighter.
    #[error("malformed fighter from directory: {0}")]
    Malformed(String),
}

// ──────────────────────────────────────────────
// FighterDirectory trait
// ──────────────────────────────────────────────

/// Fetches fighter snapshots by id.
///
/// `timeout` is the most the caller is willing to wait. Implementations
/// that talk to a network should configure their client with it; callers
/// enforce it independently as well.
#[async_trait]
pub trait FighterDirectory: Send + Sync + 'static {
    async fn fetch_fighter(&self, id: &str, timeout: Duration) -> Result<Fighter, DirectoryError>;
}
