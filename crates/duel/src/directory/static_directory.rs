//! In-process fighter directory.
//!
//! Fighters are registered with [`StaticFighterDirectory::insert`] or loaded
//! from a JSON file holding an array of fighters.

use super::{DirectoryError, FighterDirectory};
use arena_core::{Fighter, FighterError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Errors loading a fighter file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read fighter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("fighter file is not a JSON array of fighters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid fighter in file: {0}")]
    Invalid(#[from] FighterError),
}

/// Directory holding fighters in memory, keyed by id.
///
/// The lock guards only the map; lookups clone the fighter out.
#[derive(Debug, Default)]
pub struct StaticFighterDirectory {
    fighters: RwLock<BTreeMap<String, Fighter>>,
}

impl StaticFighterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a set of fighters, validating each one.
    pub fn from_fighters<I>(fighters: I) -> Result<Self, FighterError>
    where
        I: IntoIterator<Item = Fighter>,
    {
        let directory = Self::new();
        for fighter in fighters {
            directory.insert(fighter)?;
        }
        Ok(directory)
    }

    /// Load fighters from a JSON file containing an array of fighters.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let fighters: Vec<Fighter> = serde_json::from_str(&text)?;
        let count = fighters.len();
        let directory = Self::from_fighters(fighters)?;
        tracing::info!(path = %path.as_ref().display(), count, "loaded fighters");
        Ok(directory)
    }

    /// Register a fighter, replacing any fighter with the same id.
    pub fn insert(&self, fighter: Fighter) -> Result<(), FighterError> {
        fighter.validate()?;
        self.fighters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fighter.id.clone(), fighter);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Fighter> {
        self.fighters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// All fighters, ordered by id.
    pub fn list(&self) -> Vec<Fighter> {
        self.fighters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fighters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FighterDirectory for StaticFighterDirectory {
    async fn fetch_fighter(&self, id: &str, _timeout: Duration) -> Result<Fighter, DirectoryError> {
        self.get(id).ok_or_else(|| DirectoryError::NotFound { id: id.to_string() })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
