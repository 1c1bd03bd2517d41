//! Builds the directory and store a command runs against.

use std::path::Path;
use std::sync::Arc;

use arena_duel::{
    DuelOrchestrator, FighterDirectory, HttpFighterDirectory, LoadError, RngSource,
    StaticFighterDirectory,
};
use arena_storage::{BattleStore, JsonlBattleStore, MemoryBattleStore, StorageError};

use crate::config::ArenaConfig;

/// Where fighters come from for this process.
pub(crate) enum DirectorySetup {
    /// A remote directory service.
    Remote(Arc<HttpFighterDirectory>),
    /// Fighters held in this process, optionally preloaded from a file.
    Embedded(Arc<StaticFighterDirectory>),
}

impl DirectorySetup {
    pub(crate) fn port(&self) -> Arc<dyn FighterDirectory> {
        match self {
            DirectorySetup::Remote(d) => d.clone(),
            DirectorySetup::Embedded(d) => d.clone(),
        }
    }

    /// The in-process directory, when there is one to mount routes for.
    pub(crate) fn embedded(&self) -> Option<Arc<StaticFighterDirectory>> {
        match self {
            DirectorySetup::Remote(_) => None,
            DirectorySetup::Embedded(d) => Some(d.clone()),
        }
    }
}

/// A remote directory when `duelist_url` is set, otherwise an embedded one.
pub(crate) fn build_directory(config: &ArenaConfig) -> Result<DirectorySetup, LoadError> {
    if let Some(url) = &config.duelist_url {
        if config.fighters_path.is_some() {
            tracing::warn!("fighters file ignored because a remote directory is configured");
        }
        tracing::info!(url = %url, "using remote fighter directory");
        return Ok(DirectorySetup::Remote(Arc::new(HttpFighterDirectory::new(
            url.as_str(),
        ))));
    }
    let directory = match &config.fighters_path {
        Some(path) => StaticFighterDirectory::load_json_file(path)?,
        None => StaticFighterDirectory::new(),
    };
    tracing::info!(fighters = directory.len(), "using embedded fighter directory");
    Ok(DirectorySetup::Embedded(Arc::new(directory)))
}

/// JSON-lines history at `path`, or an in-memory store.
pub(crate) async fn open_store(path: Option<&Path>) -> Result<Arc<dyn BattleStore>, StorageError> {
    match path {
        Some(path) => {
            let store = JsonlBattleStore::open(path).await?;
            tracing::info!(path = %path.display(), "battle history on disk");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("battle history in memory");
            Ok(Arc::new(MemoryBattleStore::new()))
        }
    }
}

pub(crate) fn build_orchestrator(
    config: &ArenaConfig,
    directory: &DirectorySetup,
    store: Arc<dyn BattleStore>,
) -> DuelOrchestrator {
    DuelOrchestrator::new(
        directory.port(),
        store,
        RngSource::from_optional_seed(config.seed),
    )
    .with_fetch_timeout(config.fetch_timeout)
}
