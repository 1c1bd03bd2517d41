//! Append-only JSON-lines battle store.
//!
//! One record per line, serialized with `serde_json` (which escapes any
//! newline inside a log line, so every record stays on a single line).
//! File I/O runs on the blocking pool via `tokio::task::spawn_blocking`.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::filter::HistoryFilter;
use crate::record::{BattleRecord, NewBattleRecord};
use crate::traits::BattleStore;

/// Battle store persisted to a `.jsonl` file.
///
/// Ids come from an atomic counter seeded from the highest id already in
/// the file, so concurrent saves never take a lock around file I/O.
#[derive(Debug)]
pub struct JsonlBattleStore {
    path: PathBuf,
    next_id: AtomicU64,
}

impl JsonlBattleStore {
    /// Open (or create) the store at `path`.
    ///
    /// Missing parent directories and the file itself are created. Every
    /// existing line is decoded once so a corrupt file is reported here
    /// rather than on the first query.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let scan_path = path.clone();

        let max_id = tokio::task::spawn_blocking(move || -> Result<u64, StorageError> {
            if let Some(parent) = scan_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&scan_path)?;
            let records = read_records(&scan_path, Tail::Strict)?;
            Ok(records.iter().map(|r| r.id).max().unwrap_or(0))
        })
        .await
        .map_err(join_error)??;

        tracing::debug!(path = %path.display(), max_id, "opened battle history file");

        Ok(Self {
            path,
            next_id: AtomicU64::new(max_id + 1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BattleStore for JsonlBattleStore {
    async fn save(&self, record: NewBattleRecord) -> Result<BattleRecord, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = record.with_id(id);

        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            // One buffer, one append: readers never see half a record.
            file.write_all(line.as_bytes())?;
            file.flush()?;
            Ok(())
        })
        .await
        .map_err(join_error)??;

        Ok(stored)
    }

    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<BattleRecord>, StorageError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || read_records(&path, Tail::SkipPartial))
            .await
            .map_err(join_error)??;
        Ok(filter.apply(records))
    }
}

/// How `read_records` treats a last line with no trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// Decode it like any other line.
    Strict,
    /// Skip it: a concurrent save has not finished appending.
    SkipPartial,
}

fn read_records(path: &Path, tail: Tail) -> Result<Vec<BattleRecord>, StorageError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut buf = String::new();
    let mut number = 0;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        number += 1;
        if tail == Tail::SkipPartial && !buf.ends_with('\n') {
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let record =
            serde_json::from_str::<BattleRecord>(line).map_err(|e| StorageError::Corrupt {
                line: number,
                message: e.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}

fn join_error(e: tokio::task::JoinError) -> StorageError {
    StorageError::Backend(format!("task join error: {}", e))
}
