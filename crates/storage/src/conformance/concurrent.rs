use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use super::{make_record, TestResult};
use crate::{BattleStore, HistoryFilter, StorageError};

/// Number of concurrent saves spawned in each test.
const N: usize = 40;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_saves_get_unique_ids",
            concurrent_saves_get_unique_ids(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "queries_during_saves_see_whole_records",
            queries_during_saves_see_whole_records(factory).await,
        ),
    ]
}

/// Spawn `N` saves at once and collect the stored records.
async fn save_in_parallel<S: BattleStore>(store: &Arc<S>) -> Result<Vec<u64>, String> {
    let mut handles = Vec::new();
    for i in 0..N {
        let s = store.clone();
        handles.push(tokio::spawn(async move {
            let fighter = format!("f{i}");
            s.save(make_record(&fighter, "rival", &fighter, i as i64)).await
        }));
    }

    let mut ids = Vec::with_capacity(N);
    for handle in handles {
        let record = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e| format!("save: {e}"))?;
        ids.push(record.id);
    }
    Ok(ids)
}

// ── Unique ids ──────────────────────────────────────────────────────────────

/// N parallel saves all succeed, get distinct ids, and are all queryable.
async fn concurrent_saves_get_unique_ids<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = Arc::new(factory().await);
    let ids = save_in_parallel(&store).await?;

    let distinct: BTreeSet<u64> = ids.iter().copied().collect();
    if distinct.len() != N {
        return Err(format!("expected {N} distinct ids, got {ids:?}"));
    }

    let stored = store
        .query(&HistoryFilter::new().with_limit(N as i64))
        .await
        .map_err(|e| format!("query: {e}"))?;
    let stored_ids: BTreeSet<u64> = stored.iter().map(|r| r.id).collect();
    if stored_ids != distinct {
        return Err(format!(
            "query returned ids {stored_ids:?}, saves returned {distinct:?}"
        ));
    }
    Ok(())
}

// ── Reads during writes ─────────────────────────────────────────────────────

/// Queries racing the saves never fail, never see a torn record, and see
/// each record with the fields it was saved with.
async fn queries_during_saves_see_whole_records<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = Arc::new(factory().await);

    let mut readers = Vec::new();
    for _ in 0..N {
        let s = store.clone();
        readers.push(tokio::spawn(async move {
            s.query(&HistoryFilter::new().with_limit(N as i64)).await
        }));
    }
    save_in_parallel(&store).await?;

    for reader in readers {
        let seen = match reader.await.map_err(|e| format!("task panic: {e}"))? {
            Ok(records) => records,
            Err(StorageError::Corrupt { line, message }) => {
                return Err(format!("torn record at line {line}: {message}"));
            }
            Err(e) => return Err(format!("query: {e}")),
        };
        for record in seen {
            if record.winner != record.fighter_1_id || record.log.len() != 2 {
                return Err(format!("partially written record: {record:?}"));
            }
        }
    }

    let stored = store
        .query(&HistoryFilter::new().with_limit(N as i64))
        .await
        .map_err(|e| format!("final query: {e}"))?;
    if stored.len() != N {
        return Err(format!("expected {N} records, got {}", stored.len()));
    }
    Ok(())
}
