use std::future::Future;

use super::{make_record, TestResult};
use crate::{BattleStore, HistoryFilter};

pub(super) async fn run_save_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "save",
        "save_assigns_increasing_ids",
        save_assigns_increasing_ids(factory).await,
    ));
    results.push(TestResult::from_result(
        "save",
        "save_returns_record_fields_unchanged",
        save_returns_record_fields_unchanged(factory).await,
    ));
    results.push(TestResult::from_result(
        "save",
        "saved_record_visible_to_query",
        saved_record_visible_to_query(factory).await,
    ));
    results.push(TestResult::from_result(
        "save",
        "multiline_log_lines_round_trip",
        multiline_log_lines_round_trip(factory).await,
    ));
    results.push(TestResult::from_result(
        "save",
        "empty_log_round_trips",
        empty_log_round_trips(factory).await,
    ));

    results
}

// ── 1. ids are assigned by the store and strictly increase ───────────────────

async fn save_assigns_increasing_ids<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let mut last = 0;
    for i in 0..5 {
        let rec = s
            .save(make_record("a", "b", "a", i))
            .await
            .map_err(|e| e.to_string())?;
        if rec.id <= last {
            return Err(format!("id {} did not increase past {}", rec.id, last));
        }
        last = rec.id;
    }
    Ok(())
}

// ── 2. the returned record carries the saved fields ──────────────────────────

async fn save_returns_record_fields_unchanged<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let new = make_record("kid", "doc", "doc", 7);
    let rec = s.save(new.clone()).await.map_err(|e| e.to_string())?;
    if rec.fighter_1_id != new.fighter_1_id
        || rec.fighter_2_id != new.fighter_2_id
        || rec.winner != new.winner
        || rec.log != new.log
        || rec.created_at != new.created_at
    {
        return Err(format!("saved {:?}, got back {:?}", new, rec));
    }
    Ok(())
}

// ── 3. a saved record is returned by a subsequent query ──────────────────────

async fn saved_record_visible_to_query<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .save(make_record("a", "b", "b", 0))
        .await
        .map_err(|e| e.to_string())?;
    let all = s
        .query(&HistoryFilter::new())
        .await
        .map_err(|e| e.to_string())?;
    match all.as_slice() {
        [only] if *only == rec => Ok(()),
        other => Err(format!("expected exactly [{:?}], got {:?}", rec, other)),
    }
}

// ── 4. log lines containing newlines come back intact ────────────────────────

async fn multiline_log_lines_round_trip<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let mut new = make_record("a", "b", "a", 0);
    new.log = vec![
        "first line".to_string(),
        "second\nline with a break".to_string(),
        String::new(),
        "trailing\n".to_string(),
    ];
    s.save(new.clone()).await.map_err(|e| e.to_string())?;
    let all = s
        .query(&HistoryFilter::new())
        .await
        .map_err(|e| e.to_string())?;
    let got = all.first().ok_or("query returned nothing")?;
    if got.log != new.log {
        return Err(format!("expected log {:?}, got {:?}", new.log, got.log));
    }
    Ok(())
}

// ── 5. an empty log is stored as an empty list ───────────────────────────────

async fn empty_log_round_trips<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let mut new = make_record("a", "b", "a", 0);
    new.log.clear();
    s.save(new).await.map_err(|e| e.to_string())?;
    let all = s
        .query(&HistoryFilter::new())
        .await
        .map_err(|e| e.to_string())?;
    match all.first() {
        Some(rec) if rec.log.is_empty() => Ok(()),
        other => Err(format!("expected empty log, got {:?}", other)),
    }
}
