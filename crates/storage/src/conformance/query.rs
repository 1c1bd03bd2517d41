use std::future::Future;

use super::{make_record, TestResult};
use crate::{BattleRecord, BattleStore, HistoryFilter, DEFAULT_HISTORY_LIMIT};

pub(super) async fn run_query_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "query",
        "empty_store_returns_empty",
        empty_store_returns_empty(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "newest_first",
        newest_first(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "same_instant_orders_by_id_desc",
        same_instant_orders_by_id_desc(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "fighter_filter_matches_either_slot",
        fighter_filter_matches_either_slot(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "limit_bounds_result",
        limit_bounds_result(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "limit_and_fighter_combine",
        limit_and_fighter_combine(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "zero_limit_uses_default",
        zero_limit_uses_default(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "negative_limit_uses_default",
        negative_limit_uses_default(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "unknown_fighter_returns_empty",
        unknown_fighter_returns_empty(factory).await,
    ));
    results.push(TestResult::from_result(
        "query",
        "blank_fighter_is_no_filter",
        blank_fighter_is_no_filter(factory).await,
    ));

    results
}

async fn seed<S: BattleStore>(s: &S, rows: &[(&str, &str, &str, i64)]) -> Result<(), String> {
    for (f1, f2, w, offset) in rows {
        s.save(make_record(f1, f2, w, *offset))
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn run_query<S: BattleStore>(
    s: &S,
    filter: &HistoryFilter,
) -> Result<Vec<BattleRecord>, String> {
    s.query(filter).await.map_err(|e| e.to_string())
}

fn pairs(records: &[BattleRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|r| (r.fighter_1_id.clone(), r.fighter_2_id.clone()))
        .collect()
}

fn expect_pairs(records: &[BattleRecord], expected: &[(&str, &str)]) -> Result<(), String> {
    let got = pairs(records);
    let want: Vec<(String, String)> = expected
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    if got != want {
        return Err(format!("expected {:?}, got {:?}", want, got));
    }
    Ok(())
}

// ── 1. an empty store is not an error ────────────────────────────────────────

async fn empty_store_returns_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let all = run_query(&s, &HistoryFilter::new()).await?;
    if !all.is_empty() {
        return Err(format!("expected no records, got {}", all.len()));
    }
    let filtered = run_query(&s, &HistoryFilter::new().for_fighter("a").with_limit(5)).await?;
    if !filtered.is_empty() {
        return Err(format!("expected no filtered records, got {}", filtered.len()));
    }
    Ok(())
}

// ── 2. results come back by created_at descending ────────────────────────────

async fn newest_first<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    // Saved out of time order on purpose.
    seed(&s, &[("a", "b", "a", 10), ("c", "d", "c", 30), ("e", "f", "e", 20)]).await?;
    let all = run_query(&s, &HistoryFilter::new()).await?;
    expect_pairs(&all, &[("c", "d"), ("e", "f"), ("a", "b")])
}

// ── 3. ties on created_at fall back to id descending ─────────────────────────

async fn same_instant_orders_by_id_desc<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[("a", "b", "a", 0), ("c", "d", "c", 0), ("e", "f", "e", 0)]).await?;
    let all = run_query(&s, &HistoryFilter::new()).await?;
    let ids: Vec<u64> = all.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    if ids != sorted {
        return Err(format!("ids not descending: {:?}", ids));
    }
    expect_pairs(&all, &[("e", "f"), ("c", "d"), ("a", "b")])
}

// ── 4. a fighter filter matches both fighter_1 and fighter_2 ─────────────────

async fn fighter_filter_matches_either_slot<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(
        &s,
        &[
            ("x", "a", "x", 1),
            ("b", "c", "b", 2),
            ("d", "x", "d", 3),
            ("e", "f", "f", 4),
        ],
    )
    .await?;
    let got = run_query(&s, &HistoryFilter::new().for_fighter("x")).await?;
    if got.iter().any(|r| !r.involves("x")) {
        return Err(format!("record without x leaked into {:?}", pairs(&got)));
    }
    expect_pairs(&got, &[("d", "x"), ("x", "a")])
}

// ── 5. a positive limit bounds the result length ─────────────────────────────

async fn limit_bounds_result<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for i in 0..6 {
        seed(&s, &[("a", "b", "a", i)]).await?;
    }
    let got = run_query(&s, &HistoryFilter::new().with_limit(4)).await?;
    if got.len() != 4 {
        return Err(format!("expected 4 records, got {}", got.len()));
    }
    let newest = got.first().ok_or("no records")?;
    if newest.created_at != super::base_time() + time::Duration::seconds(5) {
        return Err(format!("limit dropped the newest record: {:?}", newest));
    }
    let all = run_query(&s, &HistoryFilter::new().with_limit(100)).await?;
    if all.len() != 6 {
        return Err(format!("limit above count should return all 6, got {}", all.len()));
    }
    Ok(())
}

// ── 6. limit applies after the fighter filter ────────────────────────────────

async fn limit_and_fighter_combine<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(
        &s,
        &[
            ("x", "a", "x", 1),
            ("b", "c", "b", 2),
            ("x", "d", "d", 3),
            ("e", "f", "e", 4),
            ("g", "x", "x", 5),
        ],
    )
    .await?;
    let got = run_query(&s, &HistoryFilter::new().for_fighter("x").with_limit(2)).await?;
    expect_pairs(&got, &[("g", "x"), ("x", "d")])
}

// ── 7. limit 0 falls back to the default page size ───────────────────────────

async fn zero_limit_uses_default<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let extra = 5;
    for i in 0..(DEFAULT_HISTORY_LIMIT as i64 + extra) {
        seed(&s, &[("a", "b", "a", i)]).await?;
    }
    let got = run_query(&s, &HistoryFilter::new().with_limit(0)).await?;
    if got.len() != DEFAULT_HISTORY_LIMIT {
        return Err(format!(
            "expected {} records, got {}",
            DEFAULT_HISTORY_LIMIT,
            got.len()
        ));
    }
    Ok(())
}

// ── 8. negative limits are treated like a missing limit ──────────────────────

async fn negative_limit_uses_default<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[("a", "b", "a", 0), ("a", "c", "c", 1), ("b", "c", "b", 2)]).await?;
    let got = run_query(&s, &HistoryFilter::new().with_limit(-1)).await?;
    if got.len() != 3 {
        return Err(format!("expected all 3 records, got {}", got.len()));
    }
    Ok(())
}

// ── 9. a fighter with no battles yields an empty list ────────────────────────

async fn unknown_fighter_returns_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[("a", "b", "a", 0), ("b", "c", "c", 1)]).await?;
    let got = run_query(&s, &HistoryFilter::new().for_fighter("nobody")).await?;
    if !got.is_empty() {
        return Err(format!("expected no records, got {:?}", pairs(&got)));
    }
    Ok(())
}

// ── 10. an empty or blank fighter id means no filter ─────────────────────────

async fn blank_fighter_is_no_filter<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[("a", "b", "a", 0), ("c", "d", "c", 1)]).await?;
    for blank in ["", "  "] {
        let got = run_query(&s, &HistoryFilter::new().for_fighter(blank)).await?;
        if got.len() != 2 {
            return Err(format!(
                "fighter {:?} should not filter, got {} records",
                blank,
                got.len()
            ));
        }
    }
    Ok(())
}
