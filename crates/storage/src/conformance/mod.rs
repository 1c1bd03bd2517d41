//! Conformance test suite for `BattleStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any `BattleStore`
//! implementation can run to verify correctness. The suite covers:
//!
//! - **Save**: id assignment, field fidelity, multi-line log round trips
//! - **Query**: newest-first ordering, fighter filtering on either slot,
//!   limit resolution, empty results
//! - **Concurrent**: parallel saves get unique ids, queries racing saves
//!   never see a half-written record
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty store for each test:
//!
//! ```ignore
//! use arena_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test(flavor = "multi_thread")]
//! async fn my_backend_conformance() {
//!     let report = run_conformance_suite(|| async { MyStore::connect_fresh().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod concurrent;
mod query;
mod save;

use std::fmt;
use std::future::Future;

use time::{Duration, OffsetDateTime};

use crate::record::NewBattleRecord;
use crate::BattleStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "save", "query").
    pub category: String,
    /// Test name (e.g. "save_assigns_increasing_ids").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// store, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: BattleStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(save::run_save_tests(&factory).await);
    results.extend(query::run_query_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: record constructors with sensible defaults ──────────────────────

/// Fixed base instant for test records.
pub fn base_time() -> OffsetDateTime {
    time::macros::datetime!(2025-01-01 00:00:00 UTC)
}

/// A battle between `fighter_1` and `fighter_2`, created `offset_secs`
/// seconds after [`base_time`].
pub fn make_record(
    fighter_1: &str,
    fighter_2: &str,
    winner: &str,
    offset_secs: i64,
) -> NewBattleRecord {
    NewBattleRecord {
        fighter_1_id: fighter_1.to_string(),
        fighter_2_id: fighter_2.to_string(),
        winner: winner.to_string(),
        log: vec![
            format!("Match start: {} (HP: 100) vs {} (HP: 100)", fighter_1, fighter_2),
            format!("{} is faster!", fighter_1),
        ],
        created_at: base_time() + Duration::seconds(offset_secs),
    }
}
