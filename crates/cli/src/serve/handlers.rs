//! Arena route handlers: health, duel, history.

use std::sync::Arc;

use arena_duel::{DirectoryError, DuelError, ErrorCategory};
use arena_storage::HistoryFilter;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// Error body carrying the category the caller can branch on.
fn category_error(status: StatusCode, category: ErrorCategory, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
        "category": category,
    });
    (status, Json(body)).into_response()
}

/// POST /duel
///
/// Body: `{"fighter_1": "<id>", "fighter_2": "<id>"}`
pub(crate) async fn handle_duel(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let parsed = match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            return category_error(
                StatusCode::BAD_REQUEST,
                ErrorCategory::BadInput,
                &rejection.body_text(),
            )
        }
    };

    let mut ids = [String::new(), String::new()];
    for (slot, field) in ids.iter_mut().zip(["fighter_1", "fighter_2"]) {
        match parsed.get(field).and_then(|v| v.as_str()) {
            Some(id) if !id.trim().is_empty() => *slot = id.to_string(),
            _ => {
                return category_error(
                    StatusCode::BAD_REQUEST,
                    ErrorCategory::BadInput,
                    &format!("'{}' is required and must be a non-empty string", field),
                )
            }
        }
    }

    match state.orchestrator.resolve_duel(&ids[0], &ids[1]).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => duel_error_response(&e),
    }
}

fn duel_error_response(e: &DuelError) -> Response {
    let status = match e {
        DuelError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DuelError::FighterUnavailable { source, .. } => match source {
            DirectoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            DirectoryError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DirectoryError::Unavailable(_) | DirectoryError::Malformed(_) => {
                StatusCode::BAD_GATEWAY
            }
        },
        DuelError::NotRecorded { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = serde_json::json!({
        "error": e.to_string(),
        "category": e.category(),
    });
    if let Some(outcome) = e.outcome() {
        body["outcome"] = serde_json::to_value(outcome).unwrap_or(serde_json::Value::Null);
    }
    (status, Json(body)).into_response()
}

/// Query string for GET /history. `limit` is kept as text so that an
/// unparsable value falls back to the default instead of failing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryParams {
    limit: Option<String>,
    fighter_id: Option<String>,
}

impl HistoryParams {
    fn into_filter(self) -> HistoryFilter {
        HistoryFilter {
            limit: self.limit.and_then(|l| l.trim().parse::<i64>().ok()),
            fighter_id: self.fighter_id,
        }
    }
}

/// GET /history?limit=N&fighter_id=X
pub(crate) async fn handle_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Response {
    match state.history.query_history(params.into_filter()).await {
        Ok(battles) => {
            (StatusCode::OK, Json(serde_json::json!({ "battles": battles }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "history query failed");
            category_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCategory::Persistence,
                &e.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{BattleOutcome, Decision};
    use arena_storage::StorageError;

    fn params(limit: Option<&str>, fighter_id: Option<&str>) -> HistoryParams {
        HistoryParams {
            limit: limit.map(str::to_string),
            fighter_id: fighter_id.map(str::to_string),
        }
    }

    #[test]
    fn history_params_parse_limit() {
        let filter = params(Some("10"), Some("kid")).into_filter();
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.fighter(), Some("kid"));
    }

    #[test]
    fn unparsable_limit_falls_back_to_default() {
        let filter = params(Some("lots"), None).into_filter();
        assert_eq!(filter.limit, None);
        assert_eq!(filter.resolved_limit(), 50);
    }

    #[test]
    fn duel_errors_map_to_status() {
        let not_found = DuelError::FighterUnavailable {
            fighter_id: "x".to_string(),
            source: DirectoryError::NotFound {
                id: "x".to_string(),
            },
        };
        assert_eq!(duel_error_response(&not_found).status(), StatusCode::NOT_FOUND);

        let timeout = DuelError::FighterUnavailable {
            fighter_id: "x".to_string(),
            source: DirectoryError::Timeout(std::time::Duration::from_secs(5)),
        };
        assert_eq!(
            duel_error_response(&timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );

        let down = DuelError::FighterUnavailable {
            fighter_id: "x".to_string(),
            source: DirectoryError::Unavailable("refused".to_string()),
        };
        assert_eq!(duel_error_response(&down).status(), StatusCode::BAD_GATEWAY);

        let unrecorded = DuelError::NotRecorded {
            outcome: Box::new(BattleOutcome {
                winner: "A".to_string(),
                log: vec!["Match start".to_string()],
                turns: 3,
                decision: Decision::Knockout,
            }),
            source: StorageError::Backend("disk full".to_string()),
        };
        assert_eq!(
            duel_error_response(&unrecorded).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unrecorded_duel_body_carries_outcome() {
        let unrecorded = DuelError::NotRecorded {
            outcome: Box::new(BattleOutcome {
                winner: "A".to_string(),
                log: vec!["Match start".to_string(), "A is faster!".to_string()],
                turns: 3,
                decision: Decision::Knockout,
            }),
            source: StorageError::Backend("disk full".to_string()),
        };

        let body = body_json(duel_error_response(&unrecorded)).await;
        assert_eq!(body["category"], "persistence");
        assert!(body["error"].as_str().is_some());
        assert_eq!(body["outcome"]["winner"], "A");
        assert_eq!(body["outcome"]["turns"], 3);
        assert_eq!(body["outcome"]["battle_logs"][1], "A is faster!");
    }

    #[tokio::test]
    async fn directory_error_body_has_no_outcome() {
        let down = DuelError::FighterUnavailable {
            fighter_id: "x".to_string(),
            source: DirectoryError::Unavailable("refused".to_string()),
        };

        let body = body_json(duel_error_response(&down)).await;
        assert_eq!(body["category"], "directory");
        assert!(body.get("outcome").is_none());
    }
}
