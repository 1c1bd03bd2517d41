//! Fighter directory routes.

use std::sync::Arc;

use arena_core::Fighter;
use arena_duel::StaticFighterDirectory;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::json_error;

pub(crate) fn routes(directory: Arc<StaticFighterDirectory>) -> Router {
    Router::new()
        .route("/fighters", get(handle_list).post(handle_create))
        .route("/fighters/{id}", get(handle_get))
        .with_state(directory)
}

/// GET /fighters
async fn handle_list(State(directory): State<Arc<StaticFighterDirectory>>) -> impl IntoResponse {
    let response = serde_json::json!({ "fighters": directory.list() });
    (StatusCode::OK, Json(response))
}

/// GET /fighters/{id}
async fn handle_get(
    State(directory): State<Arc<StaticFighterDirectory>>,
    Path(id): Path<String>,
) -> Response {
    match directory.get(&id) {
        Some(fighter) => (StatusCode::OK, Json(fighter)).into_response(),
        None => json_error(
            StatusCode::NOT_FOUND,
            &format!("fighter '{}' not found", id),
        )
        .into_response(),
    }
}

/// POST /fighters
async fn handle_create(
    State(directory): State<Arc<StaticFighterDirectory>>,
    body: Result<Json<Fighter>, JsonRejection>,
) -> Response {
    let fighter = match body {
        Ok(Json(f)) => f,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, &rejection.body_text()).into_response()
        }
    };

    match directory.insert(fighter.clone()) {
        Ok(()) => {
            tracing::info!(fighter_id = %fighter.id, "fighter registered");
            (StatusCode::CREATED, Json(fighter)).into_response()
        }
        Err(e) => json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    }
}
