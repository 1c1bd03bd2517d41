//! `arena serve` and `arena directory` -- HTTP JSON services.
//!
//! Arena endpoints:
//! - GET  /health                      - Server status
//! - POST /duel                        - Resolve a duel between two fighters
//! - GET  /history?limit=N&fighter_id= - Past battles, newest first
//!
//! Directory endpoints (served by `arena directory`, and mounted on the
//! arena itself when no remote directory is configured):
//! - GET  /fighters                    - All fighters
//! - POST /fighters                    - Register a fighter
//! - GET  /fighters/{id}               - One fighter
//!
//! All responses use Content-Type: application/json.

mod directory;
mod handlers;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use arena_duel::{HistoryQuery, StaticFighterDirectory};
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use self::handlers::{handle_duel, handle_health, handle_history, handle_not_found};
use self::state::AppState;
use crate::config::ArenaConfig;
use crate::wiring::{build_directory, build_orchestrator, open_store};

/// Maximum request body size: 64 KB.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Start the arena service on `config.port`.
pub async fn start_server(config: ArenaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config.history_path.as_deref()).await?;
    let directory = build_directory(&config)?;
    let orchestrator = build_orchestrator(&config, &directory, store.clone());

    let state = Arc::new(AppState {
        orchestrator,
        history: HistoryQuery::new(store),
    });

    let app = with_common_layers(arena_router(state, directory.embedded()));
    run(app, config.port, "arena").await
}

/// Start a standalone fighter directory on `port`.
pub async fn start_directory_server(
    port: u16,
    fighters: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = match fighters {
        Some(path) => StaticFighterDirectory::load_json_file(path)?,
        None => StaticFighterDirectory::new(),
    };
    tracing::info!(fighters = directory.len(), "directory ready");

    let app = Router::new()
        .route("/health", get(handle_health))
        .merge(directory::routes(Arc::new(directory)));
    run(with_common_layers(app), port, "fighter directory").await
}

/// Arena routes, plus the directory routes when the directory is embedded.
pub(crate) fn arena_router(
    state: Arc<AppState>,
    embedded: Option<Arc<StaticFighterDirectory>>,
) -> Router {
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/duel", post(handle_duel))
        .route("/history", get(handle_history))
        .with_state(state);

    match embedded {
        Some(directory) => app.merge(directory::routes(directory)),
        None => app,
    }
}

fn with_common_layers(app: Router) -> Router {
    // CORS: permissive, the services carry no credentials
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    app.fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}

async fn run(app: Router, port: u16, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} listening on http://{}", name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("{} shut down", name);
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::Fighter;
    use arena_duel::{DuelOrchestrator, RngSource};
    use arena_storage::MemoryBattleStore;

    fn fighter(id: &str, health: i64) -> Fighter {
        Fighter {
            id: id.to_string(),
            name: id.to_uppercase(),
            health,
            damage: 20,
            speed: 5,
            accuracy: 1.0,
        }
    }

    /// Bind an ephemeral port, serve the arena with an embedded directory,
    /// return the base URL.
    async fn spawn_arena() -> String {
        let directory = Arc::new(
            StaticFighterDirectory::from_fighters([fighter("a", 100), fighter("b", 40)]).unwrap(),
        );
        let store = Arc::new(MemoryBattleStore::new());
        let state = Arc::new(AppState {
            orchestrator: DuelOrchestrator::new(
                directory.clone(),
                store.clone(),
                RngSource::with_seed(5),
            ),
            history: HistoryQuery::new(store),
        });
        let app = with_common_layers(arena_router(state, Some(directory)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }

    /// Minimal HTTP/1.1 exchange over a raw socket; returns (status, body).
    async fn request(addr: &str, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let body = body.unwrap_or("");
        let req = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            method,
            path,
            addr,
            body.len(),
            body
        );
        stream.write_all(req.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let text = String::from_utf8_lossy(&raw).to_string();

        let (head, rest) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        (status, rest.to_string())
    }

    #[tokio::test]
    async fn duel_then_history_round_trip() {
        let addr = spawn_arena().await;

        let (status, body) = request(
            &addr,
            "POST",
            "/duel",
            Some(r#"{"fighter_1":"a","fighter_2":"b"}"#),
        )
        .await;
        assert_eq!(status, 200, "{body}");
        assert!(body.contains("\"winner\":\"A\""), "{body}");
        assert!(body.contains("\"battle_logs\""), "{body}");

        let (status, body) = request(&addr, "GET", "/history?fighter_id=b", None).await;
        assert_eq!(status, 200);
        assert!(body.contains("\"fighter_2_id\":\"b\""), "{body}");
    }

    #[tokio::test]
    async fn embedded_directory_routes_are_mounted() {
        let addr = spawn_arena().await;
        let (status, body) = request(&addr, "GET", "/fighters/a", None).await;
        assert_eq!(status, 200);
        assert!(body.contains("\"name\":\"A\""), "{body}");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let addr = spawn_arena().await;
        let (status, body) = request(&addr, "GET", "/nope", None).await;
        assert_eq!(status, 404);
        assert!(body.contains("\"error\""), "{body}");
    }
}
