//! Integration tests for the `arena serve` and `arena directory` HTTP APIs.
//!
//! Each test starts the server as a child process on a unique port,
//! makes HTTP requests, and verifies the responses.

use std::io::Read;
use std::net::TcpStream;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

/// Atomic port counter to avoid port conflicts between parallel tests.
/// Base port is derived from process ID so separate test binaries
/// don't collide on the same port range.
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);
static PORT_INIT: std::sync::Once = std::sync::Once::new();

fn next_port() -> u16 {
    PORT_INIT.call_once(|| {
        let base = 20000 + (std::process::id() as u16 % 20000);
        NEXT_PORT.store(base, Ordering::SeqCst);
    });
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A running server process, killed on drop.
struct Server {
    child: Child,
    port: u16,
}

impl Drop for Server {
    fn drop(&mut self) {
        self.child.kill().ok();
        self.child.wait().ok();
    }
}

/// Helper: start `arena <subcommand> --port <port> <args>` and wait for the port.
fn start(subcommand: &str, port: u16, args: &[&str]) -> Server {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_arena"));
    cmd.arg(subcommand).arg("--port").arg(port.to_string());
    cmd.args(args);
    // Keep the caller's environment from changing server behavior
    for key in [
        "ARENA_PORT",
        "DUELIST_URL",
        "DUELIST_PORT",
        "ARENA_HISTORY_PATH",
        "ARENA_FIGHTERS_PATH",
        "ARENA_SEED",
        "ARENA_FETCH_TIMEOUT_SECS",
    ] {
        cmd.env_remove(key);
    }
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    let child = cmd.spawn().expect("failed to start arena");
    for _ in 0..50 {
        if TcpStream::connect(format!("127.0.0.1:{}", port)).is_ok() {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    Server { child, port }
}

fn start_arena(args: &[&str]) -> Server {
    start("serve", next_port(), args)
}

fn start_arena_with_fixtures(extra: &[&str]) -> Server {
    let fighters = fixture("fighters.json");
    let mut args = vec!["--fighters", fighters.to_str().expect("utf-8 path"), "--seed", "7"];
    args.extend_from_slice(extra);
    start_arena(&args)
}

/// Helper: make a simple HTTP GET request and return (status, body).
fn http_get(port: u16, path: &str) -> (u16, String) {
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost:{}\r\nConnection: close\r\n\r\n",
        path, port
    );
    send(port, &request)
}

/// Helper: make a simple HTTP POST request and return (status, body).
fn http_post(port: u16, path: &str, body: &str) -> (u16, String) {
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: localhost:{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        path, port, body.len(), body
    );
    send(port, &request)
}

fn send(port: u16, request: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);

    parse_http_response(&response)
}

/// Parse an HTTP response into (status_code, body).
fn parse_http_response(response: &str) -> (u16, String) {
    let parts: Vec<&str> = response.splitn(2, "\r\n\r\n").collect();
    let headers = parts.first().unwrap_or(&"").to_string();
    let body = parts.get(1).unwrap_or(&"").to_string();

    let status_line = headers.lines().next().unwrap_or("");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    // Handle chunked transfer encoding
    let body = if headers
        .to_ascii_lowercase()
        .contains("transfer-encoding: chunked")
    {
        decode_chunked(&body)
    } else {
        body
    };

    (status, body)
}

/// Decode chunked transfer encoding.
fn decode_chunked(data: &str) -> String {
    let mut result = String::new();
    let mut remaining = data;

    while let Some(line_end) = remaining.find("\r\n") {
        let size = match usize::from_str_radix(remaining[..line_end].trim(), 16) {
            Ok(s) => s,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + size;
        if chunk_end > remaining.len() {
            result.push_str(&remaining[chunk_start..]);
            break;
        }
        result.push_str(&remaining[chunk_start..chunk_end]);
        remaining = remaining.get(chunk_end + 2..).unwrap_or("");
    }

    result
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON {:?}: {}", body, e))
}

// ──────────────────────────────────────────────
// 1. Health and routing
// ──────────────────────────────────────────────

#[test]
fn health_returns_200_with_version() {
    let server = start_arena(&[]);
    let (status, body) = http_get(server.port, "/health");
    assert_eq!(status, 200);
    let v = json(&body);
    assert_eq!(v["status"], "ok");
    assert!(v["version"].is_string());
}

#[test]
fn unknown_route_returns_404_json() {
    let server = start_arena(&[]);
    let (status, body) = http_get(server.port, "/does-not-exist");
    assert_eq!(status, 404);
    assert!(json(&body)["error"].is_string());
}

// ──────────────────────────────────────────────
// 2. POST /duel
// ──────────────────────────────────────────────

#[test]
fn duel_returns_outcome_and_records_it() {
    let server = start_arena_with_fixtures(&[]);
    let (status, body) = http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "doc"}"#,
    );
    assert_eq!(status, 200, "{body}");
    let outcome = json(&body);
    assert_eq!(outcome["winner"], "The Kid");
    assert_eq!(outcome["decision"], "knockout");
    let logs = outcome["battle_logs"].as_array().expect("battle_logs array");
    assert_eq!(logs[0], "Match start: The Kid (HP: 100) vs Doc Holliday (HP: 50)");
    assert_eq!(logs[1], "The Kid is faster!");

    let (status, body) = http_get(server.port, "/history");
    assert_eq!(status, 200);
    let battles = json(&body)["battles"].as_array().cloned().unwrap_or_default();
    assert_eq!(battles.len(), 1);
    assert_eq!(battles[0]["fighter_1_id"], "kid");
    assert_eq!(battles[0]["fighter_2_id"], "doc");
    assert_eq!(battles[0]["winner"], "The Kid");
    assert_eq!(battles[0]["logs"], outcome["battle_logs"]);
}

#[test]
fn duel_missing_field_is_bad_input() {
    let server = start_arena_with_fixtures(&[]);
    let (status, body) = http_post(server.port, "/duel", r#"{"fighter_1": "kid"}"#);
    assert_eq!(status, 400);
    let v = json(&body);
    assert_eq!(v["category"], "bad_input");
    assert!(v["error"].as_str().unwrap_or("").contains("fighter_2"));
}

#[test]
fn duel_empty_id_is_bad_input() {
    let server = start_arena_with_fixtures(&[]);
    let (status, body) = http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "", "fighter_2": "doc"}"#,
    );
    assert_eq!(status, 400);
    assert_eq!(json(&body)["category"], "bad_input");
}

#[test]
fn duel_malformed_json_is_bad_input() {
    let server = start_arena_with_fixtures(&[]);
    let (status, body) = http_post(server.port, "/duel", "{not json");
    assert_eq!(status, 400);
    assert_eq!(json(&body)["category"], "bad_input");
}

#[test]
fn duel_unknown_fighter_is_404_and_not_recorded() {
    let server = start_arena_with_fixtures(&[]);
    let (status, body) = http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "ghost"}"#,
    );
    assert_eq!(status, 404);
    let v = json(&body);
    assert_eq!(v["category"], "directory");
    assert!(v["error"].as_str().unwrap_or("").contains("ghost"));

    let (_, body) = http_get(server.port, "/history");
    assert_eq!(json(&body)["battles"], serde_json::json!([]));
}

#[test]
fn unreachable_remote_directory_is_502() {
    // Nothing listens on this port.
    let dead = next_port();
    let url = format!("http://127.0.0.1:{}", dead);
    let server = start_arena(&["--duelist-url", url.as_str()]);
    let (status, body) = http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "doc"}"#,
    );
    assert_eq!(status, 502, "{body}");
    assert_eq!(json(&body)["category"], "directory");
}

// ──────────────────────────────────────────────
// 3. GET /history
// ──────────────────────────────────────────────

#[test]
fn history_filters_and_limits() {
    let server = start_arena_with_fixtures(&[]);
    for (a, b) in [("kid", "doc"), ("calamity", "doc"), ("kid", "calamity")] {
        let body = format!(r#"{{"fighter_1": "{}", "fighter_2": "{}"}}"#, a, b);
        let (status, _) = http_post(server.port, "/duel", &body);
        assert_eq!(status, 200);
    }

    let (status, body) = http_get(server.port, "/history?limit=1&fighter_id=doc");
    assert_eq!(status, 200);
    let battles = json(&body)["battles"].as_array().cloned().unwrap_or_default();
    assert_eq!(battles.len(), 1);
    // Newest battle involving doc.
    assert_eq!(battles[0]["fighter_1_id"], "calamity");
    assert_eq!(battles[0]["fighter_2_id"], "doc");

    let (_, body) = http_get(server.port, "/history?fighter_id=kid");
    let battles = json(&body)["battles"].as_array().cloned().unwrap_or_default();
    assert_eq!(battles.len(), 2);
    assert_eq!(battles[0]["fighter_2_id"], "calamity");
}

#[test]
fn history_bad_limit_falls_back_to_default() {
    let server = start_arena_with_fixtures(&[]);
    http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "doc"}"#,
    );
    for query in ["/history?limit=abc", "/history?limit=0", "/history?limit=-4"] {
        let (status, body) = http_get(server.port, query);
        assert_eq!(status, 200, "{query}");
        assert_eq!(
            json(&body)["battles"].as_array().map(|a| a.len()),
            Some(1),
            "{query}"
        );
    }
}

#[test]
fn history_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("battles.jsonl");
    let history = history.to_str().expect("utf-8 path");

    {
        let server = start_arena_with_fixtures(&["--history", history]);
        let (status, _) = http_post(
            server.port,
            "/duel",
            r#"{"fighter_1": "kid", "fighter_2": "doc"}"#,
        );
        assert_eq!(status, 200);
    }

    let server = start_arena_with_fixtures(&["--history", history]);
    let (_, body) = http_get(server.port, "/history");
    let battles = json(&body)["battles"].as_array().cloned().unwrap_or_default();
    assert_eq!(battles.len(), 1);
    assert_eq!(battles[0]["id"], 1);
}

// ──────────────────────────────────────────────
// 4. Fighter directory
// ──────────────────────────────────────────────

#[test]
fn embedded_directory_accepts_new_fighters() {
    let server = start_arena(&[]);
    let fighter = r#"{"id": "bill", "name": "Wild Bill", "health": 80, "damage": 12, "speed": 7, "accuracy": 0.9}"#;
    let (status, body) = http_post(server.port, "/fighters", fighter);
    assert_eq!(status, 201, "{body}");

    let (status, body) = http_get(server.port, "/fighters/bill");
    assert_eq!(status, 200);
    assert_eq!(json(&body)["name"], "Wild Bill");

    let (status, _) = http_post(
        server.port,
        "/duel",
        r#"{"fighter_1": "bill", "fighter_2": "bill"}"#,
    );
    assert_eq!(status, 200);
}

#[test]
fn directory_rejects_invalid_fighter() {
    let server = start("directory", next_port(), &[]);
    let fighter = r#"{"id": "x", "name": "X", "health": 0, "damage": 1, "speed": 1, "accuracy": 0.5}"#;
    let (status, body) = http_post(server.port, "/fighters", fighter);
    assert_eq!(status, 400);
    assert!(json(&body)["error"].as_str().unwrap_or("").contains("health"));
}

#[test]
fn directory_lists_and_misses() {
    let fighters = fixture("fighters.json");
    let server = start(
        "directory",
        next_port(),
        &["--fighters", fighters.to_str().expect("utf-8 path")],
    );

    let (status, body) = http_get(server.port, "/fighters");
    assert_eq!(status, 200);
    let ids: Vec<String> = json(&body)["fighters"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|f| f["id"].as_str().map(str::to_string))
        .collect();
    assert_eq!(ids, vec!["calamity", "doc", "kid"]);

    let (status, _) = http_get(server.port, "/fighters/ghost");
    assert_eq!(status, 404);
}

#[test]
fn arena_fetches_from_remote_directory() {
    let fighters = fixture("fighters.json");
    let directory = start(
        "directory",
        next_port(),
        &["--fighters", fighters.to_str().expect("utf-8 path")],
    );
    let url = format!("http://127.0.0.1:{}", directory.port);
    let arena = start_arena(&["--duelist-url", url.as_str(), "--seed", "3"]);

    let (status, body) = http_post(
        arena.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "doc"}"#,
    );
    assert_eq!(status, 200, "{body}");
    assert_eq!(json(&body)["winner"], "The Kid");

    // A remote directory is not re-exported by the arena.
    let (status, _) = http_get(arena.port, "/fighters/kid");
    assert_eq!(status, 404);

    let (status, body) = http_post(
        arena.port,
        "/duel",
        r#"{"fighter_1": "kid", "fighter_2": "ghost"}"#,
    );
    assert_eq!(status, 404, "{body}");
}
