//! End-to-end HTTP tests against a real listener on 127.0.0.1:0.
//!
//! Requests are written by hand as HTTP/1.1 with `Connection: close` so the
//! tests need nothing beyond tokio's TCP stream.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use grid2048::adapter::{run_server, GameRecord, ServerConfig};
use grid2048::raster::canvas_dims;

struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
    _shutdown: oneshot::Sender<()>,
}

async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        games_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };

    let (ready_tx, ready_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        let _ = run_server(config, Some(ready_tx), shutdown).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    TestServer {
        addr,
        dir,
        _shutdown: shutdown_tx,
    }
}

struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

async fn request(addr: SocketAddr, method: &str, path: &str, body: Option<&str>) -> HttpResponse {
    request_with_headers(addr, method, path, &[], body).await
}

async fn request_with_headers(
    addr: SocketAddr,
    method: &str,
    path: &str,
    extra: &[(&str, &str)],
    body: Option<&str>,
) -> HttpResponse {
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");

    let body = body.unwrap_or("");
    let extra: String = extra
        .iter()
        .map(|(k, v)| format!("{k}: {v}\r\n"))
        .collect();
    let head = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n{extra}\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(body.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("response timed out")
        .unwrap();

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = String::from_utf8_lossy(&raw[..split]).to_string();
    let body = raw[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("bad status line");
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    HttpResponse {
        status,
        headers,
        body,
    }
}

async fn create(addr: SocketAddr, body: Option<&str>) -> Value {
    let res = request(addr, "POST", "/api/games", body).await;
    assert_eq!(res.status, 200);
    res.json()
}

fn tile_count(board: &Value) -> usize {
    board
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|v| v.as_u64() != Some(0))
        .count()
}

#[tokio::test]
async fn game_lifecycle() {
    let server = start_server().await;
    let addr = server.addr;

    let game = create(addr, Some(r#"{"size":4}"#)).await;
    let id = game["gameId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 9);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(game["size"], 4);
    assert_eq!(game["score"], 0);
    assert_eq!(game["gameOver"], false);
    assert_eq!(tile_count(&game["board"]), 2);
    assert!(game.get("moved").is_none());
    let stamp = game["lastUpdated"].as_str().unwrap();
    assert!(stamp.ends_with('Z') && stamp.len() == "2024-01-01T00:00:00.000Z".len());

    // The file is on disk under the game id.
    assert!(server.dir.path().join(format!("{id}.json")).exists());

    let fetched = request(addr, "GET", &format!("/api/games/{id}"), None).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.json(), game);

    // With two tiles on a 4x4 board at least one direction moves.
    let mut moved_once = false;
    for dir in ["left", "up", "right", "down"] {
        let res = request(
            addr,
            "POST",
            &format!("/api/games/{id}/move"),
            Some(&json!({ "direction": dir }).to_string()),
        )
        .await;
        assert_eq!(res.status, 200);
        let body = res.json();
        assert_eq!(body["gameId"], id.as_str());
        if body["moved"] == true {
            moved_once = true;
            assert_eq!(tile_count(&body["board"]), 3 - usize::from(body["score"] != 0));
            break;
        }
        assert_eq!(body["board"], game["board"]);
    }
    assert!(moved_once);

    let res = request(addr, "DELETE", &format!("/api/games/{id}"), None).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json(), json!({ "message": "Game deleted successfully" }));

    let res = request(addr, "GET", &format!("/api/games/{id}"), None).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.json(), json!({ "error": "Game not found" }));

    let res = request(addr, "DELETE", &format!("/api/games/{id}"), None).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn create_validates_size() {
    let server = start_server().await;
    let addr = server.addr;

    // Empty body and empty object both mean the default size.
    assert_eq!(create(addr, None).await["size"], 4);
    assert_eq!(create(addr, Some("{}")).await["size"], 4);
    assert_eq!(create(addr, Some(r#"{"size":3}"#)).await["size"], 3);
    assert_eq!(create(addr, Some(r#"{"size":8}"#)).await["size"], 8);

    for bad in [r#"{"size":2}"#, r#"{"size":9}"#, r#"{"size":-4}"#] {
        let res = request(addr, "POST", "/api/games", Some(bad)).await;
        assert_eq!(res.status, 400, "{bad}");
        assert_eq!(res.json(), json!({ "error": "Invalid board size (3-8 allowed)" }));
    }

    let res = request(addr, "POST", "/api/games", Some("{nope")).await;
    assert_eq!(res.status, 400);
    assert!(res.json()["error"].is_string());
}

#[tokio::test]
async fn move_errors() {
    let server = start_server().await;
    let addr = server.addr;

    // Unknown game is reported before the direction is looked at.
    let res = request(addr, "POST", "/api/games/zzzzzzzzz/move", Some(r#"{"direction":"sideways"}"#)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.json(), json!({ "error": "Game not found" }));

    let res = request(addr, "POST", "/api/games/bad-id/move", Some(r#"{"direction":"up"}"#)).await;
    assert_eq!(res.status, 404);

    let game = create(addr, None).await;
    let id = game["gameId"].as_str().unwrap();
    for body in [r#"{"direction":"sideways"}"#, r#"{"direction":"UP"}"#, "{}", ""] {
        let res = request(addr, "POST", &format!("/api/games/{id}/move"), Some(body)).await;
        assert_eq!(res.status, 400, "{body:?}");
        assert_eq!(res.json(), json!({ "error": "Invalid direction" }));
    }

    // Nothing changed on disk.
    let res = request(addr, "GET", &format!("/api/games/{id}"), None).await;
    assert_eq!(res.json(), game);
}

#[tokio::test]
async fn finished_game_reports_game_over() {
    let server = start_server().await;
    let addr = server.addr;

    let record: GameRecord = serde_json::from_value(json!({
        "board": [[2, 4, 2], [4, 2, 4], [2, 4, 2]],
        "score": 120,
        "size": 3,
        "gameOver": false,
        "lastUpdated": "2024-06-01T10:00:00.000Z"
    }))
    .unwrap();
    std::fs::write(
        server.dir.path().join("done00001.json"),
        serde_json::to_vec(&record).unwrap(),
    )
    .unwrap();

    let res = request(addr, "GET", "/api/games/done00001", None).await;
    assert_eq!(res.status, 200);
    let body = res.json();
    assert_eq!(body["gameOver"], true);
    assert_eq!(body["score"], 120);

    for dir in ["up", "down", "left", "right"] {
        let res = request(
            addr,
            "POST",
            "/api/games/done00001/move",
            Some(&json!({ "direction": dir }).to_string()),
        )
        .await;
        let body = res.json();
        assert_eq!(body["moved"], false);
        assert_eq!(body["gameOver"], true);
        assert_eq!(body["lastUpdated"], "2024-06-01T10:00:00.000Z");
    }
}

#[tokio::test]
async fn corrupt_game_file_is_a_server_error() {
    let server = start_server().await;
    std::fs::write(server.dir.path().join("broken001.json"), b"{]").unwrap();

    let res = request(server.addr, "GET", "/api/games/broken001", None).await;
    assert_eq!(res.status, 500);
    assert_eq!(res.json(), json!({ "error": "Failed to get game state" }));
}

#[tokio::test]
async fn board_image_is_png() {
    let server = start_server().await;
    let addr = server.addr;
    let game = create(addr, Some(r#"{"size":5}"#)).await;
    let id = game["gameId"].as_str().unwrap();

    for query in ["", "?theme=dark", "?theme=purple"] {
        let res = request(addr, "GET", &format!("/api/games/{id}/image{query}"), None).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.header("content-type"), Some("image/png"));
        assert_eq!(res.header("cache-control"), Some("no-cache"));

        let img = image::load_from_memory(&res.body).unwrap();
        assert_eq!((img.width(), img.height()), canvas_dims(5));
    }

    let res = request(addr, "GET", "/api/games/missing00/image", None).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn tile_images() {
    let server = start_server().await;
    let addr = server.addr;

    let res = request(addr, "GET", "/api/tiles/2048?theme=dark&size=64", None).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("image/png"));
    assert_eq!(res.header("cache-control"), Some("public, max-age=86400"));
    let img = image::load_from_memory(&res.body).unwrap();
    assert_eq!((img.width(), img.height()), (64, 64));

    let res = request(addr, "GET", "/api/tiles/8", None).await;
    assert_eq!(res.status, 200);
    let img = image::load_from_memory(&res.body).unwrap();
    assert_eq!(img.width(), 100);

    let cases = [
        ("/api/tiles/3", "Invalid tile value"),
        ("/api/tiles/4096", "Invalid tile value"),
        ("/api/tiles/abc", "Invalid tile value"),
        ("/api/tiles/2?theme=blue", "Invalid theme"),
        ("/api/tiles/2?size=16", "Invalid size (32-512 allowed)"),
        ("/api/tiles/2?size=513", "Invalid size (32-512 allowed)"),
    ];
    for (path, error) in cases {
        let res = request(addr, "GET", path, None).await;
        assert_eq!(res.status, 400, "{path}");
        assert_eq!(res.json(), json!({ "error": error }), "{path}");
    }
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let server = start_server().await;
    let addr = server.addr;
    let origin = ("Origin", "http://example.com");

    let res = request_with_headers(
        addr,
        "OPTIONS",
        "/api/games",
        &[
            origin,
            ("Access-Control-Request-Method", "POST"),
            ("Access-Control-Request-Headers", "content-type"),
        ],
        None,
    )
    .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    assert!(res.header("access-control-allow-methods").is_some());

    let game = create(addr, None).await;
    let id = game["gameId"].as_str().unwrap();
    let res = request_with_headers(addr, "GET", &format!("/api/games/{id}"), &[origin], None).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    assert_eq!(res.json(), game);
}
