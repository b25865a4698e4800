//! Tests for the REST API routes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;
use xo_server::{AppState, GameRepository, router};

fn setup_app(recent_limit: i64) -> (NamedTempFile, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, router(AppState::new(repo, recent_limit)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Body read failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn x_win_body() -> Value {
    json!({
        "winner": "X",
        "moves": [
            { "player": "X", "position": 0, "timestamp": 1_700_000_000_000_i64 },
            { "player": "O", "position": 1, "timestamp": 1_700_000_001_000_i64 },
            { "player": "X", "position": 4, "timestamp": 1_700_000_002_000_i64 },
            { "player": "O", "position": 2, "timestamp": 1_700_000_003_000_i64 },
            { "player": "X", "position": 8, "timestamp": 1_700_000_004_000_i64 }
        ],
        "finalBoard": ["X", "O", "O", "", "X", "", "", "", "X"],
        "duration": 4000
    })
}

fn draw_body() -> Value {
    json!({
        "winner": "draw",
        "moves": [],
        "finalBoard": ["X", "O", "X", "X", "O", "O", "O", "X", "X"]
    })
}

#[tokio::test]
async fn test_health() {
    let (_db, app) = setup_app(50);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK", "message": "Server is running" }));
}

#[tokio::test]
async fn test_post_game_returns_created_record() {
    let (_db, app) = setup_app(50);
    let (status, body) = send(&app, post_json("/api/games", &x_win_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().is_some_and(|id| id > 0));
    assert_eq!(body["winner"], "X");
    assert_eq!(body["moves"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["finalBoard"][0], "X");
    assert_eq!(body["finalBoard"][3], "");
    assert_eq!(body["duration"], 4000);
    assert!(body.get("createdAt").is_some());
}

#[tokio::test]
async fn test_post_without_duration_defaults_to_zero() {
    let (_db, app) = setup_app(50);
    let (status, body) = send(&app, post_json("/api/games", &draw_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["winner"], "draw");
    assert_eq!(body["duration"], 0);
}

#[tokio::test]
async fn test_post_missing_fields_is_bad_request() {
    let (_db, app) = setup_app(50);
    let body = json!({ "winner": "X", "moves": [] });
    let (status, body) = send(&app, post_json("/api/games", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));
}

#[tokio::test]
async fn test_post_without_content_type_is_missing_fields() {
    let (_db, app) = setup_app(50);
    let request = Request::builder()
        .method("POST")
        .uri("/api/games")
        .body(Body::from(x_win_body().to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));
}

#[tokio::test]
async fn test_post_empty_json_body_is_missing_fields() {
    let (_db, app) = setup_app(50);
    let request = Request::builder()
        .method("POST")
        .uri("/api/games")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));
}

#[tokio::test]
async fn test_post_malformed_json_is_json_error() {
    let (_db, app) = setup_app(50);
    let request = Request::builder()
        .method("POST")
        .uri("/api/games")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Invalid game record"))
    );
}

#[tokio::test]
async fn test_post_false_duration_defaults_to_zero() {
    let (_db, app) = setup_app(50);
    let mut body = draw_body();
    body["duration"] = json!(false);
    let (status, body) = send(&app, post_json("/api/games", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["duration"], 0);
}

#[tokio::test]
async fn test_post_invalid_winner_is_bad_request() {
    let (_db, app) = setup_app(50);
    let mut body = draw_body();
    body["winner"] = json!("tie");
    let (status, body) = send(&app, post_json("/api/games", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Invalid game record"))
    );
}

#[tokio::test]
async fn test_list_games_newest_first_with_limit() {
    let (_db, app) = setup_app(2);
    send(&app, post_json("/api/games", &x_win_body())).await;
    send(&app, post_json("/api/games", &draw_body())).await;
    send(&app, post_json("/api/games", &x_win_body())).await;

    let (status, body) = send(&app, get("/api/games")).await;
    assert_eq!(status, StatusCode::OK);
    let games = body.as_array().expect("array of games");
    assert_eq!(games.len(), 2);
    assert_eq!(games[0]["winner"], "X");
    assert_eq!(games[1]["winner"], "draw");
    assert!(games[0]["id"].as_i64() > games[1]["id"].as_i64());
}

#[tokio::test]
async fn test_stats() {
    let (_db, app) = setup_app(50);
    let (status, body) = send(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalGames"], 0);
    assert_eq!(body["xWinRate"], 0);

    send(&app, post_json("/api/games", &x_win_body())).await;
    send(&app, post_json("/api/games", &x_win_body())).await;
    send(&app, post_json("/api/games", &draw_body())).await;

    let (_, body) = send(&app, get("/api/stats")).await;
    assert_eq!(body["totalGames"], 3);
    assert_eq!(body["xWins"], 2);
    assert_eq!(body["oWins"], 0);
    assert_eq!(body["draws"], 1);
    assert_eq!(body["xWinRate"], 67);
    assert_eq!(body["oWinRate"], 0);
    assert_eq!(body["drawRate"], 33);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let repo = GameRepository::new("/nonexistent/dir/xo.db".to_string()).expect("Path accepted");
    let app = router(AppState::new(repo, 50));

    let (status, body) = send(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch statistics" }));

    let (status, body) = send(&app, get("/api/games")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch games" }));
}
