//! REST API for recorded games and statistics.
//!
//! | Method | Path         | Response                                   |
//! |--------|--------------|--------------------------------------------|
//! | GET    | `/api/games` | most recent games, newest first            |
//! | POST   | `/api/games` | `201` with the stored game                 |
//! | GET    | `/api/stats` | totals, per-outcome counts and rates       |
//! | GET    | `/health`    | liveness probe                             |

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use derive_getters::Getters;
use derive_more::Display;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};
use xo_engine::GameSummary;

use crate::db::{GameRepository, GameStats, StoredGame};

/// Shared state for request handlers.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    repository: GameRepository,
    recent_limit: i64,
}

impl AppState {
    /// Creates handler state over `repository`, listing at most `recent_limit` games.
    pub fn new(repository: GameRepository, recent_limit: i64) -> Self {
        Self {
            repository,
            recent_limit,
        }
    }
}

/// Error returned by a handler, rendered as `{"error": message}`.
#[derive(Debug, Clone, Display)]
#[display("{} ({})", message, status)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Builds the API router.
#[instrument(skip_all)]
pub fn router(state: AppState) -> Router {
    info!("Building API router");
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/stats", get(get_stats))
        .route("/health", get(health))
        .with_state(state)
}

/// Runs a blocking store call off the async workers, mapping any failure to a 500.
async fn blocking<T, F>(failure: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, crate::db::DbError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(error = %e, "{}", failure);
            Err(ApiError::internal(failure))
        }
        Err(e) => {
            error!(error = %e, "{}", failure);
            Err(ApiError::internal(failure))
        }
    }
}

#[instrument(skip_all)]
async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<StoredGame>>, ApiError> {
    let repository = state.repository().clone();
    let limit = *state.recent_limit();
    let games = blocking("Failed to fetch games", move || repository.list_recent(limit)).await?;
    debug!(count = games.len(), "Listing games");
    Ok(Json(games))
}

/// JavaScript-style truthiness, matching what existing clients send.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Decodes a request body the way JSON body parsers in existing clients expect.
///
/// A body that is not declared as JSON, or is empty, reads as `{}` so it fails
/// later as missing fields. Declared JSON that does not parse is a bad request.
pub fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid game record: {}", e)))
}

/// Validates a posted game body into a summary.
///
/// `winner`, `moves` and `finalBoard` are required; a missing or falsy
/// `duration` counts as 0.
pub fn parse_submission(mut body: Value) -> Result<GameSummary, ApiError> {
    let Some(fields) = body.as_object_mut() else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let required = ["winner", "moves", "finalBoard"];
    if !required.iter().all(|key| is_present(fields.get(*key))) {
        return Err(ApiError::bad_request("Missing required fields"));
    }

    if !is_present(fields.get("duration")) {
        fields.remove("duration");
    }

    serde_json::from_value(body).map_err(|e| ApiError::bad_request(format!("Invalid game record: {}", e)))
}

#[instrument(skip_all)]
async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredGame>), ApiError> {
    let summary = parse_body(&headers, &body)
        .and_then(parse_submission)
        .inspect_err(|e| warn!(error = %e, "Rejected game submission"))?;

    let repository = state.repository().clone();
    let stored = blocking("Failed to save game", move || repository.record_game(&summary)).await?;
    info!(game_id = stored.id(), "Game saved");
    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(skip_all)]
async fn get_stats(State(state): State<AppState>) -> Result<Json<GameStats>, ApiError> {
    let repository = state.repository().clone();
    let stats = blocking("Failed to fetch statistics", move || repository.stats()).await?;
    Ok(Json(stats))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}
