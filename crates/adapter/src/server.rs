//! HTTP server for the game API
//!
//! Routes requests onto the engine and the game store.
//! Uses axum on tokio.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use crate::core::{EngineError, GameState, MoveOutcome, SystemClock};
use crate::id::{generate_game_id, is_valid_game_id};
use crate::protocol::*;
use crate::store::GameStore;
use crate::types::{Theme, DEFAULT_SIZE};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub games_dir: PathBuf,
    /// Games whose file has not been written for this long are deleted.
    pub max_game_age: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            games_dir: PathBuf::from("games"),
            max_game_age: Duration::from_secs(24 * 60 * 60),
            cleanup_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("GRID2048_HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let games_dir = env::var("GRID2048_GAMES_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
            .unwrap_or(defaults.games_dir);

        let secs = |key: &str| -> Option<Duration> {
            env::var(key)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        };
        let max_game_age = secs("GRID2048_MAX_AGE_SECS").unwrap_or(defaults.max_game_age);
        let cleanup_interval = secs("GRID2048_CLEANUP_INTERVAL_SECS")
            .filter(|d| !d.is_zero())
            .unwrap_or(defaults.cleanup_interval);

        Self {
            host,
            port,
            games_dir,
            max_game_age,
            cleanup_interval,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("invalid host/port combination")
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
}

impl AppState {
    pub fn new(store: GameStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Failure of one API request, rendered as `{ "error": "..." }`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Game not found")]
    NotFound,
    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidSize(_) => ApiError::bad_request("Invalid board size (3-8 allowed)"),
            EngineError::InvalidDirection(_) => ApiError::bad_request("Invalid direction"),
            EngineError::InvalidBoard(_) => ApiError::Internal {
                message: "Stored game is corrupt",
                cause: err.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, cause } = &self {
            error!("{message}: {cause:#}");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

trait OrInternal<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> OrInternal<T> for Result<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|cause| ApiError::Internal { message, cause })
    }
}

/// Parse a JSON body. An empty body reads as the type's default.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid JSON body"))
}

/// Build the API router. Any origin may call it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/games", post(create_game))
        .route("/api/games/:game_id", get(get_game).delete(delete_game))
        .route("/api/games/:game_id/move", post(make_move))
        .route("/api/games/:game_id/image", get(game_image))
        .route("/api/tiles/:value", get(tile_image))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Randomness is drawn in these sync helpers so a `ThreadRng` never lives
// across an `.await`.

fn new_game(size: usize) -> Result<GameState, EngineError> {
    GameState::new(size, &mut rand::thread_rng(), &SystemClock)
}

fn new_game_id() -> String {
    generate_game_id(&mut rand::thread_rng())
}

fn play(game: &mut GameState, direction: &str) -> Result<MoveOutcome, EngineError> {
    game.apply_move_str(direction, &mut rand::thread_rng(), &SystemClock)
}

async fn unused_game_id(store: &GameStore) -> String {
    let mut id = new_game_id();
    // Bounded retry on collision.
    for _ in 0..8 {
        if !store.exists(&id).await {
            break;
        }
        id = new_game_id();
    }
    id
}

async fn load_existing(
    store: &GameStore,
    game_id: &str,
    failure: &'static str,
) -> Result<GameState, ApiError> {
    if !is_valid_game_id(game_id) {
        return Err(ApiError::NotFound);
    }
    store
        .load(game_id)
        .await
        .or_internal(failure)?
        .ok_or(ApiError::NotFound)
}

pub async fn create_game(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<GameResponse>, ApiError> {
    let request: CreateGameRequest = parse_body(&body)?;
    let size = request.size.unwrap_or(DEFAULT_SIZE as i64);
    // Negative sizes map to 0, which the engine rejects like any other bad size.
    let game = new_game(usize::try_from(size).unwrap_or(0))?;

    let game_id = unused_game_id(&app.store).await;
    app.store
        .save(&game_id, &game)
        .await
        .or_internal("Failed to create game")?;

    info!(game_id = %game_id, size = game.size(), "created game");
    Ok(Json(GameResponse::new(game_id, &game)))
}

pub async fn get_game(
    State(app): State<AppState>,
    AxumPath(game_id): AxumPath<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = load_existing(&app.store, &game_id, "Failed to get game state").await?;
    Ok(Json(GameResponse::new(game_id, &game)))
}

pub async fn make_move(
    State(app): State<AppState>,
    AxumPath(game_id): AxumPath<String>,
    body: Bytes,
) -> Result<Json<GameResponse>, ApiError> {
    const FAILED: &str = "Failed to make move";

    if !is_valid_game_id(&game_id) {
        return Err(ApiError::NotFound);
    }
    let _guard = app.store.lock(&game_id).await;
    let mut game = load_existing(&app.store, &game_id, FAILED).await?;

    let request: MoveRequest = parse_body(&body)?;
    let direction = request.direction.as_deref().unwrap_or_default();

    let outcome = play(&mut game, direction)?;
    if outcome.moved {
        app.store.save(&game_id, &game).await.or_internal(FAILED)?;
    }

    debug!(
        game_id = %game_id,
        direction,
        moved = outcome.moved,
        gained = outcome.gained,
        score = game.score(),
        "move"
    );
    Ok(Json(GameResponse::new(game_id, &game).with_moved(outcome.moved)))
}

pub async fn delete_game(
    State(app): State<AppState>,
    AxumPath(game_id): AxumPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_game_id(&game_id) {
        return Err(ApiError::NotFound);
    }

    let _guard = app.store.lock(&game_id).await;
    let deleted = app
        .store
        .delete(&game_id)
        .await
        .or_internal("Failed to delete game")?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(game_id = %game_id, "deleted game");
    Ok(Json(MessageResponse {
        message: "Game deleted successfully".to_string(),
    }))
}

fn png_response(bytes: Vec<u8>, cache_control: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, cache_control),
        ],
        bytes,
    )
        .into_response()
}

pub async fn game_image(
    State(app): State<AppState>,
    AxumPath(game_id): AxumPath<String>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    const FAILED: &str = "Failed to generate board image";

    let game = load_existing(&app.store, &game_id, FAILED).await?;
    let theme = query
        .theme
        .as_deref()
        .and_then(Theme::from_str)
        .unwrap_or_default();

    let snapshot = game.snapshot();
    let png = tokio::task::spawn_blocking(move || {
        grid2048_raster::render_board_png(&snapshot, &game_id, theme)
    })
    .await
    .map_err(anyhow::Error::from)
    .and_then(|r| r)
    .or_internal(FAILED)?;

    Ok(png_response(png, "no-cache"))
}

pub async fn tile_image(
    AxumPath(value): AxumPath<String>,
    Query(query): Query<TileQuery>,
) -> Result<Response, ApiError> {
    let value = value
        .parse::<u64>()
        .ok()
        .filter(|&v| grid2048_raster::is_styled_tile(v))
        .ok_or_else(|| ApiError::bad_request("Invalid tile value"))?;

    let theme = match query.theme.as_deref() {
        None => Theme::Light,
        Some(s) => Theme::from_str(s).ok_or_else(|| ApiError::bad_request("Invalid theme"))?,
    };

    let size = match query.size.as_deref() {
        None | Some("") => grid2048_raster::DEFAULT_TILE_PX,
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|px| grid2048_raster::TILE_PX_RANGE.contains(px))
            .ok_or_else(|| ApiError::bad_request("Invalid size (32-512 allowed)"))?,
    };

    let png = tokio::task::spawn_blocking(move || grid2048_raster::render_tile_png(value, theme, size))
        .await
        .map_err(anyhow::Error::from)
        .and_then(|r| r)
        .or_internal("Failed to generate tile")?;

    Ok(png_response(png, "public, max-age=86400"))
}

/// Sweep old games now and then every `interval`.
pub fn spawn_cleanup_task(store: Arc<GameStore>, interval: Duration, max_age: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            // First tick completes immediately.
            ticker.tick().await;
            match store.cleanup_older_than(max_age).await {
                Ok(0) => debug!("cleanup: nothing to remove"),
                Ok(n) => info!(removed = n, "cleanup: removed old games"),
                Err(err) => warn!("scheduled cleanup error: {err:#}"),
            }
        }
    })
}

/// Run the API until `shutdown` resolves.
///
/// When `ready` is given it receives the bound address once the listener is
/// up, which is how callers using port 0 learn the real port.
pub async fn run_server(
    config: ServerConfig,
    ready: Option<oneshot::Sender<SocketAddr>>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let store = GameStore::new(&config.games_dir);
    store.ensure_dir().await?;
    let state = AppState::new(store);

    let sweeper = spawn_cleanup_task(
        state.store.clone(),
        config.cleanup_interval,
        config.max_game_age,
    );

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, games_dir = %config.games_dir.display(), "2048 game API listening");
    if let Some(tx) = ready {
        let _ = tx.send(local_addr);
    }

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error");

    sweeper.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_client_messages() {
        let err = ApiError::from(EngineError::InvalidSize(9));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid board size (3-8 allowed)");

        let err = ApiError::from(EngineError::InvalidDirection("x".into()));
        assert_eq!(err.to_string(), "Invalid direction");

        let err = ApiError::from(EngineError::InvalidBoard("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn empty_body_parses_as_default() {
        let req: CreateGameRequest = parse_body(&Bytes::from_static(b"")).unwrap();
        assert!(req.size.is_none());

        let req: CreateGameRequest = parse_body(&Bytes::from_static(b"{\"size\":6}")).unwrap();
        assert_eq!(req.size, Some(6));

        assert!(parse_body::<MoveRequest>(&Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert_eq!(config.max_game_age, Duration::from_secs(86_400));
    }
}
