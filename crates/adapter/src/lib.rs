//! Adapter module - HTTP API, game store and wire protocol
//!
//! This module exposes the 2048 engine over HTTP. Each request loads a game
//! from the store, runs one engine operation, saves the result and answers
//! with JSON (or a PNG for image routes).
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/games` | Create a game, body `{"size": 3..8}` (default 4) |
//! | GET | `/api/games/:gameId` | Current state |
//! | POST | `/api/games/:gameId/move` | Body `{"direction": "up"\|"down"\|"left"\|"right"}` |
//! | DELETE | `/api/games/:gameId` | Remove a game |
//! | GET | `/api/games/:gameId/image?theme=light\|dark` | Board as PNG |
//! | GET | `/api/tiles/:value?theme=&size=` | One tile as PNG |
//!
//! # Game State Format
//!
//! ```text
//! {"gameId":"k3j9x0a2b","board":[[2,0,0,0],[0,0,0,0],[0,0,4,0],[0,0,0,0]],
//!  "score":0,"size":4,"gameOver":false,"lastUpdated":"2024-03-01T12:34:56.789Z"}
//! ```
//!
//! Move responses add `"moved": bool`. Failures answer `{"error": "..."}` with
//! status 400, 404 or 500.
//!
//! # Environment Variables
//!
//! - `GRID2048_HOST`: Bind address (default: "0.0.0.0")
//! - `PORT`: Port number (default: 3000)
//! - `GRID2048_GAMES_DIR`: Directory for game files (default: "games")
//! - `GRID2048_MAX_AGE_SECS`: Delete games untouched for this long (default: 86400)
//! - `GRID2048_CLEANUP_INTERVAL_SECS`: Sweep period (default: 3600)
//!
//! # Implementation
//!
//! - Uses **axum** on **tokio**
//! - Load/move/save of one game is serialized by a per-game lock in [`store`]
//! - See [`protocol`] for message structure definitions
//! - See [`server`] for routing and configuration

pub mod id;
pub mod protocol;
pub mod server;
pub mod store;

pub use grid2048_core as core;
pub use grid2048_types as types;

// Re-export protocol types for convenience
pub use id::{generate_game_id, is_valid_game_id, GAME_ID_LEN};
pub use protocol::*;
pub use server::*;
pub use store::GameStore;
