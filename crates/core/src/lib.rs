//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the 2048 board engine: the board, the slide/merge
//! algorithm, random tile spawning and game-over detection.
//! It has **zero dependencies** on HTTP, storage, or rendering, making it:
//!
//! - **Deterministic**: Same RNG seed and clock produce identical games
//! - **Testable**: Randomness and time are injected
//! - **Portable**: Used by the HTTP server, the PNG renderer and the terminal client
//!
//! # Module Structure
//!
//! - [`board`]: NxN grid, the line slide/merge transform and game-over detection
//! - [`game_state`]: Board + score + last update time, move transitions
//! - [`rng`]: Random tile spawning (2 with probability 0.9, otherwise 4)
//! - [`clock`]: Injectable time source for `last_updated`
//! - [`snapshot`]: Read-only view with the derived `game_over` flag
//! - [`error`]: Engine error taxonomy
//!
//! # Game Rules
//!
//! - **Board**: N x N with N in 3..=8, cells are 0 (empty) or powers of two
//! - **Start**: Two random tiles on an empty board, score 0
//! - **Move**: Every row (left/right) or column (up/down) is compacted toward the
//!   wall, then equal neighbours merge once in a single pass from the wall outward
//! - **Score**: Grows by the value of every tile formed by a merge
//! - **Spawn**: Only after a move that changed the board
//! - **Game over**: No empty cell and no equal horizontal/vertical neighbours
//!
//! # Example
//!
//! ```
//! use grid2048_core::{rng, GameState, SystemClock};
//! use grid2048_types::Direction;
//!
//! let mut rng = rng::seeded(12345);
//! let mut game = GameState::new(4, &mut rng, &SystemClock).unwrap();
//! assert_eq!(game.board().count_tiles(), 2);
//!
//! let outcome = game.apply_move(Direction::Left, &mut rng, &SystemClock);
//! assert_eq!(game.score(), outcome.gained);
//! assert!(!game.is_game_over());
//! ```

pub mod board;
pub mod clock;
pub mod error;
pub mod game_state;
pub mod rng;
pub mod snapshot;

pub use grid2048_types as types;

// Re-export commonly used types for convenience
pub use board::{slide_line, Board};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use game_state::{apply, create, is_game_over, parse_direction, GameState, MoveOutcome};
pub use rng::{spawn_tile, Spawn};
pub use snapshot::GameSnapshot;
