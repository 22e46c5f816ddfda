//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine, HTTP API, PNG rendering, terminal client).
//!
//! # Board Dimensions
//!
//! Boards are square. The side length is fixed for the lifetime of a game:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_SIZE` | 3 | Smallest supported board (3x3) |
//! | `MAX_SIZE` | 8 | Largest supported board (8x8) |
//! | `DEFAULT_SIZE` | 4 | Classic 4x4 board |
//!
//! # Tile Values
//!
//! Tiles are 0 (empty) or powers of two from 2 up to `MAX_TILE` (2^53).
//! A `MAX_TILE` tile never merges, so tile values and scores stay exact in
//! JSON numbers.
//!
//! # Tile Spawning
//!
//! - `INITIAL_TILES`: 2 tiles are placed on a fresh board
//! - `SPAWN_TWO_PROBABILITY`: 0.9 chance a spawned tile is a 2, otherwise a 4
//!
//! # Examples
//!
//! ```
//! use grid2048_types::{Direction, MAX_SIZE, MIN_SIZE};
//!
//! // Parse a wire direction (exact lowercase match)
//! let dir = Direction::from_str("left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.as_str(), "left");
//! assert!(Direction::from_str("Left").is_none());
//!
//! // Board size bounds
//! assert!((MIN_SIZE..=MAX_SIZE).contains(&4));
//! ```

pub mod theme;

pub use theme::{Rgb, Theme, ThemePalette, TileStyle};

/// Smallest supported board side length.
pub const MIN_SIZE: usize = 3;

/// Largest supported board side length.
pub const MAX_SIZE: usize = 8;

/// Board side length used when a client does not ask for one.
pub const DEFAULT_SIZE: usize = 4;

/// Largest tile value. Two tiles of this value do not merge.
pub const MAX_TILE: u64 = 1 << 53;

/// Number of tiles placed on a freshly created board.
pub const INITIAL_TILES: usize = 2;

/// Probability that a spawned tile is a 2 (otherwise it is a 4).
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Check a requested board side length against the supported range.
pub fn is_valid_size(size: usize) -> bool {
    (MIN_SIZE..=MAX_SIZE).contains(&size)
}

/// Move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions in wire order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a direction from its wire string.
    ///
    /// Only the exact strings `"up"`, `"down"`, `"left"` and `"right"` are accepted.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Whether the move walks rows (left/right) rather than columns.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Whether lines are reversed before sliding so the merge target is index 0.
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_wire_strings_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
    }

    #[test]
    fn direction_parse_is_exact() {
        assert_eq!(Direction::from_str("UP"), None);
        assert_eq!(Direction::from_str(" left"), None);
        assert_eq!(Direction::from_str("north"), None);
        assert_eq!(Direction::from_str(""), None);
    }

    #[test]
    fn direction_axis_and_reversal() {
        assert!(Direction::Left.is_horizontal());
        assert!(Direction::Right.is_horizontal());
        assert!(!Direction::Up.is_horizontal());
        assert!(!Direction::Down.is_horizontal());

        assert!(!Direction::Left.is_reversed());
        assert!(!Direction::Up.is_reversed());
        assert!(Direction::Right.is_reversed());
        assert!(Direction::Down.is_reversed());
    }

    #[test]
    fn size_bounds() {
        assert!(!is_valid_size(2));
        assert!(is_valid_size(MIN_SIZE));
        assert!(is_valid_size(DEFAULT_SIZE));
        assert!(is_valid_size(MAX_SIZE));
        assert!(!is_valid_size(9));
    }
}
