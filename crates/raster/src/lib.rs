//! PNG rendering of boards and tiles.
//!
//! Everything is drawn into a [`Canvas`] with plain rectangles and a built-in
//! 5x7 bitmap font, then encoded as PNG. No font files or system libraries
//! are needed.
//!
//! Board layout (pixels): padding 20, cell 100, gap 10, header 80, footer 80.
//! For an NxN game the board area is `N*100 + (N+1)*10` square.

pub mod board;
pub mod canvas;
pub mod font;
pub mod tile;

pub use grid2048_core as core;
pub use grid2048_types as types;

pub use board::{canvas_dims, render_board};
pub use canvas::Canvas;
pub use tile::{is_styled_tile, render_tile, DEFAULT_TILE_PX, TILE_PX_RANGE};

use anyhow::Result;

use crate::core::GameSnapshot;
use crate::types::Theme;

/// Render a game as PNG bytes.
pub fn render_board_png(snap: &GameSnapshot, game_id: &str, theme: Theme) -> Result<Vec<u8>> {
    render_board(snap, game_id, theme).encode_png()
}

/// Render one tile as PNG bytes.
pub fn render_tile_png(value: u64, theme: Theme, size: u32) -> Result<Vec<u8>> {
    render_tile(value, theme, size).encode_png()
}
