//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer};
use crate::types::{Theme, ThemePalette};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Extra lines drawn next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud<'a> {
    pub theme: Theme,
    pub status: Option<&'a str>,
}

/// A lightweight terminal renderer for a 2048 board.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    /// Board-coloured spacing between tiles, in columns.
    gap_x: u16,
    gap_y: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 fits six digits with padding and looks roughly square.
        Self {
            cell_w: 7,
            cell_h: 3,
            gap_x: 1,
            gap_y: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            ..Self::default()
        }
    }

    /// Board footprint in terminal cells for an NxN game.
    pub fn board_dims(&self, size: usize) -> (u16, u16) {
        let n = size as u16;
        (
            n * self.cell_w + (n + 1) * self.gap_x,
            n * self.cell_h + (n + 1) * self.gap_y,
        )
    }

    /// Top-left terminal cell of the tile at (`row`, `col`), relative to the board origin.
    pub fn tile_origin(&self, row: usize, col: usize) -> (u16, u16) {
        (
            self.gap_x + col as u16 * (self.cell_w + self.gap_x),
            self.gap_y + row as u16 * (self.cell_h + self.gap_y),
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, hud: Hud<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        let palette = hud.theme.palette();
        let base = CellStyle::new(palette.text, palette.background);

        fb.resize(viewport.width, viewport.height);
        fb.clear(base.into_cell(' '));

        let (board_w, board_h) = self.board_dims(snap.size);
        // Title row above, status row below.
        let total_h = board_h + 4;
        let start_x = viewport.width.saturating_sub(board_w) / 2;
        let start_y = viewport.height.saturating_sub(total_h) / 2 + 2;

        fb.put_str(start_x, start_y.saturating_sub(2), "2048", base.bold());
        let score = format!("SCORE {}", snap.score);
        let score_x = (start_x + board_w).saturating_sub(score.chars().count() as u16);
        fb.put_str(score_x, start_y.saturating_sub(2), &score, base);

        fb.fill_rect(
            start_x,
            start_y,
            board_w,
            board_h,
            ' ',
            CellStyle::new(palette.text, palette.board),
        );

        for (r, row) in snap.board.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                let (dx, dy) = self.tile_origin(r, c);
                self.draw_tile(fb, palette, start_x + dx, start_y + dy, value);
            }
        }

        if snap.game_over {
            self.draw_overlay_text(fb, palette, start_x, start_y, board_w, board_h, " GAME OVER! ");
        }

        let footer_y = start_y + board_h + 1;
        match hud.status {
            Some(status) => fb.put_str(start_x, footer_y, status, base),
            None => fb.put_str(
                start_x,
                footer_y,
                "arrows/hjkl move  n new  t theme  q quit",
                base.dim(),
            ),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: Hud<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, palette: &ThemePalette, x: u16, y: u16, value: u64) {
        let tile = palette.tile_style(value);
        let mut style = CellStyle::new(tile.text, tile.bg);
        if value >= 8 {
            style = style.bold();
        }
        fb.fill_rect(x, y, self.cell_w, self.cell_h, ' ', style);

        if value == 0 {
            return;
        }
        let label = value.to_string();
        let len = label.chars().count() as u16;
        let lx = x + self.cell_w.saturating_sub(len) / 2;
        let ly = y + self.cell_h / 2;
        // Labels wider than the tile are cut at its right edge.
        for (i, ch) in label.chars().take(self.cell_w as usize).enumerate() {
            fb.put_char(lx + i as u16, ly, ch, style);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        palette: &ThemePalette,
        start_x: u16,
        start_y: u16,
        board_w: u16,
        board_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(board_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(board_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(palette.background, palette.text).bold();
        fb.put_str(x, mid_y, text, style);
    }
}
