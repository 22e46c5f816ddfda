//! Board image: header with score, the grid, footer with the game id.

use crate::canvas::Canvas;
use crate::core::GameSnapshot;
use crate::font::fit_scale;
use crate::types::Theme;

pub const PADDING: u32 = 20;
pub const CELL: u32 = 100;
pub const GAP: u32 = 10;
pub const HEADER: u32 = 80;
pub const FOOTER: u32 = 80;

const CELL_RADIUS: u32 = 6;
const HEADER_SCALE: u32 = 3;
const FOOTER_SCALE: u32 = 2;
const OVERLAY_ALPHA: u8 = 0xCC;

/// Side of the board area in pixels for an NxN game.
pub fn board_px(size: usize) -> u32 {
    let n = size as u32;
    n * CELL + (n + 1) * GAP
}

/// Canvas dimensions for an NxN game.
pub fn canvas_dims(size: usize) -> (u32, u32) {
    let board = board_px(size);
    (board + PADDING * 2, board + HEADER + FOOTER + PADDING * 2)
}

fn value_scale(value: u64) -> u32 {
    match value {
        v if v < 128 => 6,
        v if v < 1024 => 5,
        _ => 4,
    }
}

/// Draw a snapshot into a new canvas.
pub fn render_board(snap: &GameSnapshot, game_id: &str, theme: Theme) -> Canvas {
    let palette = theme.palette();
    let (width, height) = canvas_dims(snap.size);
    let board = board_px(snap.size);
    let mut canvas = Canvas::new(width, height, palette.background);

    // Header.
    let header_mid = PADDING + HEADER / 2;
    canvas.draw_text(
        PADDING,
        header_mid.saturating_sub(7 * HEADER_SCALE / 2),
        "2048",
        HEADER_SCALE,
        palette.text,
    );
    let score = score_label(snap.score);
    let score_scale = fit_scale(&score, HEADER_SCALE, board / 2);
    canvas.draw_text_right(width - PADDING, header_mid, &score, score_scale, palette.text);

    // Board.
    let top = PADDING + HEADER;
    canvas.fill_rect(PADDING, top, board, board, palette.board);

    for (row, cells) in snap.board.iter().enumerate() {
        for (col, &value) in cells.iter().enumerate() {
            let x = PADDING + GAP + col as u32 * (CELL + GAP);
            let y = top + GAP + row as u32 * (CELL + GAP);
            let style = palette.tile_style(value);
            canvas.fill_round_rect(x, y, CELL, CELL, CELL_RADIUS, style.bg);

            if value != 0 {
                let label = value.to_string();
                let scale = fit_scale(&label, value_scale(value), CELL - 12);
                canvas.draw_text_centered(x + CELL / 2, y + CELL / 2, &label, scale, style.text);
            }
        }
    }

    // Footer.
    let footer = footer_label(game_id, snap.size);
    let footer_scale = fit_scale(&footer, FOOTER_SCALE, width - PADDING * 2);
    canvas.draw_text_centered(width / 2, height - FOOTER / 2, &footer, footer_scale, palette.text);

    if snap.game_over {
        canvas.blend_rect(PADDING, top, board, board, palette.background, OVERLAY_ALPHA);
        let label = GAME_OVER_LABEL;
        let scale = fit_scale(label, 5, board - GAP * 2);
        canvas.draw_text_centered(width / 2, top + board / 2, label, scale, palette.text);
    }

    canvas
}

const GAME_OVER_LABEL: &str = "Game Over!";

fn score_label(score: u64) -> String {
    format!("Score: {score}")
}

fn footer_label(game_id: &str, size: usize) -> String {
    format!("{game_id} | {size}×{size}")
}
