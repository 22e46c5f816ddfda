//! Single tile image.

use std::ops::RangeInclusive;

use crate::canvas::Canvas;
use crate::font::{fit_scale, GLYPH_H};
use crate::types::Theme;

pub const DEFAULT_TILE_PX: u32 = 100;
pub const TILE_PX_RANGE: RangeInclusive<u32> = 32..=512;

/// Tile values with their own style: 2, 4, ..., 2048.
pub fn is_styled_tile(value: u64) -> bool {
    (2..=2048).contains(&value) && value.is_power_of_two()
}

/// Draw one rounded tile of side `size` on a transparent background.
pub fn render_tile(value: u64, theme: Theme, size: u32) -> Canvas {
    let style = theme.palette().tile_style(value);
    let mut canvas = Canvas::transparent(size, size);
    canvas.fill_round_rect(0, 0, size, size, size / 10, style.bg);

    let label = value.to_string();
    // Target glyph height as a share of the tile: shorter labels get bigger text.
    let share = match label.len() {
        0..=2 => 0.5,
        3 => 0.4,
        _ => 0.3,
    };
    let preferred = ((size as f32 * share) / GLYPH_H as f32).floor() as u32;
    let scale = fit_scale(&label, preferred.max(1), size - size / 5);
    canvas.draw_text_centered(size / 2, size / 2, &label, scale, style.text);

    canvas
}
