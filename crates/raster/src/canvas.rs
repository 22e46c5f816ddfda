//! Pixel canvas with the handful of drawing primitives the board needs.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::font::{glyph, text_height, text_width, GLYPH_GAP, GLYPH_H, GLYPH_W};
use crate::types::Rgb;

fn opaque(c: Rgb) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, 255])
}

/// RGBA pixel buffer. All drawing is clipped to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Opaque canvas filled with `bg`.
    pub fn new(width: u32, height: u32, bg: Rgb) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, opaque(bg)),
        }
    }

    /// Fully transparent canvas.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Colour at (x, y), or None when out of bounds or transparent.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        let px = self.img.get_pixel_checked(x, y)?;
        if px[3] == 0 {
            return None;
        }
        Some(Rgb::new(px[0], px[1], px[2]))
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(px) = self.img.get_pixel_mut_checked(x, y) {
            *px = opaque(color);
        }
    }

    /// Clip a rectangle to the canvas, returning `(x0, y0, x1, y1)` exclusive.
    fn clip(&self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let x1 = x.saturating_add(w).min(self.width());
        let y1 = y.saturating_add(h).min(self.height());
        (x.min(x1), y.min(y1), x1, y1)
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let (x0, y0, x1, y1) = self.clip(x, y, w, h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.img.put_pixel(px, py, opaque(color));
            }
        }
    }

    /// Filled rectangle with circular corners of `radius`.
    pub fn fill_round_rect(&mut self, x: u32, y: u32, w: u32, h: u32, radius: u32, color: Rgb) {
        let r = radius.min(w / 2).min(h / 2) as f32;
        let (x0, y0, x1, y1) = self.clip(x, y, w, h);
        let (left, top) = (x as f32, y as f32);
        let (right, bottom) = ((x + w) as f32, (y + h) as f32);

        for py in y0..y1 {
            for px in x0..x1 {
                // Sample at the pixel centre.
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let dx = (left + r - cx).max(cx - (right - r)).max(0.0);
                let dy = (top + r - cy).max(cy - (bottom - r)).max(0.0);
                if dx * dx + dy * dy <= r * r {
                    self.img.put_pixel(px, py, opaque(color));
                }
            }
        }
    }

    /// Blend `color` over a rectangle with `alpha` in 0..=255.
    pub fn blend_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb, alpha: u8) {
        let (x0, y0, x1, y1) = self.clip(x, y, w, h);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = self.img.get_pixel(px, py);
                let base = Rgb::new(p[0], p[1], p[2]);
                let mixed = base.blend(color, alpha);
                self.img.put_pixel(px, py, opaque(mixed));
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, scale: u32, color: Rgb) {
        let scale = scale.max(1);
        let mut cursor = x;
        for ch in text.chars() {
            let rows = glyph(ch);
            for (gy, bits) in rows.iter().enumerate() {
                for gx in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - gx)) != 0 {
                        self.fill_rect(
                            cursor + gx * scale,
                            y + gy as u32 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
            cursor += (GLYPH_W + GLYPH_GAP) * scale;
        }
    }

    /// Draw `text` centred on (cx, cy).
    pub fn draw_text_centered(&mut self, cx: u32, cy: u32, text: &str, scale: u32, color: Rgb) {
        let x = cx.saturating_sub(text_width(text, scale) / 2);
        let y = cy.saturating_sub(text_height(scale) / 2);
        self.draw_text(x, y, text, scale, color);
    }

    /// Draw `text` with its right edge at `right`, vertically centred on `cy`.
    pub fn draw_text_right(&mut self, right: u32, cy: u32, text: &str, scale: u32, color: Rgb) {
        let x = right.saturating_sub(text_width(text, scale));
        let y = cy.saturating_sub(GLYPH_H * scale / 2);
        self.draw_text(x, y, text, scale, color);
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.img
            .write_to(&mut out, ImageFormat::Png)
            .context("failed to encode PNG")?;
        Ok(out.into_inner())
    }
}
