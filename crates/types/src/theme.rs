//! Colour themes shared by the PNG renderer and the terminal view.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Linear blend of `over` onto `self` with `alpha` in 0..=255.
    pub fn blend(self, over: Rgb, alpha: u8) -> Rgb {
        let a = alpha as u16;
        let mix = |base: u8, top: u8| -> u8 {
            ((top as u16 * a + base as u16 * (255 - a) + 127) / 255) as u8
        };
        Rgb::new(mix(self.r, over.r), mix(self.g, over.g), mix(self.b, over.b))
    }
}

/// Background and text colour of one tile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    pub bg: Rgb,
    pub text: Rgb,
}

/// Number of styled tile values (2 through 2048).
pub const STYLED_TILES: usize = 11;

/// Full colour set for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: Rgb,
    pub board: Rgb,
    pub text: Rgb,
    pub empty_cell: Rgb,
    /// Styles for 2, 4, 8, ..., 2048 in that order.
    pub tiles: [TileStyle; STYLED_TILES],
}

impl ThemePalette {
    /// Style for a cell value. Empty cells use `empty_cell`; values past 2048
    /// reuse the 2048 style.
    pub fn tile_style(&self, value: u64) -> TileStyle {
        if value < 2 {
            return TileStyle {
                bg: self.empty_cell,
                text: self.text,
            };
        }
        let exp = value.ilog2() as usize;
        let idx = exp.clamp(1, STYLED_TILES) - 1;
        self.tiles[idx]
    }
}

const fn tile(bg: u32, text: u32) -> TileStyle {
    TileStyle {
        bg: Rgb::from_hex(bg),
        text: Rgb::from_hex(text),
    }
}

static LIGHT: ThemePalette = ThemePalette {
    background: Rgb::from_hex(0xfaf8ef),
    board: Rgb::from_hex(0xbbada0),
    text: Rgb::from_hex(0x776e65),
    empty_cell: Rgb::from_hex(0xcdc1b4),
    tiles: [
        tile(0xeee4da, 0x776e65),
        tile(0xede0c8, 0x776e65),
        tile(0xf2b179, 0xffffff),
        tile(0xf59563, 0xffffff),
        tile(0xf67c5f, 0xffffff),
        tile(0xf65e3b, 0xffffff),
        tile(0xedcf72, 0xffffff),
        tile(0xedcc61, 0xffffff),
        tile(0xedc850, 0xffffff),
        tile(0xedc53f, 0xffffff),
        tile(0xedc22e, 0xffffff),
    ],
};

static DARK: ThemePalette = ThemePalette {
    background: Rgb::from_hex(0x1a1a1a),
    board: Rgb::from_hex(0x2d2d2d),
    text: Rgb::from_hex(0xffffff),
    empty_cell: Rgb::from_hex(0x3d3d3d),
    tiles: [
        tile(0x3d3d3d, 0xffffff),
        tile(0x4d4d4d, 0xffffff),
        tile(0xf2b179, 0xffffff),
        tile(0xf59563, 0xffffff),
        tile(0xf67c5f, 0xffffff),
        tile(0xf65e3b, 0xffffff),
        tile(0xedcf72, 0xffffff),
        tile(0xedcc61, 0xffffff),
        tile(0xedc850, 0xffffff),
        tile(0xedc53f, 0xffffff),
        tile(0xedc22e, 0xffffff),
    ],
};

/// Named colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse `"light"` / `"dark"`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(&self) -> &'static ThemePalette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        assert_eq!(Rgb::from_hex(0x123456), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn blend_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.blend(b, 0), a);
        assert_eq!(a.blend(b, 255), b);
    }

    #[test]
    fn tile_style_lookup() {
        let p = Theme::Light.palette();
        assert_eq!(p.tile_style(0).bg, p.empty_cell);
        assert_eq!(p.tile_style(2), p.tiles[0]);
        assert_eq!(p.tile_style(2048), p.tiles[10]);
        // Past 2048 falls back to the 2048 style.
        assert_eq!(p.tile_style(8192), p.tiles[10]);
    }

    #[test]
    fn theme_parse_and_toggle() {
        assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("blue"), None);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}
