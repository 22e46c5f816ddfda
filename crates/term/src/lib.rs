//! Terminal client for grid2048.
//!
//! Renders into a small character framebuffer that is diffed and flushed to
//! the terminal through crossterm. No widget toolkit: tiles are coloured
//! blocks sized so a board looks roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod session;

pub use grid2048_core as core;
pub use grid2048_input as input;
pub use grid2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Hud, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use session::Session;
