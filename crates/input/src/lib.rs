//! Terminal input.
//!
//! Maps `crossterm` key events to [`ClientAction`]s for the terminal client.
//! Kept free of any rendering so the mapping can be tested on its own.

pub mod map;

pub use grid2048_types as types;

pub use map::{handle_key_event, should_quit, ClientAction};
