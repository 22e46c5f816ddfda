//! grid2048 (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration
//! tests and benches can write `grid2048::{core,adapter,raster,term,input,types}`.

pub use grid2048_adapter as adapter;
pub use grid2048_core as core;
pub use grid2048_input as input;
pub use grid2048_raster as raster;
pub use grid2048_term as term;
pub use grid2048_types as types;
