//! RNG module - random tile spawning
//!
//! After every board-changing move one tile is dropped into a uniformly chosen
//! empty cell: a 2 with probability 0.9, otherwise a 4.
//!
//! Any `rand::Rng` drives the draws. `seeded` gives a reproducible generator
//! for replays and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::types::SPAWN_TWO_PROBABILITY;

/// A tile placed by `spawn_tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u64,
}

/// Create a deterministic generator from a seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw the value of a new tile.
pub fn pick_tile_value<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    if rng.gen::<f64>() < SPAWN_TWO_PROBABILITY {
        2
    } else {
        4
    }
}

/// Place one random tile into an empty cell.
///
/// Returns `None` and leaves the board alone when there is no empty cell.
pub fn spawn_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Spawn> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = pick_tile_value(rng);
    board.set(row, col, value);
    Some(Spawn { row, col, value })
}
