//! Game state module - board, score and move transitions
//!
//! `GameState` is the durable part of a game: the board, the running score and
//! the time of the last board-changing move. Whether the game is over is never
//! stored; it is derived from the board whenever it is asked for.
//!
//! All transitions are synchronous and deterministic given the random draws.
//! Callers own persistence and any locking around a state value.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::board::Board;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::rng::{spawn_tile, Spawn};
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, INITIAL_TILES};

/// Result of one move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// The board changed (and a tile was spawned if there was room).
    pub moved: bool,
    /// Points earned from merges in this move. Zero when `moved` is false.
    pub gained: u64,
    /// The tile spawned after the move, if any.
    pub spawned: Option<Spawn>,
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    score: u64,
    last_updated: DateTime<Utc>,
}

impl GameState {
    /// Create a new game: an empty board seeded with two random tiles.
    pub fn new<R, C>(size: usize, rng: &mut R, clock: &C) -> Result<Self, EngineError>
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        let mut board = Board::new(size)?;
        for _ in 0..INITIAL_TILES {
            spawn_tile(&mut board, rng);
        }
        Ok(Self {
            board,
            score: 0,
            last_updated: clock.now(),
        })
    }

    /// Reassemble a state from its parts without touching randomness or time.
    pub fn from_parts(board: Board, score: u64, last_updated: DateTime<Utc>) -> Self {
        Self {
            board,
            score,
            last_updated,
        }
    }

    /// Rebuild a state from persisted rows, validating the grid.
    pub fn from_rows(
        rows: &[Vec<u64>],
        score: u64,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        let board = Board::from_rows(rows)?;
        Ok(Self::from_parts(board, score, last_updated))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Derived on every call, never cached.
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(self)
    }

    /// Slide the board toward `direction`.
    ///
    /// When the board changes the score grows by the merged total, one tile
    /// spawns into an empty cell and `last_updated` advances. Otherwise the
    /// state is left exactly as it was.
    pub fn apply_move<R, C>(&mut self, direction: Direction, rng: &mut R, clock: &C) -> MoveOutcome
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        let mut next = self.board.clone();
        let (moved, gained) = next.slide(direction);
        if !moved {
            return MoveOutcome::default();
        }

        let spawned = spawn_tile(&mut next, rng);
        self.board = next;
        self.score = self.score.saturating_add(gained);
        self.last_updated = clock.now();

        MoveOutcome {
            moved,
            gained,
            spawned,
        }
    }

    /// Parse a wire direction and apply it. Unknown directions are rejected
    /// before anything changes.
    pub fn apply_move_str<R, C>(
        &mut self,
        direction: &str,
        rng: &mut R,
        clock: &C,
    ) -> Result<MoveOutcome, EngineError>
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        let direction = parse_direction(direction)?;
        Ok(self.apply_move(direction, rng, clock))
    }

    /// Whether sliding toward `direction` would change the board.
    pub fn can_move(&self, direction: Direction) -> bool {
        let mut scratch = self.board.clone();
        scratch.slide(direction).0
    }
}

/// Parse a wire direction string.
pub fn parse_direction(s: &str) -> Result<Direction, EngineError> {
    Direction::from_str(s).ok_or_else(|| EngineError::InvalidDirection(s.to_string()))
}

/// Create a game of the given size.
pub fn create<R, C>(size: usize, rng: &mut R, clock: &C) -> Result<GameState, EngineError>
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    GameState::new(size, rng, clock)
}

/// Value-style move: returns the next state and whether the board changed.
/// A no-op move returns a copy equal to `state`.
pub fn apply<R, C>(state: &GameState, direction: Direction, rng: &mut R, clock: &C) -> (GameState, bool)
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    let mut next = state.clone();
    let outcome = next.apply_move(direction, rng, clock);
    (next, outcome.moved)
}

/// Game-over test on a bare board.
pub fn is_game_over(board: &Board) -> bool {
    board.is_game_over()
}
