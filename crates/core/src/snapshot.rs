use chrono::{DateTime, Utc};

use crate::game_state::GameState;

/// Read-only view of a game, with `game_over` derived at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Vec<Vec<u64>>,
    pub score: u64,
    pub size: usize,
    pub game_over: bool,
    pub last_updated: DateTime<Utc>,
}

impl From<&GameState> for GameSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            board: state.board().to_rows(),
            score: state.score(),
            size: state.size(),
            game_over: state.is_game_over(),
            last_updated: state.last_updated(),
        }
    }
}
