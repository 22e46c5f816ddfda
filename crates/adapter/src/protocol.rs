//! Protocol module - JSON message types for the HTTP API
//!
//! Game state on the wire:
//! `{ "board": [[..]], "score": n, "size": n, "gameOver": bool, "lastUpdated": "ISO-8601" }`.
//! The same record is what the game store writes to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, GameSnapshot, GameState};

/// `lastUpdated` is always written as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Serialized game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub board: Vec<Vec<u64>>,
    pub score: u64,
    pub size: usize,
    /// Written for clients; ignored when reading back, the engine recomputes it.
    #[serde(default)]
    pub game_over: bool,
    #[serde(with = "iso8601")]
    pub last_updated: DateTime<Utc>,
}

impl From<&GameState> for GameRecord {
    fn from(state: &GameState) -> Self {
        GameSnapshot::from(state).into()
    }
}

impl From<GameSnapshot> for GameRecord {
    fn from(snap: GameSnapshot) -> Self {
        Self {
            board: snap.board,
            score: snap.score,
            size: snap.size,
            game_over: snap.game_over,
            last_updated: snap.last_updated,
        }
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = EngineError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if record.size != record.board.len() {
            return Err(EngineError::InvalidBoard(format!(
                "size {} does not match {} rows",
                record.size,
                record.board.len()
            )));
        }
        GameState::from_rows(&record.board, record.score, record.last_updated)
    }
}

// ============== Client -> Server Messages ==============

/// Body of `POST /api/games`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub size: Option<i64>,
}

/// Body of `POST /api/games/:gameId/move`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(default)]
    pub direction: Option<String>,
}

/// Query string of `GET /api/games/:gameId/image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub theme: Option<String>,
}

/// Query string of `GET /api/tiles/:value`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileQuery {
    pub theme: Option<String>,
    pub size: Option<String>,
}

// ============== Server -> Client Messages ==============

/// Game state plus its identifier; `moved` only on move responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved: Option<bool>,
    #[serde(flatten)]
    pub state: GameRecord,
}

impl GameResponse {
    pub fn new(game_id: impl Into<String>, state: &GameState) -> Self {
        Self {
            game_id: game_id.into(),
            moved: None,
            state: GameRecord::from(state),
        }
    }

    pub fn with_moved(mut self, moved: bool) -> Self {
        self.moved = Some(moved);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
