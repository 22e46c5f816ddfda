//! Engine error taxonomy.

/// Failures the engine reports synchronously to its caller.
///
/// None of these leave a partially mutated state behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid board size {0} (3-8 allowed)")]
    InvalidSize(usize),
    #[error("invalid direction {0:?}")]
    InvalidDirection(String),
    #[error("invalid board: {0}")]
    InvalidBoard(String),
}
