use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// Reasons a relationship record is unusable. Such records are skipped, never fatal to a board.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RelationshipError {
    /// The relationship names no source positions.
    #[error("relationship has no source positions")]
    NoSources,
    /// The relationship names no target positions.
    #[error("relationship has no target positions")]
    NoTargets,
    /// Strength must lie in `[0.0, 1.0]`.
    #[error("relationship strength {0} is outside [0, 1]")]
    StrengthOutOfRange(f64),
    /// The `type` field is not one of the known relation kinds.
    #[error("unknown relation kind {0:?}")]
    UnknownKind(String),
    /// The record is not shaped like a relationship at all.
    #[error("malformed relationship record: {0}")]
    Malformed(String),
}

/// Reasons a board specification is rejected outright.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// A zero-sized grid.
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    /// The item count does not match the grid.
    #[error("expected {expected} items for the grid, found {found}")]
    WrongItemCount {
        /// N² for the declared grid size.
        expected: usize,
        /// Items actually supplied.
        found: usize,
    },
    /// Two items claim the same position.
    #[error("more than one item at {0}")]
    PositionCollision(Position),
    /// An item lies outside the grid.
    #[error("item at {0} lies outside the grid")]
    OutOfBounds(Position),
    /// Difficulty tiers start at 1.
    #[error("item at {0} has difficulty 0")]
    ZeroDifficulty(Position),
    /// The specification could not be decoded.
    #[error("could not parse board specification: {0}")]
    Parse(String),
}

/// Why a guess was turned away. None of these change the board.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GuessRejection {
    /// No cell exists at the position.
    #[error("no cell at {0}")]
    UnknownPosition(Position),
    /// The clue at the position has not been revealed yet.
    #[error("the clue at {0} has not been revealed yet")]
    NotRevealed(Position),
    /// The cell is already solved.
    #[error("the cell at {0} is already solved")]
    AlreadySolved(Position),
    /// The guess did not match the answer.
    #[error("incorrect guess for {0}")]
    Incorrect(Position),
}

/// Failures that end the current game. These indicate a defective board rather than a bad move.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Emergency revelation was requested with nothing left to reveal.
    #[error("no hidden cells remain to reveal")]
    NoHiddenCells,
    /// The board is incomplete, nothing is available and nothing is hidden.
    #[error("board is stuck with {solved} of {total} cells solved and no hidden cells left")]
    DesignDefect {
        /// Cells solved so far.
        solved: usize,
        /// Cells on the board.
        total: usize,
    },
}

/// Problems loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The TOML did not decode.
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of its allowed range.
    #[error("invalid engine config: {0}")]
    Invalid(String),
}
