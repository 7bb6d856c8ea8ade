#![warn(missing_docs)]

//! # `cluegrid`
//!
//! The revelation engine behind an interlinked clue-grid puzzle: a square board of N² cells, each hiding an answer behind a clue.
//! Clues come into view as other cells are solved, following a typed dependency graph between positions.
//! Begin by describing a board with a [`BoardSpec`] (usually deserialized from the content pipeline's JSON) and turn it into a [`Board`] with [`Board::from_spec`] or a [`BoardBuilder`].
//! Wrap the board in a [`GameSession`] to play it: [`GameSession::submit_guess`] solves cells and reveals what they unlock.
//!
//! Generated boards should go through [`certify`] first, which lints the clue text and checks that enough of the board is reachable from its starter clues.
//!
//! # Internals
//! Relationships between cells are one of six [`RelationKind`]s.
//! Three of them gate revelation:
//! 1. [`Requires`](RelationKind::Requires): a target stays hidden until every source is solved.
//! 2. [`Enables`](RelationKind::Enables): a target stays hidden until any source enabling it is solved.
//! 3. [`Complements`](RelationKind::Complements): each member stays hidden until some other member is solved.
//!
//! The others describe how clues relate and only feed the text shown to the player.
//!
//! A board starts by revealing every cell its graph does not gate. Solving a cell reveals the targets of every relationship sourced there whose gates are now open, without limit unless [`EngineConfig::reveal_cap`] says otherwise.
//! Boards without a graph fall back to fuzzy matching of each cell's legacy references against solved answers, revealing at most a couple of cells per solve.
//!
//! Nothing forces the graph to be acyclic, so a game can reach a state with no clue left to work on.
//! [`GameSession`] notices this after every solve and calls [`Board::emergency_reveal_clue`], which forces the most approachable hidden clue into view.
//! [`Board::reachability`] answers the same question ahead of time by simulating solves to a fixed point.

pub use board::Board;
pub use builder::BoardBuilder;
pub use cell::{Cell, CellState, Difficulty};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, GuessRejection, RelationshipError, SpecError};
pub use graph::{Complexity, RelationshipGraph};
pub use lint::{certify, BoardLinter, LintIssue, PlaceholderLinter, Rejection};
pub use position::{Dimension, Position};
pub use reachability::ReachabilityReport;
pub use relationship::{RelationKind, Relationship};
pub use session::{ClueView, Completability, GameSession, GuessOutcome, Status};
pub use similarity::{FuzzyRatio, Similarity};
pub use spec::{BoardSpec, ItemSpec, RelationshipRecord};

pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod graph;
pub mod lint;
pub(crate) mod position;
pub(crate) mod reachability;
pub(crate) mod relationship;
pub(crate) mod session;
pub(crate) mod similarity;
pub mod spec;
pub(crate) mod stuck;
