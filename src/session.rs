use serde::Serialize;
use tracing::{error, warn};

use crate::board::Board;
use crate::cell::Difficulty;
use crate::config::EngineConfig;
use crate::error::{EngineError, GuessRejection, SpecError};
use crate::position::Position;
use crate::spec::BoardSpec;

/// A clue the player can currently work on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClueView {
    /// Where the clue sits.
    pub position: Position,
    /// The clue text.
    pub clue: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// How the cell connects to others.
    pub relationship_description: String,
}

/// Snapshot of a game for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Status {
    /// Category label.
    pub category: String,
    /// Side length N.
    pub grid_size: usize,
    /// Cells solved.
    pub solved: usize,
    /// Cells on the board.
    pub total: usize,
    /// Percentage solved.
    pub progress: f64,
    /// Available clues, easiest first.
    pub clues: Vec<ClueView>,
}

/// What happened to a guess.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GuessOutcome {
    /// Whether the guess solved the cell.
    pub success: bool,
    /// The answer, when the guess was accepted.
    pub answer: Option<String>,
    /// Clues available after the guess.
    pub revealed_count: usize,
    /// Positions revealed by this solve.
    pub newly_revealed: Vec<Position>,
    /// Position force-revealed because the solve left the board stuck.
    pub emergency_reveal: Option<Position>,
    /// Whether the board is now complete.
    pub complete: bool,
    /// Why the guess was turned away, when it was.
    #[serde(skip)]
    pub rejection: Option<GuessRejection>,
}

/// Verdict on whether the game in progress can still be finished.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Completability {
    /// Whether every remaining cell can still be reached.
    pub completable: bool,
    /// Short explanation.
    pub reason: String,
    /// Set only while stuck: whether emergency revelation has anything left to reveal.
    pub can_emergency_reveal: Option<bool>,
    /// Reachable share of the board, as a percentage.
    pub reachable_percentage: f64,
    /// Cells that cannot be reached.
    pub unreachable_count: usize,
    /// Clues currently available.
    pub available_clues: usize,
}

/// One game in progress: a [`Board`] plus the stuck-state handling around each guess.
///
/// Guesses must be serialized by the caller; a session serves one player at a time.
#[derive(Clone)]
pub struct GameSession {
    board: Board,
}

impl GameSession {
    /// Wrap an already built board.
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    /// Build a board from `spec` and start a game on it.
    pub fn from_spec(spec: &BoardSpec, config: &EngineConfig) -> Result<Self, SpecError> {
        Board::from_spec(spec, config).map(Self::new)
    }

    /// The board being played.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Category, progress and the clues currently available.
    pub fn status(&self) -> Status {
        Status {
            category: self.board.category().to_owned(),
            grid_size: self.board.size().get(),
            solved: self.board.solved_count(),
            total: self.board.total_cells(),
            progress: self.board.progress(),
            clues: self
                .board
                .available_clues()
                .into_iter()
                .map(|cell| ClueView {
                    position: cell.position(),
                    clue: cell.clue().to_owned(),
                    difficulty: cell.difficulty(),
                    relationship_description: cell.relationship_description().to_owned(),
                })
                .collect(),
        }
    }

    /// Submit `text` as the answer at `pos`.
    ///
    /// A wrong or illegal guess is an ordinary unsuccessful outcome. An accepted guess that
    /// leaves the board stuck triggers emergency revelation; if that has nothing to reveal the
    /// board is defective and [`EngineError::DesignDefect`] is returned.
    pub fn submit_guess(&mut self, text: &str, pos: Position) -> Result<GuessOutcome, EngineError> {
        let newly_revealed = match self.board.check_answer(text, pos) {
            Ok(revealed) => revealed,
            Err(rejection) => {
                return Ok(GuessOutcome {
                    success: false,
                    answer: None,
                    revealed_count: self.board.available_clues().len(),
                    newly_revealed: Vec::new(),
                    emergency_reveal: None,
                    complete: self.board.is_complete(),
                    rejection: Some(rejection),
                });
            }
        };

        let emergency_reveal = if self.board.is_stuck() {
            warn!(solved = self.board.solved_count(), "board is stuck after a solve");
            match self.board.emergency_reveal_clue() {
                Ok(pos) => Some(pos),
                Err(EngineError::NoHiddenCells) => {
                    let defect = EngineError::DesignDefect {
                        solved: self.board.solved_count(),
                        total: self.board.total_cells(),
                    };
                    error!(%defect, "cannot recover from stuck state");
                    return Err(defect);
                }
                Err(other) => return Err(other),
            }
        } else {
            None
        };

        Ok(GuessOutcome {
            success: true,
            answer: self.board.cell(pos).map(|cell| cell.answer().to_owned()),
            revealed_count: self.board.available_clues().len(),
            newly_revealed,
            emergency_reveal,
            complete: self.board.is_complete(),
            rejection: None,
        })
    }

    /// Whether the game can still be finished from here.
    pub fn completability(&self) -> Completability {
        let available_clues = self.board.available_clues().len();

        if self.board.is_complete() {
            return Completability {
                completable: true,
                reason: "Already complete".into(),
                can_emergency_reveal: None,
                reachable_percentage: 100.0,
                unreachable_count: 0,
                available_clues,
            };
        }

        let report = self.board.reachability();
        if self.board.is_stuck() {
            return Completability {
                completable: false,
                reason: "Currently stuck - no available clues".into(),
                can_emergency_reveal: Some(self.board.can_emergency_reveal()),
                reachable_percentage: report.percentage,
                unreachable_count: report.unreachable.len(),
                available_clues,
            };
        }

        Completability {
            completable: report.all_reachable(),
            reason: if report.all_reachable() {
                "All cells reachable".into()
            } else {
                format!("{} cells unreachable", report.unreachable.len())
            },
            can_emergency_reveal: None,
            reachable_percentage: report.percentage,
            unreachable_count: report.unreachable.len(),
            available_clues,
        }
    }
}
