use std::num::NonZero;

use crate::position::Position;

/// Difficulty tier of a cell; 1 is easiest.
pub type Difficulty = NonZero<u32>;

/// Where a cell is in its lifecycle. Transitions only ever move forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CellState {
    /// Clue not yet shown to the player.
    #[default]
    Hidden,
    /// Clue shown, answer not yet found.
    Revealed,
    /// Answer found.
    Solved,
}

/// One square of the board: a hidden answer, the clue pointing at it, and its progress.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) answer: String,
    pub(crate) clue: String,
    pub(crate) references: Vec<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) position: Position,
    pub(crate) relationship_description: String,
    state: CellState,
}

impl Cell {
    pub(crate) fn new(
        answer: String,
        clue: String,
        references: Vec<String>,
        difficulty: Difficulty,
        position: Position,
        relationship_description: String,
    ) -> Self {
        Self {
            answer,
            clue,
            references,
            difficulty,
            position,
            relationship_description,
            state: CellState::Hidden,
        }
    }

    /// The answer the player must find.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// The clue shown once this cell is revealed.
    pub fn clue(&self) -> &str {
        &self.clue
    }

    /// Legacy plain-text references to other answers, used when the board has no relationship graph.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Difficulty tier, 1 being easiest.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Where this cell sits on the board.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Summary of this cell's graph connections, computed once when the board was built.
    pub fn relationship_description(&self) -> &str {
        &self.relationship_description
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Whether the clue is visible. Solved cells are always revealed.
    pub fn is_revealed(&self) -> bool {
        self.state != CellState::Hidden
    }

    /// Whether the answer has been found.
    pub fn is_solved(&self) -> bool {
        self.state == CellState::Solved
    }

    /// Whether this cell is a clue the player can currently work on.
    pub fn is_available(&self) -> bool {
        self.state == CellState::Revealed
    }

    /// Sort key used wherever "easiest first" is needed.
    pub(crate) fn ease_key(&self) -> (Difficulty, usize, Position) {
        (self.difficulty, self.references.len(), self.position)
    }

    /// Reveal a hidden cell. Returns whether anything changed.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.state == CellState::Hidden {
            self.state = CellState::Revealed;
            true
        } else {
            false
        }
    }

    /// Solve a revealed cell. Hidden and already solved cells are left alone.
    pub(crate) fn solve(&mut self) -> bool {
        if self.state == CellState::Revealed {
            self.state = CellState::Solved;
            true
        } else {
            false
        }
    }
}
