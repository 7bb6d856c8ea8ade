//! Recovery from boards that offer the player nothing to do.
//!
//! A board is stuck when it is incomplete and no revealed clue is left unsolved. The only way
//! forward is to force one hidden clue into view, preferring clues that are likely to be
//! solvable on their own.

use itertools::Itertools;
use tracing::{info, warn};

use crate::board::Board;
use crate::cell::Cell;
use crate::error::EngineError;
use crate::position::Position;

impl Board {
    /// The hidden cell emergency revelation would pick, if any.
    ///
    /// Hidden cells are ranked by difficulty, then reference count, then row-major order. The
    /// first of them with no references and difficulty at most 2 wins; failing that, the first
    /// with at most one reference and difficulty at most 3; failing that, the easiest overall.
    pub fn emergency_candidate(&self) -> Option<Position> {
        let hidden = self
            .cells
            .iter()
            .filter(|cell| !cell.is_revealed())
            .sorted_by_key(|cell| cell.ease_key())
            .collect_vec();

        let tiers: [fn(&Cell) -> bool; 2] = [
            |cell| cell.references.is_empty() && cell.difficulty.get() <= 2,
            |cell| cell.references.len() <= 1 && cell.difficulty.get() <= 3,
        ];
        tiers
            .iter()
            .find_map(|fits| hidden.iter().find(|cell| fits(cell)))
            .or_else(|| hidden.first())
            .map(|cell| cell.position())
    }

    /// Whether there is anything left for emergency revelation to reveal.
    pub fn can_emergency_reveal(&self) -> bool {
        self.cells.iter().any(|cell| !cell.is_revealed())
    }

    /// Force one hidden clue into view to break a stuck state, returning where it is.
    ///
    /// Fails with [`EngineError::NoHiddenCells`] when every cell is already revealed.
    pub fn emergency_reveal_clue(&mut self) -> Result<Position, EngineError> {
        let Some(pos) = self.emergency_candidate() else {
            warn!(solved = self.solved_count, "emergency revelation found no hidden cells");
            return Err(EngineError::NoHiddenCells);
        };
        self.reveal(pos);
        info!(position = %pos, "emergency clue revealed");
        Ok(pos)
    }
}
