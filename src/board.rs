use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;
use ndarray::Array2;
use tracing::{debug, info};

use crate::builder::BoardBuilder;
use crate::cell::{Cell, CellState};
use crate::config::EngineConfig;
use crate::error::{GuessRejection, SpecError};
use crate::graph::RelationshipGraph;
use crate::position::{Dimension, Position};
use crate::similarity::Similarity;
use crate::spec::BoardSpec;

/// How many cells a single solve may reveal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RevealPolicy {
    pub(crate) graph_cap: Option<usize>,
    pub(crate) fallback_cap: usize,
}

impl From<&EngineConfig> for RevealPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            graph_cap: config.reveal_cap,
            fallback_cap: config.fallback_reveal_cap,
        }
    }
}

/// One game's grid of cells and the rules deciding what the player may see.
///
/// [`Board`]s should be built from a [`BoardSpec`] with [`Board::from_spec`] or a [`BoardBuilder`].
/// Starter clues are revealed as part of construction. After that, cells change only by being
/// solved through [`Board::check_answer`] or force-revealed through
/// [`Board::emergency_reveal_clue`](crate::Board::emergency_reveal_clue).
#[derive(Clone)]
pub struct Board {
    pub(crate) category: String,
    pub(crate) size: Dimension,
    pub(crate) cells: Array2<Cell>,
    pub(crate) solved_count: usize,
    pub(crate) graph: Option<Arc<RelationshipGraph>>,
    pub(crate) similarity: Arc<dyn Similarity + Send + Sync>,
    pub(crate) policy: RevealPolicy,
    pub(crate) starters: Vec<Position>,
}

impl Board {
    /// Validate `spec` and build a board paced by `config`.
    ///
    /// Fails with the first problem found; use [`BoardBuilder`] to see all of them.
    pub fn from_spec(spec: &BoardSpec, config: &EngineConfig) -> Result<Self, SpecError> {
        BoardBuilder::from_spec(spec)
            .config(config.clone())
            .build()
            .map_err(|reasons| {
                reasons
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| SpecError::Parse("board rejected".into()))
            })
    }

    pub(crate) fn assemble(
        category: String,
        size: Dimension,
        cells: Array2<Cell>,
        graph: Option<Arc<RelationshipGraph>>,
        similarity: Arc<dyn Similarity + Send + Sync>,
        policy: RevealPolicy,
    ) -> Self {
        let mut board = Self {
            category,
            size,
            cells,
            solved_count: 0,
            graph,
            similarity,
            policy,
            starters: Vec::new(),
        };
        board.reveal_starters();
        board
    }

    fn reveal_starters(&mut self) {
        let mut starters = match &self.graph {
            Some(graph) => {
                let nothing_solved = HashSet::new();
                self.positions()
                    .filter(|pos| graph.can_reveal(*pos, &nothing_solved))
                    .collect_vec()
            }
            None => Vec::new(),
        };

        if starters.is_empty() {
            // never unplayable from move one, whatever the graph says
            let easiest = self
                .cells
                .iter()
                .filter(|cell| cell.difficulty.get() == 1)
                .min_by_key(|cell| cell.references.len())
                .or_else(|| self.cells.iter().min_by_key(|cell| cell.ease_key()));
            starters.extend(easiest.map(Cell::position));
        }

        for pos in &starters {
            self.reveal(*pos);
        }
        debug!(starters = starters.len(), graph = self.graph.is_some(), "revealed starter clues");
        self.starters = starters;
    }

    /// Category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Side length N.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// N², the number of cells.
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cells solved so far. Never decreases.
    pub fn solved_count(&self) -> usize {
        self.solved_count
    }

    /// The relationship graph, if the board has one.
    pub fn graph(&self) -> Option<&RelationshipGraph> {
        self.graph.as_deref()
    }

    /// Positions revealed before any solve.
    pub fn starters(&self) -> &[Position] {
        &self.starters
    }

    /// The cell at `pos`, if `pos` is on the board.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.as_index())
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.indexed_iter().map(|(index, _)| Position::from(index))
    }

    fn positions_in(&self, state: CellState) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(move |cell| cell.state() == state)
            .map(Cell::position)
    }

    /// Positions whose clue is still hidden, in row-major order.
    pub fn hidden_positions(&self) -> Vec<Position> {
        self.positions_in(CellState::Hidden).collect()
    }

    /// Positions of solved cells.
    pub fn solved_positions(&self) -> HashSet<Position> {
        self.positions_in(CellState::Solved).collect()
    }

    /// Positions of every revealed cell, solved ones included.
    pub fn revealed_positions(&self) -> HashSet<Position> {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed())
            .map(Cell::position)
            .collect()
    }

    /// Submit `submission` as the answer at `pos`.
    ///
    /// Unknown, hidden and already solved positions are rejected without touching the board, as are
    /// guesses the board's [`Similarity`] does not accept. An accepted guess solves the cell and
    /// returns the positions revealed as a consequence.
    pub fn check_answer(&mut self, submission: &str, pos: Position) -> Result<Vec<Position>, GuessRejection> {
        let cell = self.cell(pos).ok_or(GuessRejection::UnknownPosition(pos))?;
        match cell.state() {
            CellState::Hidden => return Err(GuessRejection::NotRevealed(pos)),
            CellState::Solved => return Err(GuessRejection::AlreadySolved(pos)),
            CellState::Revealed => {}
        }
        if !self.similarity.similar(submission, cell.answer()) {
            return Err(GuessRejection::Incorrect(pos));
        }

        Ok(self.mark_solved(pos))
    }

    fn mark_solved(&mut self, pos: Position) -> Vec<Position> {
        let Some(cell) = self.cells.get_mut(pos.as_index()) else {
            return Vec::new();
        };
        if !cell.solve() {
            return Vec::new();
        }
        self.solved_count += 1;

        let revealed = match self.graph.clone() {
            Some(graph) => self.cascade_through(&graph, pos),
            None => self.cascade_by_reference(pos),
        };
        info!(
            position = %pos,
            solved = self.solved_count,
            total = self.total_cells(),
            revealed = revealed.len(),
            "cell solved"
        );
        revealed
    }

    fn cascade_through(&mut self, graph: &RelationshipGraph, pos: Position) -> Vec<Position> {
        let solved = self.solved_positions();
        let cap = self.policy.graph_cap.unwrap_or(usize::MAX);
        let revealed = graph
            .newly_revealed(pos, &solved)
            .into_iter()
            .filter(|p| self.cell(*p).is_some_and(|cell| !cell.is_revealed()))
            .take(cap)
            .collect_vec();

        for p in &revealed {
            self.reveal(*p);
        }
        revealed
    }

    fn cascade_by_reference(&mut self, pos: Position) -> Vec<Position> {
        let Some(answer) = self.cell(pos).map(|cell| cell.answer.clone()) else {
            return Vec::new();
        };

        let mut revealed = self
            .cells
            .iter()
            .filter(|cell| !cell.is_revealed())
            .filter(|cell| cell.references.iter().any(|r| self.similarity.similar(r, &answer)))
            .map(Cell::position)
            .take(self.policy.fallback_cap)
            .collect_vec();

        if revealed.is_empty() {
            // keep the game moving with one more easy clue
            revealed.extend(
                self.cells
                    .iter()
                    .filter(|cell| !cell.is_revealed())
                    .filter(|cell| cell.difficulty.get() == 1 && cell.references.len() <= 1)
                    .min_by_key(|cell| cell.ease_key())
                    .map(Cell::position),
            );
        }

        for p in &revealed {
            self.reveal(*p);
        }
        revealed
    }

    pub(crate) fn reveal(&mut self, pos: Position) -> bool {
        self.cells
            .get_mut(pos.as_index())
            .is_some_and(Cell::reveal)
    }

    /// Whether every cell is solved.
    pub fn is_complete(&self) -> bool {
        self.solved_count == self.total_cells()
    }

    /// Whether the board is incomplete yet offers no clue to work on.
    pub fn is_stuck(&self) -> bool {
        !self.is_complete() && !self.cells.iter().any(Cell::is_available)
    }

    /// Revealed, unsolved cells, easiest first. Equal difficulties keep row-major order.
    pub fn available_clues(&self) -> Vec<&Cell> {
        self.cells
            .iter()
            .filter(|cell| cell.is_available())
            .sorted_by_key(|cell| cell.difficulty)
            .collect()
    }

    /// Percentage of cells solved.
    pub fn progress(&self) -> f64 {
        self.solved_count as f64 / self.total_cells() as f64 * 100.0
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{}", match cell.state() {
                    CellState::Hidden => '■',
                    CellState::Revealed => '?',
                    CellState::Solved => '#',
                })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
