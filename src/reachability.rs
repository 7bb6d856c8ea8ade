//! Certifying that every cell of a board can eventually be revealed.
//!
//! The analysis never touches the board. It assumes every position reachable so far gets
//! solved, asks what that would reveal, and repeats until nothing new turns up. Relationship
//! cycles are expected, so the loop is bounded by `2 * N²` passes as well as by the fixed point.
//!
//! A capped graph cascade drops whatever it does not reveal, so under
//! [`EngineConfig::reveal_cap`](crate::EngineConfig::reveal_cap) the fixed point is too
//! optimistic. Capped boards are instead replayed the way a player would work through them,
//! easiest available clue first, with every solve cascading exactly once.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::board::Board;
use crate::cell::Cell;
use crate::graph::RelationshipGraph;
use crate::position::Position;

/// Outcome of a reachability simulation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReachabilityReport {
    /// Positions that can eventually be revealed.
    pub reachable: usize,
    /// Cells on the board.
    pub total: usize,
    /// Positions that can never be revealed without emergency help, in row-major order.
    pub unreachable: Vec<Position>,
    /// `reachable / total` as a percentage.
    pub percentage: f64,
}

impl ReachabilityReport {
    /// Whether every cell is reachable.
    pub fn all_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }

    /// Whether the reachable share meets a quality bar, given as a percentage.
    pub fn meets(&self, threshold: f64) -> bool {
        self.percentage >= threshold
    }
}

impl Display for ReachabilityReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} cells reachable ({:.1}%)", self.reachable, self.total, self.percentage)?;
        if !self.unreachable.is_empty() {
            write!(f, "; unreachable: {}", self.unreachable.iter().join(", "))?;
        }
        Ok(())
    }
}

impl Board {
    /// Reachability from the board as it stands, starting from every revealed position.
    pub fn reachability(&self) -> ReachabilityReport {
        self.simulate(self.revealed_positions(), self.solved_positions())
    }

    /// Reachability from the starter clues alone, ignoring any play so far.
    ///
    /// This is the check a freshly generated board must pass before it is accepted.
    pub fn starter_reachability(&self) -> ReachabilityReport {
        self.simulate(self.starters.iter().copied().collect(), HashSet::new())
    }

    fn simulate(&self, revealed: HashSet<Position>, solved: HashSet<Position>) -> ReachabilityReport {
        let total = self.total_cells();
        let reachable = match (self.graph.as_deref(), self.policy.graph_cap) {
            (Some(graph), Some(cap)) => self.replay_capped(graph, cap, revealed, solved),
            _ => self.fixed_point(revealed),
        };

        let unreachable = self.positions().filter(|p| !reachable.contains(p)).collect_vec();
        let reachable = total - unreachable.len();
        ReachabilityReport {
            reachable,
            total,
            unreachable,
            percentage: reachable as f64 / total as f64 * 100.0,
        }
    }

    fn fixed_point(&self, mut reachable: HashSet<Position>) -> HashSet<Position> {
        for pass in 0..2 * self.total_cells() {
            let found = self.expand(&reachable);
            if found.is_empty() {
                debug!(pass, reachable = reachable.len(), "reachability reached a fixed point");
                break;
            }
            reachable.extend(found);
        }
        reachable
    }

    /// Solve revealed clues in [`Board::available_clues`] order, each cascading once under `cap`
    /// exactly as [`Board::check_answer`] would.
    fn replay_capped(
        &self,
        graph: &RelationshipGraph,
        cap: usize,
        mut revealed: HashSet<Position>,
        mut solved: HashSet<Position>,
    ) -> HashSet<Position> {
        loop {
            let next = self
                .cells
                .iter()
                .filter(|cell| revealed.contains(&cell.position()) && !solved.contains(&cell.position()))
                .min_by_key(|cell| (cell.difficulty, cell.position))
                .map(Cell::position);
            let Some(pos) = next else {
                break;
            };

            solved.insert(pos);
            let found = graph
                .newly_revealed(pos, &solved)
                .into_iter()
                .filter(|p| !revealed.contains(p))
                .take(cap)
                .collect_vec();
            revealed.extend(found);
        }
        debug!(cap, reachable = revealed.len(), "capped replay finished");
        revealed
    }

    /// Positions outside `reachable` that become revealable once all of `reachable` is solved.
    fn expand(&self, reachable: &HashSet<Position>) -> HashSet<Position> {
        match &self.graph {
            Some(graph) => reachable
                .iter()
                .flat_map(|pos| graph.newly_revealed(*pos, reachable))
                .filter(|pos| !reachable.contains(pos))
                .collect(),
            None => {
                let answers = self
                    .cells
                    .iter()
                    .filter(|cell| reachable.contains(&cell.position()))
                    .map(|cell| cell.answer())
                    .collect_vec();
                self.cells
                    .iter()
                    .filter(|cell| !reachable.contains(&cell.position()))
                    .filter(|cell| {
                        // a reference match, or the easy-clue guarantee when nothing matches
                        cell.references
                            .iter()
                            .any(|r| answers.iter().any(|a| self.similarity.similar(r, a)))
                            || (cell.difficulty.get() == 1 && cell.references.len() <= 1)
                    })
                    .map(|cell| cell.position())
                    .collect()
            }
        }
    }
}
