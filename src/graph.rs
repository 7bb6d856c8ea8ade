use std::collections::{BTreeMap, HashMap, HashSet};

use itertools::Itertools;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use strum::VariantArray;

use crate::position::Position;
use crate::relationship::{RelationKind, Relationship};

/// Description given to cells with no relationships at all.
pub const INDEPENDENT: &str = "Independent";
const FLAVOUR_ONLY: &str = "Complex relationships";

/// Summary counts over the relationships in a graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Complexity {
    /// Relationships in the graph, duplicates included.
    pub total: usize,
    /// Relationships per kind. Every kind is present, possibly with a count of zero.
    pub by_kind: BTreeMap<RelationKind, usize>,
    /// Relationships with more than one source and more than one target.
    pub many_to_many: usize,
    /// Largest number of positions named by a single relationship.
    pub max_positions: usize,
}

/// Typed dependency edges between board positions, indexed by position.
///
/// Relationships are only ever appended. Cycles are allowed; nothing here assumes the graph is a DAG.
#[derive(Clone, Debug, Default)]
pub struct RelationshipGraph {
    relationships: Vec<Relationship>,
    // position -> indices into `relationships`, in insertion order
    index: HashMap<Position, Vec<usize>>,
}

impl RelationshipGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `relationship` and index it under each distinct position it mentions.
    pub fn add(&mut self, relationship: Relationship) {
        let id = self.relationships.len();
        for pos in relationship.positions() {
            self.index.entry(pos).or_default().push(id);
        }
        self.relationships.push(relationship);
    }

    /// Number of relationships, duplicates included.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether no relationship has been added.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// All relationships in insertion order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Every relationship mentioning `pos` as a source or target, in insertion order.
    pub fn relationships_at(&self, pos: Position) -> impl Iterator<Item = &Relationship> + '_ {
        self.index
            .get(&pos)
            .into_iter()
            .flatten()
            .map(move |&id| &self.relationships[id])
    }

    /// Whether `pos` may be revealed given the positions in `solved`.
    ///
    /// Each gating kind is checked independently and all must pass:
    /// - [`Requires`](RelationKind::Requires): where `pos` is a target, every other source must be solved.
    /// - [`Enables`](RelationKind::Enables): if anything enables `pos`, at least one enabling source must be solved.
    /// - [`Complements`](RelationKind::Complements): each complement group containing `pos` needs one other member solved.
    ///
    /// A position with no gating relationships is always revealable, and `pos` never gates itself.
    pub fn can_reveal(&self, pos: Position, solved: &HashSet<Position>) -> bool {
        let mut enabled_by_any = false;
        let mut enabled = false;

        for rel in self.relationships_at(pos) {
            match rel.kind() {
                RelationKind::Requires => {
                    if rel.is_target(pos)
                        && !rel.sources().iter().filter(|&&p| p != pos).all(|p| solved.contains(p))
                    {
                        return false;
                    }
                }
                RelationKind::Enables => {
                    let mut enablers = rel.sources().iter().filter(|&&p| p != pos).peekable();
                    if rel.is_target(pos) && enablers.peek().is_some() {
                        enabled_by_any = true;
                        enabled |= enablers.any(|p| solved.contains(p));
                    }
                }
                RelationKind::Complements => {
                    let mut partners = rel.positions().filter(|&p| p != pos).peekable();
                    if partners.peek().is_some() && !partners.any(|p| solved.contains(&p)) {
                        return false;
                    }
                }
                RelationKind::HintsAt | RelationKind::Contrasts | RelationKind::ChainsTo => {}
            }
        }

        !enabled_by_any || enabled
    }

    /// Positions that become revealable now that `just_solved` has been solved.
    ///
    /// `solved` must already contain `just_solved`. Candidates are the unsolved targets of every
    /// relationship sourced at `just_solved`; each is kept only if [`Self::can_reveal`] holds.
    /// Nothing is truncated. The result is ordered by relationship priority (kind weight times
    /// strength), highest first, so callers throttling the cascade keep the strongest links.
    pub fn newly_revealed(&self, just_solved: Position, solved: &HashSet<Position>) -> Vec<Position> {
        let mut best: HashMap<Position, f64> = HashMap::new();
        let mut order = Vec::new();

        for rel in self.relationships_at(just_solved).filter(|r| r.is_source(just_solved)) {
            let priority = rel.priority();
            for &target in rel.targets() {
                if solved.contains(&target) {
                    continue;
                }
                match best.get_mut(&target) {
                    Some(p) => *p = p.max(priority),
                    None => {
                        best.insert(target, priority);
                        order.push(target);
                    }
                }
            }
        }

        order
            .into_iter()
            .filter(|pos| self.can_reveal(*pos, solved))
            // stable, so equal priorities keep first-seen order
            .sorted_by(|a, b| best[b].total_cmp(&best[a]))
            .collect()
    }

    /// Human-readable summary of how `pos` connects to the rest of the board.
    pub fn describe(&self, pos: Position) -> String {
        let mut fragments = Vec::new();
        let mut any = false;

        for rel in self.relationships_at(pos) {
            any = true;
            let (as_source, as_target) = match rel.kind() {
                // targets wait on the sources
                RelationKind::Requires => ("Required by", "Requires"),
                RelationKind::Enables => ("Enables", "Enabled by"),
                RelationKind::HintsAt => ("Hints at", "Hinted by"),
                RelationKind::Complements | RelationKind::Contrasts | RelationKind::ChainsTo => continue,
            };
            if rel.is_source(pos) {
                fragments.push(format!("{as_source} {}", rel.targets().iter().join(", ")));
            }
            if rel.is_target(pos) {
                fragments.push(format!("{as_target} {}", rel.sources().iter().join(", ")));
            }
        }

        match (any, fragments.is_empty()) {
            (false, _) => INDEPENDENT.to_owned(),
            (true, true) => FLAVOUR_ONLY.to_owned(),
            (true, false) => fragments.join(" | "),
        }
    }

    /// Counts describing how tangled this graph is.
    pub fn complexity(&self) -> Complexity {
        let mut by_kind: BTreeMap<RelationKind, usize> =
            RelationKind::VARIANTS.iter().map(|k| (*k, 0)).collect();
        for rel in &self.relationships {
            *by_kind.entry(rel.kind()).or_default() += 1;
        }

        Complexity {
            total: self.relationships.len(),
            by_kind,
            many_to_many: self
                .relationships
                .iter()
                .filter(|r| r.sources().len() > 1 && r.targets().len() > 1)
                .count(),
            max_positions: self
                .relationships
                .iter()
                .map(|r| r.sources().len() + r.targets().len())
                .max()
                .unwrap_or(0),
        }
    }

    /// Groups of two or more positions that gate one another in a loop.
    ///
    /// Edges run from a prerequisite to the position it gates: source to target for
    /// requires and enables, and between every pair of members for complements.
    /// Each returned group is sorted; groups are sorted by their first position.
    pub fn gating_cycles(&self) -> Vec<Vec<Position>> {
        let mut dependencies: DiGraphMap<Position, ()> = DiGraphMap::new();

        for rel in self.relationships.iter().filter(|r| r.kind().gates()) {
            match rel.kind() {
                RelationKind::Requires | RelationKind::Enables => {
                    for (&s, &t) in rel.sources().iter().cartesian_product(rel.targets()) {
                        if s != t {
                            dependencies.add_edge(s, t, ());
                        }
                    }
                }
                RelationKind::Complements => {
                    let members = rel.positions().collect_vec();
                    for (&a, &b) in members.iter().tuple_combinations() {
                        dependencies.add_edge(a, b, ());
                        dependencies.add_edge(b, a, ());
                    }
                }
                RelationKind::HintsAt | RelationKind::Contrasts | RelationKind::ChainsTo => {}
            }
        }

        tarjan_scc(&dependencies)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| component.into_iter().sorted().collect_vec())
            .sorted()
            .collect()
    }
}
