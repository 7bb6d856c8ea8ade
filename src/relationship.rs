use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantArray};

use crate::error::RelationshipError;
use crate::position::Position;

/// The closed set of ways one group of cells can relate to another.
///
/// Only [`Requires`](Self::Requires), [`Enables`](Self::Enables) and [`Complements`](Self::Complements) gate revelation;
/// the rest are flavour for player-facing text.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[derive(Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    /// Targets stay hidden until every source is solved.
    Requires,
    /// Solving any source unlocks the targets.
    Enables,
    /// Sources hint at the targets.
    HintsAt,
    /// Any member unlocks the others.
    Complements,
    /// Sources contrast with the targets.
    Contrasts,
    /// Sources lead on to the targets in sequence.
    ChainsTo,
}

impl RelationKind {
    /// Whether relationships of this kind can keep a cell hidden.
    pub fn gates(&self) -> bool {
        match self {
            Self::Requires | Self::Enables | Self::Complements => true,
            Self::HintsAt | Self::Contrasts | Self::ChainsTo => false,
        }
    }

    /// Base weight used to order reveals when a cascade is throttled.
    pub(crate) fn revelation_weight(&self) -> f64 {
        match self {
            Self::Enables => 1.0,
            Self::ChainsTo => 0.9,
            Self::HintsAt => 0.8,
            Self::Complements => 0.6,
            Self::Contrasts => 0.5,
            Self::Requires => 0.4,
        }
    }
}

/// A typed, weighted, many-to-many edge between groups of cells. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Relationship {
    kind: RelationKind,
    sources: Vec<Position>,
    targets: Vec<Position>,
    strength: f64,
    description: String,
}

impl Relationship {
    /// Build a relationship, collapsing repeated positions within each side.
    ///
    /// Fails if either side is empty or `strength` lies outside `[0.0, 1.0]`.
    pub fn new(
        kind: RelationKind,
        sources: impl IntoIterator<Item = Position>,
        targets: impl IntoIterator<Item = Position>,
        strength: f64,
        description: impl Into<String>,
    ) -> Result<Self, RelationshipError> {
        let sources = sources.into_iter().unique().collect_vec();
        let targets = targets.into_iter().unique().collect_vec();

        if sources.is_empty() {
            return Err(RelationshipError::NoSources);
        }
        if targets.is_empty() {
            return Err(RelationshipError::NoTargets);
        }
        // also rejects NaN
        if !(0.0..=1.0).contains(&strength) {
            return Err(RelationshipError::StrengthOutOfRange(strength));
        }

        Ok(Self {
            kind,
            sources,
            targets,
            strength,
            description: description.into(),
        })
    }

    /// The kind of this relationship.
    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    /// Source positions, in declaration order.
    pub fn sources(&self) -> &[Position] {
        &self.sources
    }

    /// Target positions, in declaration order.
    pub fn targets(&self) -> &[Position] {
        &self.targets
    }

    /// Weight in `[0.0, 1.0]`.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Free-text description supplied with the relationship.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether `pos` is a source.
    pub fn is_source(&self, pos: Position) -> bool {
        self.sources.contains(&pos)
    }

    /// Whether `pos` is a target.
    pub fn is_target(&self, pos: Position) -> bool {
        self.targets.contains(&pos)
    }

    /// Every distinct position mentioned, sources first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.sources.iter().chain(self.targets.iter()).copied().unique()
    }

    pub(crate) fn priority(&self) -> f64 {
        self.kind.revelation_weight() * self.strength
    }
}
