//! Incremental, validating construction of a [`Board`].
//!
//! [`BoardBuilder::from_spec`] is the usual entry point; items and relationships can also be
//! added one at a time, for example from tests or generators.

use std::num::NonZero;
use std::sync::Arc;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::board::{Board, RevealPolicy};
use crate::cell::Cell;
use crate::config::EngineConfig;
use crate::error::SpecError;
use crate::graph::{RelationshipGraph, INDEPENDENT};
use crate::position::{Dimension, Position};
use crate::relationship::Relationship;
use crate::similarity::{FuzzyRatio, Similarity};
use crate::spec::{BoardSpec, ItemSpec};

/// Assembles a [`Board`] piece by piece, recording every problem along the way.
///
/// Once a problem is recorded the builder ignores further items and [`build`](Self::build) fails.
/// Builders can be [`Clone`]d to save their state at some point.
#[derive(Clone)]
pub struct BoardBuilder {
    category: String,
    size: Option<Dimension>,
    items: Option<Array2<Option<ItemSpec>>>,
    graph: RelationshipGraph,
    config: EngineConfig,
    similarity: Option<Arc<dyn Similarity + Send + Sync>>,
    invalid_reasons: Vec<SpecError>,
}

impl BoardBuilder {
    /// Start a board of `grid_size` × `grid_size` cells.
    ///
    /// A zero `grid_size` puts the builder straight into an invalid state.
    pub fn with_size(category: impl Into<String>, grid_size: usize) -> Self {
        let size = NonZero::new(grid_size);
        Self {
            category: category.into(),
            size,
            items: size.map(|n| Array2::from_elem((n.get(), n.get()), None)),
            graph: RelationshipGraph::new(),
            config: EngineConfig::default(),
            similarity: None,
            invalid_reasons: if size.is_some() { Vec::new() } else { vec![SpecError::ZeroGridSize] },
        }
    }

    /// Load every item and every decodable relationship from `spec`.
    pub fn from_spec(spec: &BoardSpec) -> Self {
        let mut builder = Self::with_size(spec.category.clone(), spec.grid_size);
        if let Some(size) = builder.size {
            let expected = size.get() * size.get();
            if spec.items.len() != expected {
                builder.invalid_reasons.push(SpecError::WrongItemCount {
                    expected,
                    found: spec.items.len(),
                });
            }
        }
        for item in &spec.items {
            builder.add_item(item.clone());
        }
        for relationship in spec.parse_relationships() {
            builder.add_relationship(relationship);
        }
        builder
    }

    /// Place an item.
    ///
    /// May invalidate the builder with [`OutOfBounds`](SpecError::OutOfBounds),
    /// [`PositionCollision`](SpecError::PositionCollision) or [`ZeroDifficulty`](SpecError::ZeroDifficulty).
    /// If the builder is already invalid, this function does nothing.
    pub fn add_item(&mut self, item: ItemSpec) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }
        let Some(items) = self.items.as_mut() else {
            return self;
        };

        let position = item.position;
        if item.difficulty == 0 {
            self.invalid_reasons.push(SpecError::ZeroDifficulty(position));
            return self;
        }
        match items.get_mut(position.as_index()) {
            None => self.invalid_reasons.push(SpecError::OutOfBounds(position)),
            Some(Some(_)) => self.invalid_reasons.push(SpecError::PositionCollision(position)),
            Some(slot) => *slot = Some(item),
        }

        self
    }

    /// Add a relationship to the board's graph.
    ///
    /// A relationship naming a position off the grid is malformed; it is logged and skipped
    /// without invalidating the builder.
    pub fn add_relationship(&mut self, relationship: Relationship) -> &mut Self {
        if let Some(size) = self.size {
            if let Some(stray) = relationship.positions().find(|p| !p.within(size)) {
                warn!(position = %stray, kind = %relationship.kind(), "skipping relationship outside the grid");
                return self;
            }
        }
        self.graph.add(relationship);
        self
    }

    /// Use `config` for revelation pacing and the default matcher threshold.
    pub fn config(&mut self, config: EngineConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Judge guesses and references with `similarity` instead of [`FuzzyRatio`].
    pub fn similarity(&mut self, similarity: Arc<dyn Similarity + Send + Sync>) -> &mut Self {
        self.similarity = Some(similarity);
        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&[SpecError])` otherwise.
    pub fn is_valid(&self) -> Option<&[SpecError]> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`] with its starter clues revealed.
    ///
    /// Fails with every recorded reason if the builder is invalid or a cell was never filled.
    pub fn build(&self) -> Result<Board, Vec<SpecError>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }
        let (Some(size), Some(items)) = (self.size, self.items.as_ref()) else {
            return Err(vec![SpecError::ZeroGridSize]);
        };

        let filled = items.iter().filter(|slot| slot.is_some()).count();
        if filled != items.len() {
            return Err(vec![SpecError::WrongItemCount {
                expected: items.len(),
                found: filled,
            }]);
        }

        let graph = (!self.graph.is_empty()).then(|| Arc::new(self.graph.clone()));

        let mut cells = Vec::with_capacity(items.len());
        for (index, slot) in items.indexed_iter() {
            let position = Position::from(index);
            let Some(item) = slot else {
                return Err(vec![SpecError::WrongItemCount { expected: items.len(), found: filled }]);
            };
            let Some(difficulty) = NonZero::new(item.difficulty) else {
                return Err(vec![SpecError::ZeroDifficulty(position)]);
            };
            let description = graph
                .as_ref()
                .map_or_else(|| INDEPENDENT.to_owned(), |g| g.describe(position));
            cells.push(Cell::new(
                item.answer.clone(),
                item.clue.clone(),
                item.references.clone(),
                difficulty,
                position,
                description,
            ));
        }
        let cells = Array2::from_shape_vec((size.get(), size.get()), cells)
            .map_err(|_| vec![SpecError::WrongItemCount { expected: items.len(), found: filled }])?;

        let similarity = self
            .similarity
            .clone()
            .unwrap_or_else(|| {
                Arc::new(FuzzyRatio::new(self.config.similarity_threshold)) as Arc<dyn Similarity + Send + Sync>
            });

        debug!(
            category = %self.category,
            size = size.get(),
            relationships = self.graph.len(),
            "building board"
        );

        Ok(Board::assemble(
            self.category.clone(),
            size,
            cells,
            graph,
            similarity,
            RevealPolicy::from(&self.config),
        ))
    }
}
