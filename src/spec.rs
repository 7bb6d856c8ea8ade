//! The board specification handed to the engine by the content pipeline.
//!
//! Items are strict: a malformed item fails the whole specification when the board is built.
//! Relationship records are lenient: each is decoded on its own from raw JSON, and records
//! that fail are logged and dropped without affecting the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{RelationshipError, SpecError};
use crate::position::Position;
use crate::relationship::{RelationKind, Relationship};

/// A complete, not yet validated, description of one board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSpec {
    /// Category label shown to the player.
    pub category: String,
    /// Side length N of the square grid.
    pub grid_size: usize,
    /// One entry per cell; N² are expected.
    pub items: Vec<ItemSpec>,
    /// Relationship records, kept raw so that one bad record cannot spoil the rest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Value>,
}

/// One cell of a [`BoardSpec`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Answer the player must find.
    pub answer: String,
    /// Clue pointing at the answer.
    pub clue: String,
    /// Legacy plain-text references to other answers.
    #[serde(default)]
    pub references: Vec<String>,
    /// Difficulty tier, starting at 1.
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Grid position of this cell.
    pub position: Position,
}

impl ItemSpec {
    /// An item with no references.
    pub fn new(answer: impl Into<String>, clue: impl Into<String>, difficulty: u32, position: Position) -> Self {
        Self {
            answer: answer.into(),
            clue: clue.into(),
            references: Vec::new(),
            difficulty,
            position,
        }
    }

    /// Replace the legacy references of this item.
    pub fn with_references<S: Into<String>>(mut self, references: impl IntoIterator<Item = S>) -> Self {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }
}

/// The wire shape of a relationship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Relation kind name, matched case-insensitively.
    #[serde(rename = "type")]
    pub kind: String,
    /// Positions on the source side.
    #[serde(default)]
    pub source_positions: Vec<Position>,
    /// Positions on the target side.
    #[serde(default)]
    pub target_positions: Vec<Position>,
    /// Weight in `[0.0, 1.0]`.
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = RelationshipError;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        let kind: RelationKind = record
            .kind
            .parse()
            .map_err(|_| RelationshipError::UnknownKind(record.kind.clone()))?;
        Relationship::new(
            kind,
            record.source_positions,
            record.target_positions,
            record.strength,
            record.description,
        )
    }
}

impl From<&Relationship> for RelationshipRecord {
    fn from(relationship: &Relationship) -> Self {
        Self {
            kind: relationship.kind().to_string(),
            source_positions: relationship.sources().to_vec(),
            target_positions: relationship.targets().to_vec(),
            strength: relationship.strength(),
            description: relationship.description().to_owned(),
        }
    }
}

/// Decode a single raw relationship record.
pub fn parse_relationship(value: &Value) -> Result<Relationship, RelationshipError> {
    let record = RelationshipRecord::deserialize(value)
        .map_err(|e| RelationshipError::Malformed(e.to_string()))?;
    Relationship::try_from(record)
}

impl BoardSpec {
    /// A specification with no items or relationships yet.
    pub fn new(category: impl Into<String>, grid_size: usize) -> Self {
        Self {
            category: category.into(),
            grid_size,
            ..Self::default()
        }
    }

    /// Decode a specification from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        serde_json::from_str(json).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Append an item.
    pub fn with_item(mut self, item: ItemSpec) -> Self {
        self.items.push(item);
        self
    }

    /// Append a relationship in its wire form.
    pub fn with_relationship(mut self, relationship: &Relationship) -> Self {
        // a record of strings, positions and a finite float always serializes
        if let Ok(value) = serde_json::to_value(RelationshipRecord::from(relationship)) {
            self.relationships.push(value);
        }
        self
    }

    /// Every relationship record that decodes, in order. The rest are logged and skipped.
    pub fn parse_relationships(&self) -> Vec<Relationship> {
        self.relationships
            .iter()
            .enumerate()
            .filter_map(|(index, value)| match parse_relationship(value) {
                Ok(relationship) => Some(relationship),
                Err(error) => {
                    warn!(index, %error, "skipping relationship record");
                    None
                }
            })
            .collect()
    }
}

fn default_difficulty() -> u32 {
    1
}

fn default_strength() -> f64 {
    1.0
}
