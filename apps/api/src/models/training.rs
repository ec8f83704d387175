use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The freelancer's style profile: standing instructions plus past
/// proposals used as style references.
///
/// `is_locked` only gates edits through the training endpoints. The
/// composer reads the snapshot as-is whatever the lock says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrainingDataWire")]
pub struct TrainingData {
    pub custom_instructions: String,
    pub examples: Vec<String>,
    pub is_locked: bool,
}

/// Everything browsers have ever stored under `trainingData`, including the
/// single-example shape that predates the example library.
#[derive(Debug, Default, Deserialize)]
struct TrainingDataWire {
    #[serde(default, alias = "customInstructions")]
    custom_instructions: Option<String>,
    #[serde(default)]
    examples: Option<Vec<String>>,
    #[serde(default, alias = "exampleProposal")]
    example_proposal: Option<String>,
    #[serde(default, alias = "isLocked")]
    is_locked: Option<bool>,
}

impl From<TrainingDataWire> for TrainingData {
    fn from(wire: TrainingDataWire) -> Self {
        let examples = match (wire.examples, wire.example_proposal) {
            (Some(examples), _) => examples,
            (None, Some(legacy)) => vec![legacy],
            (None, None) => Vec::new(),
        }
        .into_iter()
        .filter(|e| !e.trim().is_empty())
        .collect();
        Self {
            custom_instructions: wire.custom_instructions.unwrap_or_default(),
            examples,
            is_locked: wire.is_locked.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TrainingDataRow {
    pub owner_id: Uuid,
    pub custom_instructions: String,
    pub examples: Vec<String>,
    pub is_locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingDataRow> for TrainingData {
    fn from(row: TrainingDataRow) -> Self {
        Self {
            custom_instructions: row.custom_instructions,
            examples: row.examples,
            is_locked: row.is_locked,
        }
    }
}
