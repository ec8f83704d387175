//! Training Studio edits. Pure functions over a `TrainingData` snapshot;
//! handlers pass one of these to `ProposalStore::update_training_data`,
//! which applies it while holding the owner's record.
//!
//! The lock is enforced here, at the edit layer. Composition ignores it.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::training::TrainingData;

const LOCKED_MESSAGE: &str = "Unlock the training data before making changes";

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingUpdate {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<Uuid>,
    #[serde(default, alias = "customInstructions")]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<String>>,
    #[serde(default, alias = "isLocked")]
    pub is_locked: Option<bool>,
}

impl TrainingUpdate {
    fn touches_content(&self) -> bool {
        self.custom_instructions.is_some() || self.examples.is_some()
    }
}

/// Merges `update` into `current`. Content edits on a locked profile are
/// rejected unless the same update also unlocks it.
pub fn apply_update(current: &TrainingData, update: TrainingUpdate) -> Result<TrainingData, AppError> {
    let unlocking = update.is_locked == Some(false);
    if current.is_locked && update.touches_content() && !unlocking {
        return Err(AppError::Locked(LOCKED_MESSAGE.to_string()));
    }

    Ok(TrainingData {
        custom_instructions: update
            .custom_instructions
            .unwrap_or_else(|| current.custom_instructions.clone()),
        examples: update
            .examples
            .map(clean_examples)
            .unwrap_or_else(|| current.examples.clone()),
        is_locked: update.is_locked.unwrap_or(current.is_locked),
    })
}

/// Trims each example and drops the blank ones.
fn clean_examples(examples: Vec<String>) -> Vec<String> {
    examples
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Appends a style example, trimmed. Blank text is rejected.
pub fn add_example(current: &TrainingData, text: &str) -> Result<TrainingData, AppError> {
    if current.is_locked {
        return Err(AppError::Locked(LOCKED_MESSAGE.to_string()));
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("example cannot be empty".to_string()));
    }

    let mut next = current.clone();
    next.examples.push(text.to_string());
    Ok(next)
}

pub fn remove_example(current: &TrainingData, index: usize) -> Result<TrainingData, AppError> {
    if current.is_locked {
        return Err(AppError::Locked(LOCKED_MESSAGE.to_string()));
    }
    if index >= current.examples.len() {
        return Err(AppError::NotFound(format!("Example {index} not found")));
    }

    let mut next = current.clone();
    next.examples.remove(index);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(examples: &[&str], locked: bool) -> TrainingData {
        TrainingData {
            custom_instructions: "base".to_string(),
            examples: examples.iter().map(|e| e.to_string()).collect(),
            is_locked: locked,
        }
    }

    #[test]
    fn test_partial_update_keeps_untouched_fields() {
        let current = data(&["a"], false);
        let next = apply_update(
            &current,
            TrainingUpdate {
                custom_instructions: Some("new".to_string()),
                ..TrainingUpdate::default()
            },
        )
        .unwrap();

        assert_eq!(next.custom_instructions, "new");
        assert_eq!(next.examples, vec!["a"]);
        assert!(!next.is_locked);
    }

    #[test]
    fn test_locked_profile_rejects_content_edits() {
        let current = data(&["a"], true);
        let result = apply_update(
            &current,
            TrainingUpdate {
                examples: Some(vec![]),
                ..TrainingUpdate::default()
            },
        );
        assert!(matches!(result, Err(AppError::Locked(_))));
    }

    #[test]
    fn test_unlock_and_edit_in_one_update() {
        let current = data(&["a"], true);
        let next = apply_update(
            &current,
            TrainingUpdate {
                custom_instructions: Some("edited".to_string()),
                is_locked: Some(false),
                ..TrainingUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(next.custom_instructions, "edited");
        assert!(!next.is_locked);
    }

    #[test]
    fn test_lock_toggle_alone_is_always_allowed() {
        let locked = apply_update(
            &data(&[], false),
            TrainingUpdate {
                is_locked: Some(true),
                ..TrainingUpdate::default()
            },
        )
        .unwrap();
        assert!(locked.is_locked);
    }

    #[test]
    fn test_update_drops_blank_examples() {
        let next = apply_update(
            &data(&["a"], false),
            TrainingUpdate {
                examples: Some(vec![
                    "".to_string(),
                    "  ".to_string(),
                    " kept \n".to_string(),
                ]),
                ..TrainingUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(next.examples, vec!["kept"]);
    }

    #[test]
    fn test_add_example_trims_and_appends() {
        let next = add_example(&data(&["a"], false), "  b \n").unwrap();
        assert_eq!(next.examples, vec!["a", "b"]);
    }

    #[test]
    fn test_add_blank_example_is_rejected() {
        assert!(matches!(
            add_example(&data(&[], false), "   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_add_example_when_locked_is_rejected() {
        assert!(matches!(
            add_example(&data(&[], true), "text"),
            Err(AppError::Locked(_))
        ));
    }

    #[test]
    fn test_remove_example_by_index() {
        let next = remove_example(&data(&["a", "b", "c"], false), 1).unwrap();
        assert_eq!(next.examples, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_out_of_range_is_not_found() {
        assert!(matches!(
            remove_example(&data(&["a"], false), 3),
            Err(AppError::NotFound(_))
        ));
    }
}
