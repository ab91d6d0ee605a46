use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::personality::{PersonalityType, QuizResult};

/// The local user. Persisted as JSON under the `userProfile` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_type: Option<PersonalityType>,
    #[serde(default)]
    pub target_type: Option<PersonalityType>,
    #[serde(default)]
    pub custom_categories: Vec<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_type: None,
            target_type: None,
            custom_categories: Vec::new(),
        }
    }

    pub fn apply_quiz(&mut self, result: QuizResult) {
        self.current_type = Some(result.current);
        self.target_type = Some(result.target);
    }

    /// The type recommendations should lean toward: the target if set,
    /// otherwise the current type.
    #[must_use]
    pub fn bias_type(&self) -> Option<PersonalityType> {
        self.target_type.or(self.current_type)
    }

    /// Remember a user-defined category label. Repeats are ignored.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] for a blank label.
    pub fn add_custom_category(&mut self, label: &str) -> Result<bool, ValidationError> {
        let label = ValidationError::require_text("category", label)?;
        if self.custom_categories.iter().any(|c| c == label) {
            return Ok(false);
        }
        self.custom_categories.push(label.to_string());
        Ok(true)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new("local", "Me")
    }
}
