//! Validation outcomes surfaced to the presentation layer.
//!
//! Nothing in the core is fatal: every rejected action leaves state untouched
//! and reports one of these values so the UI can keep the control disabled.

use thiserror::Error;

/// Reasons an action was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("reflection step {step} has no answer yet")]
    StepIncomplete { step: usize },
    #[error("reflection can only be submitted from the final step")]
    NotFinalStep,
    #[error("no reflection is waiting for input")]
    NoActiveReflection,
    #[error("reflection {0} does not exist")]
    UnknownReflection(u64),
    #[error("group {0} does not exist")]
    UnknownGroup(String),
    #[error("group {0} is private and requires an invite code")]
    PrivateGroup(String),
    #[error("goal {0} does not exist")]
    UnknownGoal(String),
    #[error("a goal needs at least one mission")]
    NoMissions,
    #[error("personality quiz is missing the {0} type")]
    QuizIncomplete(&'static str),
    #[error("{value:?} is not a known {kind}")]
    UnknownLabel { kind: &'static str, value: String },
}

impl ValidationError {
    /// Reject blank input for `field`, returning the trimmed value otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when `value` is empty after trimming.
    pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            log::debug!("rejected blank {field}");
            Err(Self::EmptyField { field })
        } else {
            Ok(trimmed)
        }
    }

    /// [`Self::require_text`], returning an owned copy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when `value` is empty after trimming.
    pub fn require_owned(field: &'static str, value: &str) -> Result<String, Self> {
        Self::require_text(field, value).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(ValidationError::require_text("title", "  hi "), Ok("hi"));
        assert_eq!(
            ValidationError::require_owned("title", " hi"),
            Ok("hi".to_string())
        );
        assert_eq!(
            ValidationError::require_text("title", " \t\n"),
            Err(ValidationError::EmptyField { field: "title" })
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::EmptyField { field: "content" };
        assert_eq!(err.to_string(), "content must not be empty");
        assert_eq!(
            ValidationError::PrivateGroup("g3".into()).to_string(),
            "group g3 is private and requires an invite code"
        );
        let unknown = ValidationError::UnknownLabel {
            kind: "category",
            value: "chores".into(),
        };
        assert_eq!(unknown.to_string(), "\"chores\" is not a known category");
    }
}
