//! Structured reflection capture and the reflection history.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;
use crate::error::ValidationError;
use crate::outcome::MissionStatus;

/// The three prompts, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionStep {
    BeforeEmotion,
    AfterEmotion,
    Insight,
}

impl ReflectionStep {
    pub const ALL: [Self; 3] = [Self::BeforeEmotion, Self::AfterEmotion, Self::Insight];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::BeforeEmotion => 0,
            Self::AfterEmotion => 1,
            Self::Insight => 2,
        }
    }

    /// Label used in the composed text. The second step depends on how the
    /// mission ended.
    #[must_use]
    pub const fn label(self, outcome: MissionStatus) -> &'static str {
        match (self, outcome) {
            (Self::BeforeEmotion, _) => "Feeling before",
            (Self::AfterEmotion, MissionStatus::Failed) => "Feeling after attempt",
            (Self::AfterEmotion, _) => "Feeling after completion",
            (Self::Insight, _) => "Insight",
        }
    }

    #[must_use]
    pub const fn prompt(self, outcome: MissionStatus) -> &'static str {
        match (self, outcome) {
            (Self::BeforeEmotion, _) => "How did you feel before starting the mission?",
            (Self::AfterEmotion, MissionStatus::Failed) => "How do you feel after trying?",
            (Self::AfterEmotion, _) => "How do you feel after completing the mission?",
            (Self::Insight, _) => "What did you learn from this experience?",
        }
    }
}

/// Entry status. Mirrors the outcome that opened the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectionStatus {
    Completed,
    Failed,
    InProgress,
}

impl From<MissionStatus> for ReflectionStatus {
    fn from(status: MissionStatus) -> Self {
        match status {
            MissionStatus::Completed => Self::Completed,
            MissionStatus::Failed => Self::Failed,
            MissionStatus::Pending => Self::InProgress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Family,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final output of a finished draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedReflection {
    pub status: ReflectionStatus,
    pub text: String,
}

/// In-progress three-step reflection.
///
/// Answers survive `back()`; nothing is kept after `discard()` or `submit()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionDraft {
    outcome: MissionStatus,
    step: ReflectionStep,
    answers: [String; 3],
}

impl ReflectionDraft {
    #[must_use]
    pub fn new(outcome: MissionStatus) -> Self {
        Self {
            outcome,
            step: ReflectionStep::BeforeEmotion,
            answers: Default::default(),
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> MissionStatus {
        self.outcome
    }

    #[must_use]
    pub const fn step(&self) -> ReflectionStep {
        self.step
    }

    #[must_use]
    pub fn answer(&self, step: ReflectionStep) -> &str {
        &self.answers[step.index()]
    }

    /// Overwrite the answer for the current step.
    pub fn set_answer(&mut self, text: impl Into<String>) {
        self.answers[self.step.index()] = text.into();
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.answers[self.step.index()].trim().is_empty()
    }

    #[must_use]
    pub const fn is_final_step(&self) -> bool {
        matches!(self.step, ReflectionStep::Insight)
    }

    /// Move to the next prompt. On the last step the draft stays put.
    ///
    /// # Errors
    ///
    /// [`ValidationError::StepIncomplete`] while the current answer is blank.
    pub fn next(&mut self) -> Result<ReflectionStep, ValidationError> {
        if !self.can_advance() {
            return Err(ValidationError::StepIncomplete {
                step: self.step.index(),
            });
        }
        if let Some(next) = ReflectionStep::ALL.get(self.step.index() + 1) {
            self.step = *next;
        }
        Ok(self.step)
    }

    /// Step back one prompt, keeping every answer.
    pub fn back(&mut self) -> ReflectionStep {
        if let Some(prev) = self.step.index().checked_sub(1) {
            self.step = ReflectionStep::ALL[prev];
        }
        self.step
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_final_step() && self.answers.iter().all(|a| !a.trim().is_empty())
    }

    /// Compose the three answers into one record.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotFinalStep`] before the insight prompt and
    /// [`ValidationError::StepIncomplete`] when any answer is blank.
    pub fn submit(self) -> Result<ComposedReflection, ValidationError> {
        if !self.is_final_step() {
            return Err(ValidationError::NotFinalStep);
        }
        if let Some(step) = self.answers.iter().position(|a| a.trim().is_empty()) {
            return Err(ValidationError::StepIncomplete { step });
        }
        let text = ReflectionStep::ALL
            .iter()
            .map(|step| format!("{}: {}", step.label(self.outcome), self.answer(*step)))
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(ComposedReflection {
            status: self.outcome.into(),
            text,
        })
    }

    /// Drop the draft. The mission outcome is not touched.
    pub fn discard(self) {
        log::debug!("reflection draft at {:?} discarded", self.step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    #[default]
    Comment,
    Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub content: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CommentKind,
    #[serde(default)]
    pub is_family: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionEntry {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub visibility: Visibility,
    pub status: ReflectionStatus,
    #[serde(default)]
    pub is_owner: bool,
    pub body: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked: bool,
}

/// Fields supplied when recording a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReflection {
    pub title: String,
    pub category: Category,
    pub date: NaiveDate,
    pub visibility: Visibility,
    pub status: ReflectionStatus,
    pub is_owner: bool,
    pub body: String,
}

/// Fields supplied when commenting on an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author: String,
    pub content: String,
    pub date: NaiveDate,
    pub kind: CommentKind,
    pub is_family: bool,
}

/// Reflection history, newest first. Entries are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionLog {
    entries: Vec<ReflectionEntry>,
    #[serde(default)]
    next_id: u64,
}

impl ReflectionLog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record an entry at the front of the history and return its id.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] when title or body is blank.
    pub fn record(&mut self, new: NewReflection) -> Result<u64, ValidationError> {
        let title = ValidationError::require_owned("title", &new.title)?;
        ValidationError::require_text("body", &new.body)?;
        self.next_id = self.next_id.saturating_add(1);
        let id = self.next_id;
        self.entries.insert(
            0,
            ReflectionEntry {
                id,
                title,
                category: new.category,
                date: new.date,
                visibility: new.visibility,
                status: new.status,
                is_owner: new.is_owner,
                body: new.body,
                comments: Vec::new(),
                likes: 0,
                liked: false,
            },
        );
        log::info!(
            "recorded reflection {id} ({:?}) for {}",
            new.status,
            new.date
        );
        Ok(id)
    }

    /// Change the mutable fields of an entry. Identity, status and date stay.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownReflection`] or [`ValidationError::EmptyField`]
    /// for a blank title.
    pub fn edit(
        &mut self,
        id: u64,
        title: &str,
        body: &str,
        visibility: Visibility,
    ) -> Result<(), ValidationError> {
        let title = ValidationError::require_owned("title", title)?;
        let entry = self.get_mut(id)?;
        entry.title = title;
        entry.body = body.to_string();
        entry.visibility = visibility;
        log::debug!("edited reflection {id}");
        Ok(())
    }

    /// Append a comment and return its id.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownReflection`] or [`ValidationError::EmptyField`]
    /// when the content is blank.
    pub fn add_comment(&mut self, id: u64, comment: NewComment) -> Result<u64, ValidationError> {
        let content = ValidationError::require_owned("content", &comment.content)?;
        let entry = self.get_mut(id)?;
        let comment_id = entry
            .comments
            .iter()
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        entry.comments.push(Comment {
            id: comment_id,
            author: comment.author,
            content,
            date: comment.date,
            kind: comment.kind,
            is_family: comment.is_family,
        });
        Ok(comment_id)
    }

    /// Flip the viewer's like and return the new like count.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownReflection`] when `id` is not in the log.
    pub fn toggle_like(&mut self, id: u64) -> Result<u32, ValidationError> {
        let entry = self.get_mut(id)?;
        entry.liked = !entry.liked;
        entry.likes = if entry.liked {
            entry.likes.saturating_add(1)
        } else {
            entry.likes.saturating_sub(1)
        };
        Ok(entry.likes)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&ReflectionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut ReflectionEntry, ValidationError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ValidationError::UnknownReflection(id))
    }

    /// Entries dated on `day`.
    #[must_use]
    pub fn on_day(&self, day: NaiveDate) -> Vec<&ReflectionEntry> {
        self.entries.iter().filter(|e| e.date == day).collect()
    }

    /// Entries dated within `start..=end`.
    #[must_use]
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ReflectionEntry> {
        self.entries
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    #[must_use]
    pub fn owned(&self) -> Vec<&ReflectionEntry> {
        self.entries.iter().filter(|e| e.is_owner).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[ReflectionEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
