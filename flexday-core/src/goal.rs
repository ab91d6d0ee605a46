//! Multi-mission goals with a single active goal.
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ValidationError;
use crate::numbers::percent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub missions: Vec<GoalMission>,
    #[serde(default)]
    pub active: bool,
}

impl Goal {
    #[must_use]
    pub fn completed_missions(&self) -> usize {
        self.missions.iter().filter(|m| m.completed).count()
    }

    #[must_use]
    pub fn total_missions(&self) -> usize {
        self.missions.len()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        percent(self.completed_missions(), self.total_missions())
    }

    /// First mission not yet done.
    #[must_use]
    pub fn next_mission(&self) -> Option<&GoalMission> {
        self.missions.iter().find(|m| !m.completed)
    }
}

/// A goal under construction in the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    missions: Vec<GoalMission>,
}

impl GoalDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: Some(category),
            missions: Vec::new(),
        }
    }

    /// Add a step to the goal. Both fields are required.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] for a blank title or description.
    pub fn add_mission(
        &mut self,
        title: &str,
        description: &str,
        category: Category,
    ) -> Result<(), ValidationError> {
        let title = ValidationError::require_text("mission title", title)?;
        let description = ValidationError::require_text("mission description", description)?;
        let id = format!("draft-{}", self.missions.len() + 1);
        self.missions.push(GoalMission {
            id,
            title: title.to_string(),
            description: description.to_string(),
            category,
            completed: false,
        });
        Ok(())
    }

    pub fn remove_mission(&mut self, index: usize) -> Option<GoalMission> {
        (index < self.missions.len()).then(|| self.missions.remove(index))
    }

    #[must_use]
    pub fn missions(&self) -> &[GoalMission] {
        &self.missions
    }

    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.missions.is_empty()
    }
}

/// Every goal the user has, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalBook {
    goals: Vec<Goal>,
    #[serde(default)]
    seq: u32,
}

impl GoalBook {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starter goals offered to a new user; the first is active.
    #[must_use]
    pub fn sample() -> Self {
        fn step(
            id: &str,
            title: &str,
            description: &str,
            category: Category,
            completed: bool,
        ) -> GoalMission {
            GoalMission {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                category,
                completed,
            }
        }
        use Category::{Communication, EmotionRegulation, Mindset, NewChallenge, Relationships};

        Self {
            goals: vec![
                Goal {
                    id: "goal1".into(),
                    title: "Try new things every day".into(),
                    description: "Build new experiences through small daily changes".into(),
                    category: NewChallenge,
                    active: true,
                    missions: vec![
                        step(
                            "m1",
                            "Take a different route",
                            "Choose a new path instead of the usual one",
                            NewChallenge,
                            true,
                        ),
                        step(
                            "m2",
                            "Talk to a stranger",
                            "Work up the courage to start a conversation",
                            Relationships,
                            true,
                        ),
                        step(
                            "m3",
                            "Order a new dish",
                            "Try food you do not usually eat",
                            NewChallenge,
                            false,
                        ),
                        step(
                            "m4",
                            "Start a new hobby",
                            "Actually begin a hobby you were curious about",
                            NewChallenge,
                            false,
                        ),
                        step(
                            "m5",
                            "Ask for help",
                            "Ask someone for help with something hard",
                            Relationships,
                            false,
                        ),
                    ],
                },
                Goal {
                    id: "goal2".into(),
                    title: "Grow relationship flexibility".into(),
                    description: "Improve how you connect with many kinds of people".into(),
                    category: Relationships,
                    active: false,
                    missions: vec![
                        step(
                            "m6",
                            "Talk with someone who disagrees",
                            "Keep an open mind in the conversation",
                            Relationships,
                            true,
                        ),
                        step(
                            "m7",
                            "Join a new gathering",
                            "Take part in a group you usually skip",
                            Relationships,
                            false,
                        ),
                        step(
                            "m8",
                            "Apologize first",
                            "Offer reconciliation first in a conflict",
                            EmotionRegulation,
                            false,
                        ),
                        step(
                            "m9",
                            "Express praise",
                            "Give sincere praise and encouragement",
                            Communication,
                            false,
                        ),
                    ],
                },
                Goal {
                    id: "goal3".into(),
                    title: "Improve emotion regulation".into(),
                    description: "Learn healthy ways to handle stress and negative feelings".into(),
                    category: EmotionRegulation,
                    active: false,
                    missions: vec![
                        step(
                            "m10",
                            "Count to ten when angry",
                            "Breathe for ten seconds before reacting",
                            EmotionRegulation,
                            false,
                        ),
                        step(
                            "m11",
                            "Reframe a negative thought",
                            "Look for a positive angle deliberately",
                            Mindset,
                            false,
                        ),
                        step(
                            "m12",
                            "Do a stress relief activity",
                            "Practice your own healthy way to unwind",
                            EmotionRegulation,
                            false,
                        ),
                        step(
                            "m13",
                            "Keep an emotion journal",
                            "Write down how your feelings changed today",
                            EmotionRegulation,
                            false,
                        ),
                    ],
                },
            ],
            seq: 0,
        }
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn active(&self) -> Option<&Goal> {
        self.goals.iter().find(|g| g.active)
    }

    /// Make `id` the only active goal.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownGoal`] leaves the current selection alone.
    pub fn select_active(&mut self, id: &str) -> Result<&Goal, ValidationError> {
        let idx = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| ValidationError::UnknownGoal(id.to_string()))?;
        for (i, goal) in self.goals.iter_mut().enumerate() {
            goal.active = i == idx;
        }
        log::debug!("active goal is now {id}");
        Ok(&self.goals[idx])
    }

    /// Save a draft as a new, inactive goal.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] for blank title or description, and
    /// [`ValidationError::NoMissions`] when the draft has no steps.
    pub fn register(&mut self, draft: GoalDraft) -> Result<&Goal, ValidationError> {
        let title = ValidationError::require_owned("title", &draft.title)?;
        let description = ValidationError::require_owned("description", &draft.description)?;
        if draft.missions.is_empty() {
            return Err(ValidationError::NoMissions);
        }
        self.seq = self.seq.saturating_add(1);
        let id = format!("goal-new-{}", self.seq);
        let missions = draft
            .missions
            .into_iter()
            .enumerate()
            .map(|(i, mission)| GoalMission {
                id: format!("{id}-m{}", i + 1),
                ..mission
            })
            .collect();
        let category = draft.category.unwrap_or(Category::NewChallenge);
        log::info!("registered goal {id}: {title}");
        self.goals.push(Goal {
            id,
            title,
            description,
            category,
            missions,
            active: false,
        });
        let idx = self.goals.len() - 1;
        Ok(&self.goals[idx])
    }

    /// Mark a goal step as done. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownGoal`] when either id does not match.
    pub fn complete_mission(
        &mut self,
        goal_id: &str,
        mission_id: &str,
    ) -> Result<bool, ValidationError> {
        let mission = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .and_then(|g| g.missions.iter_mut().find(|m| m.id == mission_id))
            .ok_or_else(|| ValidationError::UnknownGoal(format!("{goal_id}/{mission_id}")))?;
        let changed = !mission.completed;
        mission.completed = true;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_progress_matches_completed_steps() {
        let book = GoalBook::sample();
        let first = &book.goals()[0];
        assert_eq!(first.completed_missions(), 2);
        assert_eq!(first.progress_percent(), 40);
        assert_eq!(first.next_mission().unwrap().id, "m3");
        assert_eq!(book.goals()[2].progress_percent(), 0);
        assert_eq!(book.active().unwrap().id, "goal1");
    }

    #[test]
    fn only_one_goal_is_active() {
        let mut book = GoalBook::sample();
        book.select_active("goal2").unwrap();
        let active: Vec<_> = book.goals().iter().filter(|g| g.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "goal2");
        assert!(book.select_active("ghost").is_err());
        assert_eq!(book.active().unwrap().id, "goal2");
    }

    #[test]
    fn register_requires_fields_and_missions() {
        let mut book = GoalBook::empty();
        let mut draft = GoalDraft::new("Be braver", "Small brave acts", Category::NewChallenge);
        assert!(!draft.can_save());
        assert_eq!(
            book.register(draft.clone()).unwrap_err(),
            ValidationError::NoMissions
        );
        let blank = draft.add_mission("Speak up", " ", Category::Communication);
        assert!(blank.is_err());
        draft
            .add_mission(
                "Speak up",
                "Share one idea in a meeting",
                Category::Communication,
            )
            .unwrap();
        assert!(draft.can_save());

        let goal = book.register(draft).unwrap();
        assert_eq!(goal.id, "goal-new-1");
        assert_eq!(goal.missions[0].id, "goal-new-1-m1");
        assert!(!goal.active);

        let blank = GoalDraft::new(" ", "desc", Category::Mindset);
        assert!(matches!(
            book.register(blank),
            Err(ValidationError::EmptyField { field: "title" })
        ));
    }

    #[test]
    fn completing_a_step_moves_progress() {
        let mut book = GoalBook::sample();
        assert_eq!(book.complete_mission("goal3", "m10"), Ok(true));
        assert_eq!(book.complete_mission("goal3", "m10"), Ok(false));
        assert_eq!(book.goals()[2].progress_percent(), 25);
        assert!(book.complete_mission("goal3", "m99").is_err());
    }

    #[test]
    fn draft_missions_can_be_removed() {
        let mut draft = GoalDraft::new("t", "d", Category::Mindset);
        draft.add_mission("a", "b", Category::Mindset).unwrap();
        assert!(draft.remove_mission(3).is_none());
        assert!(draft.remove_mission(0).is_some());
        assert!(draft.missions().is_empty());
    }
}
