//! Mission catalog: the append-only list of candidate missions.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::{Category, Difficulty};
use crate::error::ValidationError;

/// Stable mission identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single behavioral challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Mission {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        difficulty: Option<Difficulty>,
    ) -> Self {
        Self {
            id: MissionId::new(id),
            title: title.into(),
            description: description.into(),
            category,
            difficulty,
            is_custom: false,
        }
    }
}

/// Ordered mission collection. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MissionCatalog {
    pub missions: Vec<Mission>,
    #[serde(default)]
    custom_seq: u32,
}

impl MissionCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog document of the shape `{"missions": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid mission data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn from_missions(missions: Vec<Mission>) -> Self {
        Self {
            missions,
            custom_seq: 0,
        }
    }

    /// Missions shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        use Category::{Communication, EmotionRegulation, Mindset, NewChallenge, Relationships};
        use Difficulty::{Easy, Hard, Normal};

        Self::from_missions(vec![
            Mission::new(
                "1",
                "Greet someone new first",
                "Say hello first to someone you meet for the first time today.",
                Relationships,
                Some(Easy),
            ),
            Mission::new(
                "2",
                "Hear out an opposing view",
                "Listen to someone who disagrees with you without interrupting.",
                Mindset,
                Some(Normal),
            ),
            Mission::new(
                "3",
                "Say \"I don't know\" three times",
                "Let go of needing to be perfect and admit what you don't know.",
                EmotionRegulation,
                Some(Hard),
            ),
            Mission::new(
                "4",
                "Take a different route",
                "Pick a new path instead of the one you always take.",
                NewChallenge,
                Some(Easy),
            ),
            Mission::new(
                "5",
                "Order something unfamiliar",
                "Try a dish you have never eaten before.",
                NewChallenge,
                Some(Normal),
            ),
            Mission::new(
                "6",
                "Ask someone for help",
                "Ask for help with something that is hard to solve alone.",
                Relationships,
                Some(Normal),
            ),
            Mission::new(
                "7",
                "Count to ten before reacting",
                "When you feel angry, breathe for ten seconds before you respond.",
                EmotionRegulation,
                Some(Normal),
            ),
            Mission::new(
                "8",
                "Reframe a negative thought",
                "When a negative thought shows up, look for one positive angle.",
                Mindset,
                Some(Normal),
            ),
            Mission::new(
                "9",
                "Give a sincere compliment",
                "Tell someone around you what you genuinely appreciate about them.",
                Communication,
                Some(Easy),
            ),
            Mission::new(
                "10",
                "Apologize first",
                "In a disagreement, be the first to offer an apology.",
                Communication,
                Some(Hard),
            ),
        ])
    }

    /// Missions in insertion order, optionally restricted to one category.
    #[must_use]
    pub fn list_missions(&self, category: Option<Category>) -> Vec<&Mission> {
        self.missions
            .iter()
            .filter(|mission| category.is_none_or(|c| mission.category == c))
            .collect()
    }

    /// Append a user-defined mission. Duplicate titles are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the title is blank.
    pub fn add_custom_mission(
        &mut self,
        title: &str,
        category: Category,
    ) -> Result<Mission, ValidationError> {
        let title = ValidationError::require_text("title", title)?;
        self.custom_seq = self.custom_seq.saturating_add(1);
        let mission = Mission {
            id: MissionId(format!("custom-{}", self.custom_seq)),
            title: title.to_string(),
            description: String::new(),
            category,
            difficulty: None,
            is_custom: true,
        };
        log::debug!("added custom mission {} ({category})", mission.id);
        self.missions.push(mission.clone());
        Ok(mission)
    }

    #[must_use]
    pub fn get(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| &m.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mission> {
        self.missions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}

impl<'a> IntoIterator for &'a MissionCatalog {
    type Item = &'a Mission;
    type IntoIter = std::slice::Iter<'a, Mission>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
