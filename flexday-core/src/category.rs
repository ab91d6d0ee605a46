//! Mission categories, difficulty tiers and their display metadata.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Closed set of mission categories.
///
/// `Recommended` is never stored in the catalog; the selector synthesizes it
/// when a personality bias is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Relationships,
    Mindset,
    EmotionRegulation,
    NewChallenge,
    Communication,
    Recommended,
}

/// Presentation hints for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    /// Categories a user can pick for catalog or custom missions.
    pub const CATALOG: &'static [Self] = &[
        Self::Relationships,
        Self::Mindset,
        Self::EmotionRegulation,
        Self::NewChallenge,
        Self::Communication,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relationships => "relationships",
            Self::Mindset => "mindset",
            Self::EmotionRegulation => "emotion_regulation",
            Self::NewChallenge => "new_challenge",
            Self::Communication => "communication",
            Self::Recommended => "recommended",
        }
    }

    #[must_use]
    pub const fn meta(self) -> CategoryMeta {
        match self {
            Self::Relationships => CategoryMeta {
                label: "Relationships",
                icon: "users",
                color: "orange",
            },
            Self::Mindset => CategoryMeta {
                label: "Mindset",
                icon: "brain",
                color: "pink",
            },
            Self::EmotionRegulation => CategoryMeta {
                label: "Emotion Regulation",
                icon: "heart",
                color: "purple",
            },
            Self::NewChallenge => CategoryMeta {
                label: "New Challenge",
                icon: "compass",
                color: "blue",
            },
            Self::Communication => CategoryMeta {
                label: "Communication",
                icon: "message-circle",
                color: "green",
            },
            Self::Recommended => CategoryMeta {
                label: "Recommended",
                icon: "sparkles",
                color: "amber",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relationships" => Ok(Self::Relationships),
            "mindset" => Ok(Self::Mindset),
            "emotion_regulation" => Ok(Self::EmotionRegulation),
            "new_challenge" => Ok(Self::NewChallenge),
            "communication" => Ok(Self::Communication),
            "recommended" => Ok(Self::Recommended),
            other => Err(ValidationError::UnknownLabel {
                kind: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// Optional difficulty tier attached to a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
