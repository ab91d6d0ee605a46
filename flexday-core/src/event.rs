//! Structured events emitted by the session for the presentation layer.
//!
//! The core never renders, schedules or toasts anything itself; it hands
//! these back and the UI decides how to surface them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

use crate::catalog::MissionId;
use crate::outcome::MissionStatus;
use crate::personality::PersonalityType;
use crate::progression::Achievement;
use crate::reflection::ReflectionStatus;

/// Stable label attached to an event (e.g. `outcome`, `reward`, `group`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTag(pub String);

impl EventTag {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

pub type EventTags = SmallVec<[EventTag; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Success,
    Warning,
}

/// Hint for how the UI should surface an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiSurfaceHint {
    Log,
    Toast,
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    DayStarted {
        mission: Option<MissionId>,
    },
    OutcomeChanged {
        from: MissionStatus,
        to: MissionStatus,
    },
    /// The reflection recorder should open for this outcome.
    ReflectionRequested {
        status: MissionStatus,
    },
    ReflectionDiscarded,
    ReflectionRecorded {
        id: u64,
        status: ReflectionStatus,
    },
    ExperienceGained {
        amount: u32,
        experience: u32,
    },
    /// Show after `announce_after`; nothing waits on it.
    LevelUp {
        level: u32,
        title: String,
        announce_after: Duration,
    },
    StreakExtended {
        streak: u32,
    },
    AchievementUnlocked {
        achievement: Achievement,
    },
    PersonalityAssigned {
        current: PersonalityType,
        target: Option<PersonalityType>,
    },
    GroupJoined {
        group_id: String,
    },
    GroupCreated {
        group_id: String,
        name: String,
        is_family: bool,
    },
}

impl EventKind {
    fn severity(&self) -> EventSeverity {
        match self {
            Self::LevelUp { .. }
            | Self::AchievementUnlocked { .. }
            | Self::ReflectionRecorded { .. } => EventSeverity::Success,
            Self::OutcomeChanged {
                to: MissionStatus::Failed,
                ..
            } => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }

    fn surface(&self) -> UiSurfaceHint {
        match self {
            Self::ReflectionRequested { .. } | Self::LevelUp { .. } => UiSurfaceHint::Modal,
            Self::ReflectionRecorded { .. }
            | Self::AchievementUnlocked { .. }
            | Self::GroupJoined { .. }
            | Self::GroupCreated { .. }
            | Self::PersonalityAssigned { .. } => UiSurfaceHint::Toast,
            _ => UiSurfaceHint::Log,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::DayStarted { .. } => "day",
            Self::OutcomeChanged { .. } => "outcome",
            Self::ReflectionRequested { .. }
            | Self::ReflectionDiscarded
            | Self::ReflectionRecorded { .. } => "reflection",
            Self::ExperienceGained { .. }
            | Self::LevelUp { .. }
            | Self::StreakExtended { .. }
            | Self::AchievementUnlocked { .. } => "reward",
            Self::PersonalityAssigned { .. } => "personality",
            Self::GroupJoined { .. } | Self::GroupCreated { .. } => "group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Monotonic per-session sequence number.
    pub seq: u32,
    pub day: NaiveDate,
    pub kind: EventKind,
    pub severity: EventSeverity,
    #[serde(default)]
    pub tags: EventTags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_surface_hint: Option<UiSurfaceHint>,
}

impl SessionEvent {
    #[must_use]
    pub fn new(seq: u32, day: NaiveDate, kind: EventKind) -> Self {
        let mut tags = EventTags::new();
        tags.push(EventTag::new(kind.tag()));
        Self {
            seq,
            day,
            severity: kind.severity(),
            ui_surface_hint: Some(kind.surface()),
            tags,
            kind,
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.0 == tag)
    }
}
