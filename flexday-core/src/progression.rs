//! Experience, levels, streaks and achievements.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Difficulty;
use crate::constants::{
    ATTEMPTED_EXPERIENCE, COMPLETED_EXPERIENCE, CONSISTENCY_STREAK, EXPERIENCE_CAP, GROWTH_LEVEL,
    STARTING_LEVEL,
};
use crate::outcome::MissionStatus;

/// Display title for each level. Levels past the table keep the last title.
const LEVEL_TITLES: [&str; 5] = ["Start", "First Step", "Running", "Hero", "Master"];

#[must_use]
pub fn level_title(level: u32) -> &'static str {
    let idx = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX);
    LEVEL_TITLES
        .get(idx)
        .copied()
        .unwrap_or(LEVEL_TITLES[LEVEL_TITLES.len() - 1])
}

/// Experience granted for a reflection on an outcome.
#[must_use]
pub const fn experience_for(status: MissionStatus) -> u32 {
    match status {
        MissionStatus::Completed => COMPLETED_EXPERIENCE,
        MissionStatus::Failed => ATTEMPTED_EXPERIENCE,
        MissionStatus::Pending => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstStep,
    Consistency,
    Courage,
    Growth,
}

impl Achievement {
    pub const ALL: &'static [Self] = &[
        Self::FirstStep,
        Self::Consistency,
        Self::Courage,
        Self::Growth,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstStep => "First Step",
            Self::Consistency => "Consistency",
            Self::Courage => "Courage",
            Self::Growth => "Growth",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstStep => "Complete your first mission",
            Self::Consistency => "Complete missions three times in a row",
            Self::Courage => "Complete a hard mission",
            Self::Growth => "Reach level 5",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What a single award changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub gained: u32,
    pub level_up: Option<u32>,
    pub streak: u32,
    pub unlocked: Vec<Achievement>,
}

/// Accumulated progress for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    level: u32,
    experience: u32,
    streak: u32,
    #[serde(default)]
    completed_total: u32,
    #[serde(default)]
    hard_completed: u32,
    #[serde(default)]
    achievements: Vec<Achievement>,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: STARTING_LEVEL,
            experience: 0,
            streak: 0,
            completed_total: 0,
            hard_completed: 0,
            achievements: Vec::new(),
        }
    }

    /// Start from explicit values; experience is clamped below the cap and
    /// level is at least 1.
    #[must_use]
    pub fn with_state(level: u32, experience: u32, streak: u32) -> Self {
        Self {
            level: level.max(STARTING_LEVEL),
            experience: experience.min(EXPERIENCE_CAP - 1),
            streak,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        level_title(self.level)
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Apply the reflection reward for `status`.
    ///
    /// Reaching the cap advances exactly one level and resets experience to 0;
    /// the overflow is not carried. Only completions extend the streak.
    pub fn award(
        &mut self,
        status: MissionStatus,
        difficulty: Option<Difficulty>,
    ) -> ProgressUpdate {
        let gained = experience_for(status);
        let mut level_up = None;

        if gained > 0 {
            if self.experience + gained >= EXPERIENCE_CAP {
                self.level = self.level.saturating_add(1);
                self.experience = 0;
                level_up = Some(self.level);
                log::info!("level up to {} ({})", self.level, self.title());
            } else {
                self.experience += gained;
            }
        }

        if status == MissionStatus::Completed {
            self.streak = self.streak.saturating_add(1);
            self.completed_total = self.completed_total.saturating_add(1);
            if difficulty == Some(Difficulty::Hard) {
                self.hard_completed = self.hard_completed.saturating_add(1);
            }
        }

        let unlocked = self.unlock_new();
        ProgressUpdate {
            gained,
            level_up,
            streak: self.streak,
            unlocked,
        }
    }

    fn earned(&self, achievement: Achievement) -> bool {
        match achievement {
            Achievement::FirstStep => self.completed_total >= 1,
            Achievement::Consistency => self.streak >= CONSISTENCY_STREAK,
            Achievement::Courage => self.hard_completed >= 1,
            Achievement::Growth => self.level >= GROWTH_LEVEL,
        }
    }

    fn unlock_new(&mut self) -> Vec<Achievement> {
        let fresh: Vec<_> = Achievement::ALL
            .iter()
            .copied()
            .filter(|a| !self.achievements.contains(a) && self.earned(*a))
            .collect();
        for achievement in &fresh {
            log::info!("achievement unlocked: {achievement}");
        }
        self.achievements.extend(fresh.iter().copied());
        fresh
    }
}
