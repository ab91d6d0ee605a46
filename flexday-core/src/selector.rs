//! Mission selection over an active, possibly personality-biased, list.
use serde::{Deserialize, Serialize};

use crate::catalog::{Mission, MissionCatalog, MissionId};
use crate::category::Category;
use crate::personality::PersonalityType;

/// Cursor over the active mission list.
///
/// The active list is the catalog, optionally preceded by synthesized
/// [`Category::Recommended`] missions for a personality type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MissionSelector {
    missions: Vec<Mission>,
    current_index: usize,
    #[serde(default)]
    bias: Option<PersonalityType>,
}

impl MissionSelector {
    #[must_use]
    pub fn new(catalog: &MissionCatalog) -> Self {
        Self {
            missions: catalog.missions.clone(),
            current_index: 0,
            bias: None,
        }
    }

    #[must_use]
    pub fn from_missions(missions: Vec<Mission>) -> Self {
        Self {
            missions,
            current_index: 0,
            bias: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Mission> {
        self.missions.get(self.current_index)
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub const fn bias(&self) -> Option<PersonalityType> {
        self.bias
    }

    /// Advance by one, wrapping to the start.
    pub fn cycle_next(&mut self) -> Option<&Mission> {
        if !self.missions.is_empty() {
            self.current_index = (self.current_index + 1) % self.missions.len();
        }
        self.current()
    }

    /// The next `count` missions after the current one, wrapping around.
    ///
    /// The current mission only reappears once `count` reaches the list length.
    #[must_use]
    pub fn alternatives(&self, count: usize) -> Vec<&Mission> {
        let len = self.missions.len();
        if len == 0 {
            return Vec::new();
        }
        (1..=count)
            .map(|offset| &self.missions[(self.current_index + offset) % len])
            .collect()
    }

    /// Jump to the mission with `id`. Unknown ids leave the cursor alone.
    pub fn select_by_id(&mut self, id: &MissionId) -> bool {
        if let Some(idx) = self.missions.iter().position(|m| &m.id == id) {
            self.current_index = idx;
            true
        } else {
            log::debug!("select_by_id ignored unknown mission {id}");
            false
        }
    }

    /// Jump directly to a position, wrapping out-of-range values.
    pub fn select_index(&mut self, index: usize) {
        if !self.missions.is_empty() {
            self.current_index = index % self.missions.len();
        }
    }

    /// Prepend the type's recommendations ahead of the catalog entries.
    ///
    /// Earlier recommendations are replaced, not stacked, and the cursor
    /// returns to the first recommendation.
    pub fn apply_personality_bias(&mut self, personality: PersonalityType) {
        self.missions
            .retain(|mission| mission.category != Category::Recommended);
        let mut biased = personality.recommendations();
        biased.append(&mut self.missions);
        self.missions = biased;
        self.current_index = 0;
        self.bias = Some(personality);
        log::debug!(
            "selector biased toward {personality}, {} missions active",
            self.missions.len()
        );
    }

    /// Append a custom mission to the active list.
    pub fn push_custom(&mut self, mission: Mission) {
        self.missions.push(mission);
    }

    #[must_use]
    pub fn missions(&self) -> &[Mission] {
        &self.missions
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
