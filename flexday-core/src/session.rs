//! Explicit application state for one user and the callbacks the UI drives.
//!
//! Every callback returns the [`SessionEvent`]s it produced, in order.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{Mission, MissionCatalog, MissionId};
use crate::category::Category;
use crate::constants::{DEFAULT_ALTERNATIVES, LEVEL_UP_ANNOUNCE_DELAY};
use crate::error::ValidationError;
use crate::event::{EventKind, SessionEvent};
use crate::goal::GoalBook;
use crate::group::GroupDirectory;
use crate::outcome::{MissionOutcome, MissionStatus, Transition};
use crate::personality::PersonalityType;
use crate::profile::UserProfile;
use crate::progression::{Progression, level_title};
use crate::reflection::{
    NewReflection, ReflectionDraft, ReflectionLog, ReflectionStatus, Visibility,
};
use crate::report::GrowthReport;
use crate::schedule::DailyRotation;
use crate::selector::MissionSelector;

const UNTITLED_REFLECTION: &str = "New growth reflection";

/// A reflection the recorder is waiting on, tied to the mission it is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OpenReflection {
    mission: Option<Mission>,
    draft: ReflectionDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    today: NaiveDate,
    catalog: MissionCatalog,
    selector: MissionSelector,
    outcome: MissionOutcome,
    #[serde(default)]
    open_reflection: Option<OpenReflection>,
    reflections: ReflectionLog,
    progression: Progression,
    profile: UserProfile,
    #[serde(default)]
    user_type_completed: bool,
    groups: GroupDirectory,
    goals: GoalBook,
    rotation: DailyRotation,
    #[serde(default)]
    event_seq: u32,
}

impl Session {
    /// Fresh session positioned on the rotation's mission for `today`.
    #[must_use]
    pub fn new(today: NaiveDate, catalog: MissionCatalog, profile: UserProfile, seed: u64) -> Self {
        let mut selector = MissionSelector::new(&catalog);
        if let Some(bias) = profile.bias_type() {
            selector.apply_personality_bias(bias);
        }
        let rotation = DailyRotation::new(seed);
        if let Some(idx) = rotation.start_index(today, selector.len()) {
            selector.select_index(idx);
        }
        let user_type_completed = profile.current_type.is_some();
        Self {
            today,
            catalog,
            selector,
            outcome: MissionOutcome::new(),
            open_reflection: None,
            reflections: ReflectionLog::empty(),
            progression: Progression::new(),
            profile,
            user_type_completed,
            groups: GroupDirectory::sample(),
            goals: GoalBook::sample(),
            rotation,
            event_seq: 0,
        }
    }

    /// Replace the progression state, e.g. when restoring from elsewhere.
    #[must_use]
    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.progression = progression;
        self
    }

    /// Override whether the quiz counts as done, e.g. from a stored flag.
    #[must_use]
    pub fn with_user_type_completed(mut self, completed: bool) -> Self {
        self.user_type_completed = completed;
        self
    }

    #[must_use]
    pub fn with_groups(mut self, groups: GroupDirectory) -> Self {
        self.groups = groups;
        self
    }

    #[must_use]
    pub fn with_goals(mut self, goals: GoalBook) -> Self {
        self.goals = goals;
        self
    }

    fn emit(&mut self, kind: EventKind) -> SessionEvent {
        let event = SessionEvent::new(self.event_seq, self.today, kind);
        self.event_seq = self.event_seq.wrapping_add(1);
        event
    }

    // Day ------------------------------------------------------------------

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Roll over to `day`: the outcome resets, any open reflection is dropped
    /// and the selector jumps to that day's rotation slot.
    pub fn start_day(&mut self, day: NaiveDate) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.open_reflection.take().is_some() {
            events.push(self.emit(EventKind::ReflectionDiscarded));
        }
        self.today = day;
        self.outcome = MissionOutcome::new();
        if let Some(idx) = self.rotation.start_index(day, self.selector.len()) {
            self.selector.select_index(idx);
        }
        let mission = self.selector.current().map(|m| m.id.clone());
        log::info!("started day {day} on mission {mission:?}");
        events.push(self.emit(EventKind::DayStarted { mission }));
        events
    }

    // Missions -------------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> &MissionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn selector(&self) -> &MissionSelector {
        &self.selector
    }

    #[must_use]
    pub fn current_mission(&self) -> Option<&Mission> {
        self.selector.current()
    }

    pub fn cycle_mission(&mut self) -> Option<&Mission> {
        self.selector.cycle_next()
    }

    #[must_use]
    pub fn alternatives(&self, count: usize) -> Vec<&Mission> {
        self.selector.alternatives(count)
    }

    /// The alternatives shown beside the day's mission, never including it.
    #[must_use]
    pub fn suggested_alternatives(&self) -> Vec<&Mission> {
        let room = self.selector.len().saturating_sub(1);
        self.selector.alternatives(DEFAULT_ALTERNATIVES.min(room))
    }

    pub fn select_mission(&mut self, id: &MissionId) -> bool {
        self.selector.select_by_id(id)
    }

    /// Add a custom mission to the catalog and the active rotation.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] when the title is blank.
    pub fn add_custom_mission(
        &mut self,
        title: &str,
        category: Category,
    ) -> Result<Mission, ValidationError> {
        let mission = self.catalog.add_custom_mission(title, category)?;
        self.selector.push_custom(mission.clone());
        Ok(mission)
    }

    // Outcome --------------------------------------------------------------

    #[must_use]
    pub const fn outcome(&self) -> MissionStatus {
        self.outcome.status()
    }

    pub fn on_mission_complete(&mut self) -> Vec<SessionEvent> {
        let transition = self.outcome.complete();
        self.after_settle(transition)
    }

    pub fn on_mission_failed(&mut self) -> Vec<SessionEvent> {
        let transition = self.outcome.fail();
        self.after_settle(transition)
    }

    fn after_settle(&mut self, transition: Transition) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !transition.changed() {
            return events;
        }
        events.push(self.emit(EventKind::OutcomeChanged {
            from: transition.from,
            to: transition.to,
        }));
        if transition.prompts_reflection() {
            self.open_reflection = Some(OpenReflection {
                mission: self.selector.current().cloned(),
                draft: ReflectionDraft::new(transition.to),
            });
            events.push(self.emit(EventKind::ReflectionRequested {
                status: transition.to,
            }));
        }
        events
    }

    /// Reset the outcome to pending. Recorded reflections stay; an unfinished
    /// draft is discarded.
    pub fn on_mission_cancel(&mut self) -> Vec<SessionEvent> {
        let mut events = self.close_reflection();
        let transition = self.outcome.cancel();
        if transition.changed() {
            events.push(self.emit(EventKind::OutcomeChanged {
                from: transition.from,
                to: transition.to,
            }));
        }
        events
    }

    // Reflection -----------------------------------------------------------

    #[must_use]
    pub fn draft(&self) -> Option<&ReflectionDraft> {
        self.open_reflection.as_ref().map(|open| &open.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut ReflectionDraft> {
        self.open_reflection.as_mut().map(|open| &mut open.draft)
    }

    /// Close the recorder without saving. The outcome is left as is.
    pub fn close_reflection(&mut self) -> Vec<SessionEvent> {
        match self.open_reflection.take() {
            Some(open) => {
                open.draft.discard();
                vec![self.emit(EventKind::ReflectionDiscarded)]
            }
            None => Vec::new(),
        }
    }

    /// Submit the open draft through the three-step recorder.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoActiveReflection`] when nothing is open, otherwise
    /// whatever the draft refuses with. A refused draft stays open.
    pub fn submit_draft(&mut self) -> Result<Vec<SessionEvent>, ValidationError> {
        let open = self
            .open_reflection
            .as_ref()
            .ok_or(ValidationError::NoActiveReflection)?;
        let composed = open.draft.clone().submit()?;
        let mission = self.open_reflection.take().and_then(|open| open.mission);
        Ok(self.record(mission, composed.status, composed.text))
    }

    /// Record already-composed reflection text for the open outcome.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoActiveReflection`] when no outcome is awaiting a
    /// reflection and [`ValidationError::EmptyField`] for blank text.
    pub fn on_reflection_submit(
        &mut self,
        text: &str,
    ) -> Result<Vec<SessionEvent>, ValidationError> {
        let status = self
            .open_reflection
            .as_ref()
            .map(|open| open.draft.outcome())
            .ok_or(ValidationError::NoActiveReflection)?;
        let text = ValidationError::require_owned("reflection", text)?;
        let mission = self.open_reflection.take().and_then(|open| open.mission);
        Ok(self.record(mission, status.into(), text))
    }

    fn record(
        &mut self,
        mission: Option<Mission>,
        status: ReflectionStatus,
        body: String,
    ) -> Vec<SessionEvent> {
        let (title, category, difficulty) = mission.map_or_else(
            || (UNTITLED_REFLECTION.to_string(), Category::Mindset, None),
            |m| (m.title, m.category, m.difficulty),
        );
        let mut events = Vec::new();
        let recorded = self.reflections.record(NewReflection {
            title,
            category,
            date: self.today,
            visibility: Visibility::Public,
            status,
            is_owner: true,
            body,
        });
        let id = match recorded {
            Ok(id) => id,
            Err(err) => {
                log::warn!("reflection not recorded: {err}");
                return events;
            }
        };
        events.push(self.emit(EventKind::ReflectionRecorded { id, status }));

        let outcome = match status {
            ReflectionStatus::Completed => MissionStatus::Completed,
            ReflectionStatus::Failed => MissionStatus::Failed,
            ReflectionStatus::InProgress => return events,
        };
        let update = self.progression.award(outcome, difficulty);

        events.push(self.emit(EventKind::ExperienceGained {
            amount: update.gained,
            experience: self.progression.experience(),
        }));
        if let Some(level) = update.level_up {
            events.push(self.emit(EventKind::LevelUp {
                level,
                title: level_title(level).to_string(),
                announce_after: LEVEL_UP_ANNOUNCE_DELAY,
            }));
        }
        if outcome == MissionStatus::Completed {
            events.push(self.emit(EventKind::StreakExtended {
                streak: update.streak,
            }));
        }
        for achievement in update.unlocked {
            events.push(self.emit(EventKind::AchievementUnlocked { achievement }));
        }
        events
    }

    #[must_use]
    pub fn reflections(&self) -> &ReflectionLog {
        &self.reflections
    }

    /// History access for edits, comments and likes.
    pub fn reflections_mut(&mut self) -> &mut ReflectionLog {
        &mut self.reflections
    }

    #[must_use]
    pub fn report(&self) -> GrowthReport {
        GrowthReport::build(&self.reflections, self.today)
    }

    // Progress and profile -------------------------------------------------

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    #[must_use]
    pub const fn user_type_completed(&self) -> bool {
        self.user_type_completed
    }

    /// Store the quiz result and bias recommendations toward it.
    pub fn on_user_type_complete(
        &mut self,
        current: PersonalityType,
        target: Option<PersonalityType>,
    ) -> Vec<SessionEvent> {
        self.profile.current_type = Some(current);
        self.profile.target_type = target;
        self.user_type_completed = true;
        if let Some(bias) = self.profile.bias_type() {
            self.selector.apply_personality_bias(bias);
        }
        log::info!("personality set: current {current}, target {target:?}");
        let event = self.emit(EventKind::PersonalityAssigned { current, target });
        vec![event]
    }

    // Groups and goals -----------------------------------------------------

    #[must_use]
    pub fn groups(&self) -> &GroupDirectory {
        &self.groups
    }

    /// Join by listed id, falling back to treating the input as an invite code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::PrivateGroup`] for a private listing and
    /// [`ValidationError::UnknownGroup`] when neither id nor code matches.
    pub fn on_group_join(&mut self, group_id: &str) -> Result<Vec<SessionEvent>, ValidationError> {
        let member = self.profile.id.clone();
        let joined = match self.groups.join(group_id, &member) {
            Ok(group) => group.id.clone(),
            Err(ValidationError::UnknownGroup(_)) => {
                self.groups.join_with_code(group_id, &member)?.id.clone()
            }
            Err(err) => return Err(err),
        };
        Ok(vec![self.emit(EventKind::GroupJoined { group_id: joined })])
    }

    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] when the name is blank.
    pub fn on_group_create(
        &mut self,
        name: &str,
        is_family: bool,
    ) -> Result<Vec<SessionEvent>, ValidationError> {
        let owner = self.profile.id.clone();
        let group = self.groups.create(name, "", is_family, &owner)?;
        let kind = EventKind::GroupCreated {
            group_id: group.id.clone(),
            name: group.name.clone(),
            is_family,
        };
        Ok(vec![self.emit(kind)])
    }

    #[must_use]
    pub fn goals(&self) -> &GoalBook {
        &self.goals
    }

    pub fn goals_mut(&mut self) -> &mut GoalBook {
        &mut self.goals
    }

    // Persistence ----------------------------------------------------------

    /// Whole-session JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// # Errors
    ///
    /// Returns an error if `json` is not a session document.
    pub fn restore(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn session() -> Session {
        Session::new(
            day(2),
            MissionCatalog::builtin(),
            UserProfile::default(),
            11,
        )
    }

    fn fill_draft(session: &mut Session) {
        let draft = session.draft_mut().unwrap();
        draft.set_answer("uneasy");
        draft.next().unwrap();
        draft.set_answer("relieved");
        draft.next().unwrap();
        draft.set_answer("small steps count");
    }

    #[test]
    fn suggested_alternatives_skip_current_and_shrink() {
        let session = session();
        let current = session.current_mission().unwrap().id.clone();
        let alts = session.suggested_alternatives();
        assert_eq!(alts.len(), DEFAULT_ALTERNATIVES);
        assert!(alts.iter().all(|m| m.id != current));

        let single = MissionCatalog::from_missions(vec![Mission::new(
            "only",
            "Only one",
            "",
            Category::Mindset,
            None,
        )]);
        let lonely = Session::new(day(2), single, UserProfile::default(), 1);
        assert!(lonely.suggested_alternatives().is_empty());
    }

    #[test]
    fn complete_opens_reflection_once() {
        let mut session = session();
        let events = session.on_mission_complete();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1].kind, EventKind::ReflectionRequested { .. }));
        assert!(session.draft().is_some());

        assert!(session.on_mission_complete().is_empty());
        assert!(session.on_mission_failed().is_empty());
        assert_eq!(session.outcome(), MissionStatus::Completed);
    }

    #[test]
    fn reflection_records_and_awards_once() {
        let mut session = session();
        session.on_mission_complete();
        fill_draft(&mut session);
        let events = session.submit_draft().unwrap();
        assert!(matches!(events[0].kind, EventKind::ReflectionRecorded { .. }));
        assert_eq!(session.progression().experience(), 15);
        assert_eq!(session.progression().streak(), 1);
        assert_eq!(session.reflections().len(), 1);
        assert!(session.draft().is_none());

        let entry = &session.reflections().entries()[0];
        assert_eq!(entry.status, ReflectionStatus::Completed);
        assert_eq!(
            Some(&entry.title),
            session.current_mission().map(|m| &m.title)
        );

        // repeated settle requests neither reopen the recorder nor pay again
        assert!(session.on_mission_complete().is_empty());
        assert_eq!(
            session.on_reflection_submit("again"),
            Err(ValidationError::NoActiveReflection)
        );
        assert_eq!(session.progression().experience(), 15);
    }

    #[test]
    fn redone_outcome_after_cancel_is_rewarded() {
        let mut session = session();
        session.on_mission_complete();
        session.on_reflection_submit("one").unwrap();
        assert_eq!(session.progression().experience(), 15);

        session.on_mission_cancel();
        session.on_mission_failed();
        let events = session.on_reflection_submit("two").unwrap();
        assert!(events.iter().any(|e| matches!(
            e.kind,
            EventKind::ExperienceGained { amount: 8, .. }
        )));
        assert_eq!(session.progression().experience(), 23);
        assert_eq!(session.reflections().len(), 2);
        assert_eq!(session.progression().streak(), 1);
    }

    #[test]
    fn failed_reflection_keeps_streak() {
        let mut session = session();
        session.on_mission_failed();
        let events = session.on_reflection_submit("tried my best").unwrap();
        assert!(events.iter().any(|e| matches!(
            e.kind,
            EventKind::ExperienceGained { amount: 8, .. }
        )));
        assert_eq!(session.progression().streak(), 0);
        assert_eq!(
            session.reflections().entries()[0].status,
            ReflectionStatus::Failed
        );
    }

    #[test]
    fn level_up_event_carries_delay() {
        let mut session = Session::new(day(2), MissionCatalog::builtin(), UserProfile::default(), 3)
            .with_progression(Progression::with_state(1, 90, 0));
        session.on_mission_complete();
        let events = session.on_reflection_submit("done").unwrap();
        let level_up = events
            .iter()
            .find_map(|e| match &e.kind {
                EventKind::LevelUp {
                    level,
                    announce_after,
                    ..
                } => Some((*level, *announce_after)),
                _ => None,
            })
            .unwrap();
        assert_eq!(level_up, (2, LEVEL_UP_ANNOUNCE_DELAY));
        assert_eq!(session.progression().experience(), 0);
    }

    #[test]
    fn submit_without_outcome_is_rejected() {
        let mut session = session();
        assert_eq!(
            session.on_reflection_submit("text"),
            Err(ValidationError::NoActiveReflection)
        );
        assert_eq!(
            session.submit_draft(),
            Err(ValidationError::NoActiveReflection)
        );
        session.on_mission_complete();
        assert_eq!(
            session.on_reflection_submit("   "),
            Err(ValidationError::EmptyField {
                field: "reflection"
            })
        );
        assert_eq!(session.submit_draft(), Err(ValidationError::NotFinalStep));
        assert!(session.draft().is_some());
        assert!(session.reflections().is_empty());
    }

    #[test]
    fn closing_reflection_keeps_outcome() {
        let mut session = session();
        session.on_mission_failed();
        let events = session.close_reflection();
        assert!(matches!(events[0].kind, EventKind::ReflectionDiscarded));
        assert_eq!(session.outcome(), MissionStatus::Failed);
        assert!(session.draft().is_none());
    }

    #[test]
    fn new_day_resets_outcome_and_allows_reward() {
        let mut session = session();
        session.on_mission_complete();
        session.on_reflection_submit("one").unwrap();
        let events = session.start_day(day(3));
        assert!(matches!(events.last().unwrap().kind, EventKind::DayStarted { .. }));
        assert_eq!(session.outcome(), MissionStatus::Pending);
        session.on_mission_complete();
        session.on_reflection_submit("two").unwrap();
        assert_eq!(session.progression().experience(), 30);
        assert_eq!(session.progression().streak(), 2);
    }

    #[test]
    fn rotation_is_stable_per_day() {
        let a = session();
        let b = session();
        assert_eq!(
            a.current_mission().map(|m| m.id.clone()),
            b.current_mission().map(|m| m.id.clone())
        );
    }

    #[test]
    fn user_type_biases_selector() {
        let mut session = session();
        assert!(!session.user_type_completed());
        session.on_user_type_complete(PersonalityType::Steady, Some(PersonalityType::Explorer));
        assert!(session.user_type_completed());
        assert_eq!(session.selector().bias(), Some(PersonalityType::Explorer));
        assert_eq!(
            session.current_mission().unwrap().category,
            Category::Recommended
        );
    }

    #[test]
    fn group_join_falls_back_to_invite_code() {
        let mut session = session();
        assert_eq!(
            session.on_group_join("group3"),
            Err(ValidationError::PrivateGroup("group3".into()))
        );
        let events = session.on_group_join("MIND-0003").unwrap();
        assert!(matches!(
            &events[0].kind,
            EventKind::GroupJoined { group_id } if group_id == "group3"
        ));
        let created = session.on_group_create("Home", true).unwrap();
        assert!(matches!(
            &created[0].kind,
            EventKind::GroupCreated { is_family: true, .. }
        ));
        assert!(session.on_group_create(" ", false).is_err());
    }

    #[test]
    fn snapshot_restores_open_reflection() {
        let mut session = session();
        session.on_mission_complete();
        fill_draft(&mut session);
        let json = session.snapshot().unwrap();
        let mut restored = Session::restore(&json).unwrap();
        assert_eq!(restored, session);
        restored.submit_draft().unwrap();
        assert_eq!(restored.reflections().len(), 1);
    }

    #[test]
    fn custom_mission_is_selectable() {
        let mut session = session();
        let mission = session
            .add_custom_mission("Stretch at noon", Category::NewChallenge)
            .unwrap();
        assert!(session.select_mission(&mission.id));
        assert_eq!(session.catalog().len(), MissionCatalog::builtin().len() + 1);
    }
}
