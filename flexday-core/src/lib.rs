//! Flexday core
//!
//! Platform-agnostic state machine for the Flexday daily-mission habit tracker:
//! mission catalog and selection, outcome tracking, guided reflections,
//! progression, personality classification, groups, goals and reports.
//! No UI and no platform storage; both are injected through the traits below.

pub mod catalog;
pub mod category;
pub mod constants;
pub mod error;
pub mod event;
pub mod goal;
pub mod group;
pub mod numbers;
pub mod outcome;
pub mod personality;
pub mod profile;
pub mod progression;
pub mod reflection;
pub mod report;
pub mod schedule;
pub mod selector;
pub mod session;

use anyhow::Context;
use chrono::NaiveDate;
use std::convert::Infallible;

pub use catalog::{Mission, MissionCatalog, MissionId};
pub use category::{Category, CategoryMeta, Difficulty};
pub use constants::{KEY_SESSION, KEY_USER_PROFILE, KEY_USER_TYPE_COMPLETED};
pub use error::ValidationError;
pub use event::{EventKind, EventSeverity, EventTag, EventTags, SessionEvent, UiSurfaceHint};
pub use goal::{Goal, GoalBook, GoalDraft, GoalMission};
pub use group::{Group, GroupDirectory};
pub use outcome::{MissionOutcome, MissionStatus, Transition};
pub use personality::{
    PersonalityQuiz, PersonalityType, QUESTIONS, Question, QuizPass, QuizResult, QuizStage, Tally,
    TypeInfo, classify,
};
pub use profile::UserProfile;
pub use progression::{Achievement, ProgressUpdate, Progression, experience_for, level_title};
pub use reflection::{
    Comment, CommentKind, ComposedReflection, NewComment, NewReflection, ReflectionDraft,
    ReflectionEntry, ReflectionLog, ReflectionStatus, ReflectionStep, Visibility,
};
pub use report::{CategoryStats, GrowthReport, week_of};
pub use schedule::{DailyRotation, derive_stream_seed};
pub use selector::MissionSelector;
pub use session::Session;

/// Trait for abstracting mission catalog loading.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the mission catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<MissionCatalog, Self::Error>;
}

/// Loader that always yields [`MissionCatalog::builtin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogLoader for BuiltinCatalog {
    type Error = Infallible;

    fn load_catalog(&self) -> Result<MissionCatalog, Self::Error> {
        Ok(MissionCatalog::builtin())
    }
}

/// Trait for the local key-value store holding serialized values.
/// Writes are best-effort and last write wins.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a raw value
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a raw value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove a value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Binds a catalog source and a store to build, persist and restore sessions.
pub struct FlexdayEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
{
    loader: L,
    store: S,
}

impl<L, S> FlexdayEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
    L::Error: Into<anyhow::Error>,
    S::Error: Into<anyhow::Error>,
{
    pub const fn new(loader: L, store: S) -> Self {
        Self { loader, store }
    }

    /// Build a fresh session for `today`, reusing any stored profile.
    ///
    /// The stored quiz flag decides whether the quiz is prompted again.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or a stored profile
    /// or flag cannot be read.
    pub fn create_session(&self, today: NaiveDate, seed: u64) -> anyhow::Result<Session> {
        let catalog = self.loader.load_catalog().map_err(Into::into)?;
        let profile = self.load_profile()?.unwrap_or_default();
        let completed = self.user_type_completed()?;
        let session = Session::new(today, catalog, profile, seed);
        Ok(session.with_user_type_completed(completed))
    }

    /// # Errors
    ///
    /// Returns an error if the store fails or holds invalid JSON.
    pub fn load_profile(&self) -> anyhow::Result<Option<UserProfile>> {
        self.read_json(KEY_USER_PROFILE)
    }

    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    pub fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        self.write_json(KEY_USER_PROFILE, profile)
    }

    /// Whether the personality quiz was finished. Missing means `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds invalid JSON.
    pub fn user_type_completed(&self) -> anyhow::Result<bool> {
        Ok(self.read_json(KEY_USER_TYPE_COMPLETED)?.unwrap_or(false))
    }

    /// # Errors
    ///
    /// Returns an error if the flag cannot be written.
    pub fn set_user_type_completed(&self, completed: bool) -> anyhow::Result<()> {
        self.write_json(KEY_USER_TYPE_COMPLETED, &completed)
    }

    /// Persist the whole session plus the profile entries.
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be written.
    pub fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        self.write_json(KEY_SESSION, session)?;
        self.save_profile(session.profile())?;
        self.set_user_type_completed(session.user_type_completed())?;
        log::debug!("saved session for {}", session.today());
        Ok(())
    }

    /// Restore a saved session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the saved session is corrupt.
    pub fn load_session(&self) -> anyhow::Result<Option<Session>> {
        let session: Option<Session> = self.read_json(KEY_SESSION)?;
        if let Some(session) = &session {
            log::debug!("restored session for {}", session.today());
        }
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns an error if the value cannot be removed.
    pub fn clear_session(&self) -> anyhow::Result<()> {
        self.store.remove(KEY_SESSION).map_err(Into::into)
    }

    fn read_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let Some(raw) = self.store.get(key).map_err(Into::into)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).with_context(|| format!("decoding {key}"))?;
        Ok(Some(value))
    }

    fn write_json<T>(&self, key: &str, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let raw = serde_json::to_string(value).with_context(|| format!("encoding {key}"))?;
        self.store.set(key, &raw).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        values: Rc<RefCell<HashMap<String, String>>>,
    }

    impl KeyValueStore for MemoryStore {
        type Error = Infallible;

        fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), Self::Error> {
            self.values.borrow_mut().remove(key);
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
    }

    #[test]
    fn engine_creates_and_roundtrips_session() {
        let store = MemoryStore::default();
        let engine = FlexdayEngine::new(BuiltinCatalog, store.clone());
        let mut session = engine.create_session(today(), 0xABCD).unwrap();
        session.on_user_type_complete(PersonalityType::Thinker, None);
        session.on_mission_complete();
        session.on_reflection_submit("felt good").unwrap();
        engine.save_session(&session).unwrap();

        let loaded = engine.load_session().unwrap().expect("save exists");
        assert_eq!(loaded, session);
        assert!(engine.user_type_completed().unwrap());
        assert_eq!(
            engine.load_profile().unwrap().unwrap().current_type,
            Some(PersonalityType::Thinker)
        );
        assert!(store.values.borrow().contains_key(KEY_USER_PROFILE));

        engine.clear_session().unwrap();
        assert!(engine.load_session().unwrap().is_none());
    }

    #[test]
    fn missing_flag_defaults_to_false() {
        let engine = FlexdayEngine::new(BuiltinCatalog, MemoryStore::default());
        assert!(!engine.user_type_completed().unwrap());
        assert!(engine.load_profile().unwrap().is_none());
    }

    #[test]
    fn stored_profile_seeds_new_sessions() {
        let engine = FlexdayEngine::new(BuiltinCatalog, MemoryStore::default());
        let mut profile = UserProfile::new("u7", "Sam");
        profile.target_type = Some(PersonalityType::Social);
        profile.current_type = Some(PersonalityType::Steady);
        engine.save_profile(&profile).unwrap();
        engine.set_user_type_completed(true).unwrap();

        let session = engine.create_session(today(), 1).unwrap();
        assert_eq!(session.profile().name, "Sam");
        assert!(session.user_type_completed());
        assert_eq!(session.selector().bias(), Some(PersonalityType::Social));
    }

    #[test]
    fn stored_quiz_flag_gates_new_sessions() {
        let engine = FlexdayEngine::new(BuiltinCatalog, MemoryStore::default());
        let mut profile = UserProfile::new("u8", "Ari");
        profile.current_type = Some(PersonalityType::Explorer);
        engine.save_profile(&profile).unwrap();

        let fresh = engine.create_session(today(), 1).unwrap();
        assert!(!fresh.user_type_completed());

        engine.set_user_type_completed(true).unwrap();
        engine.save_profile(&UserProfile::default()).unwrap();
        let returning = engine.create_session(today(), 1).unwrap();
        assert!(returning.user_type_completed());
    }

    #[test]
    fn corrupt_values_surface_as_errors() {
        let store = MemoryStore::default();
        store.set(KEY_USER_PROFILE, "{not json").unwrap();
        let engine = FlexdayEngine::new(BuiltinCatalog, store);
        let err = engine.load_profile().unwrap_err();
        assert!(err.to_string().contains(KEY_USER_PROFILE));
    }
}
