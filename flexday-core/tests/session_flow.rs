use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::{Days, NaiveDate};
use flexday_core::{
    Achievement, CatalogLoader, CommentKind, EventKind, FlexdayEngine, GoalDraft, KeyValueStore,
    MissionCatalog, MissionStatus, NewComment, PersonalityQuiz, PersonalityType, Progression,
    ReflectionStatus, Session, UserProfile, ValidationError, Visibility, classify,
};

#[derive(Clone, Copy, Default)]
struct JsonFixture;

impl CatalogLoader for JsonFixture {
    type Error = serde_json::Error;

    fn load_catalog(&self) -> Result<MissionCatalog, Self::Error> {
        MissionCatalog::from_json(include_str!("../data/missions.json"))
    }
}

#[derive(Debug)]
struct ReadOnly;

impl fmt::Display for ReadOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("store is read-only")
    }
}

impl std::error::Error for ReadOnly {}

#[derive(Clone, Default)]
struct FlakyStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    read_only: bool,
}

impl KeyValueStore for FlakyStore {
    type Error = ReadOnly;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(ReadOnly);
        }
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

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

fn fresh_session(seed: u64) -> Session {
    Session::new(
        start(),
        MissionCatalog::builtin(),
        UserProfile::default(),
        seed,
    )
}

fn reflect(session: &mut Session, answers: [&str; 3]) -> Vec<flexday_core::SessionEvent> {
    let draft = session.draft_mut().expect("draft open");
    for (idx, answer) in answers.iter().enumerate() {
        draft.set_answer(*answer);
        if idx < 2 {
            draft.next().unwrap();
        }
    }
    session.submit_draft().unwrap()
}

#[test]
fn week_of_missions_builds_history_and_progress() {
    let engine = FlexdayEngine::new(JsonFixture, FlakyStore::default());
    let mut session = engine.create_session(start(), 0x5EED).unwrap();

    for offset in 0..7_u64 {
        let today = start().checked_add_days(Days::new(offset)).unwrap();
        session.start_day(today);
        if offset == 3 {
            session.on_mission_failed();
        } else {
            session.on_mission_complete();
        }
        reflect(&mut session, ["hesitant", "lighter", "start smaller"]);
    }

    let progress = session.progression();
    assert_eq!(progress.level(), 1);
    assert_eq!(progress.experience(), 6 * 15 + 8);
    assert_eq!(progress.streak(), 6);
    assert!(progress.achievements().contains(&Achievement::FirstStep));
    assert!(progress.achievements().contains(&Achievement::Consistency));

    let report = session.report();
    assert_eq!(report.total, 7);
    assert_eq!(report.completed, 6);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.praise(), "Truly impressive!");
    // 2024-04-07 is a Sunday, so the whole run falls in one Monday-based week
    assert_eq!(report.this_week.len(), 7);

    engine.save_session(&session).unwrap();
    let restored = engine.load_session().unwrap().unwrap();
    assert_eq!(restored.reflections().len(), 7);
}

#[test]
fn ninety_experience_plus_completion_levels_up() {
    let catalog = MissionCatalog::builtin();
    let mut session = Session::new(start(), catalog, UserProfile::default(), 5)
        .with_progression(Progression::with_state(1, 90, 0));
    session.on_mission_complete();
    let events = reflect(&mut session, ["a", "b", "c"]);
    assert!(
        events
            .iter()
            .any(|e| matches!(e.kind, EventKind::LevelUp { level: 2, .. }))
    );
    assert_eq!(session.progression().level(), 2);
    assert_eq!(session.progression().experience(), 0);
}

#[test]
fn blank_answer_never_creates_an_entry() {
    let mut session = fresh_session(5);
    session.on_mission_complete();
    for blank_step in 0..3 {
        let draft = session.draft_mut().unwrap();
        while draft.back() != flexday_core::ReflectionStep::BeforeEmotion {}
        for step in 0..3 {
            draft.set_answer(if step == blank_step { "  " } else { "ok" });
            if step == blank_step {
                assert!(draft.next().is_err());
                break;
            }
            draft.next().unwrap();
        }
        assert!(session.submit_draft().is_err());
    }
    assert!(session.reflections().is_empty());
    assert_eq!(session.progression().experience(), 0);
}

#[test]
fn quiz_result_flows_into_profile_and_selector() {
    let mut quiz = PersonalityQuiz::new();
    for choice in [
        PersonalityType::Explorer,
        PersonalityType::Challenger,
        PersonalityType::Explorer,
        PersonalityType::Social,
        PersonalityType::Social,
        PersonalityType::Thinker,
    ] {
        quiz.answer(choice);
    }
    let result = quiz.finish().unwrap();
    assert_eq!(
        result.current,
        classify(&[
            PersonalityType::Explorer,
            PersonalityType::Challenger,
            PersonalityType::Explorer
        ])
        .unwrap()
    );

    let store = FlakyStore::default();
    let engine = FlexdayEngine::new(JsonFixture, store);
    let mut session = engine.create_session(start(), 1).unwrap();
    assert!(!engine.user_type_completed().unwrap());
    session.on_user_type_complete(result.current, Some(result.target));
    engine.save_session(&session).unwrap();

    assert!(engine.user_type_completed().unwrap());
    let next = engine.create_session(start(), 1).unwrap();
    assert!(next.user_type_completed());
    assert_eq!(next.selector().bias(), Some(PersonalityType::Social));
    let first = &next.selector().missions()[0];
    assert!(first.id.as_str().starts_with("rec-social"));
}

#[test]
fn history_edits_comments_and_likes() {
    let mut session = fresh_session(2);
    session.on_mission_complete();
    session.on_reflection_submit("composed text").unwrap();
    let id = session.reflections().entries()[0].id;

    let log = session.reflections_mut();
    log.edit(id, "Said hello", "edited", Visibility::Family)
        .unwrap();
    log.add_comment(
        id,
        NewComment {
            author: "Dad".into(),
            content: "Nice work".into(),
            date: start(),
            kind: CommentKind::Feedback,
            is_family: true,
        },
    )
    .unwrap();
    log.toggle_like(id).unwrap();

    let entry = session.reflections().get(id).unwrap();
    assert_eq!(entry.status, ReflectionStatus::Completed);
    assert_eq!(entry.visibility, Visibility::Family);
    assert_eq!(entry.comments.len(), 1);
    assert_eq!(entry.likes, 1);
    assert_eq!(session.reflections().on_day(start()).len(), 1);
}

#[test]
fn cancel_after_reflection_keeps_history() {
    let mut session = fresh_session(2);
    session.on_mission_complete();
    session.on_reflection_submit("kept").unwrap();
    session.on_mission_cancel();
    assert_eq!(session.outcome(), MissionStatus::Pending);
    assert_eq!(session.reflections().len(), 1);
}

#[test]
fn goals_register_and_activate() {
    let mut session = fresh_session(2);
    let mut draft = GoalDraft::new(
        "Speak up more",
        "Practice voicing ideas",
        flexday_core::Category::Communication,
    );
    draft
        .add_mission(
            "Share one idea",
            "Say one idea in a meeting",
            flexday_core::Category::Communication,
        )
        .unwrap();
    let id = session.goals_mut().register(draft).unwrap().id.clone();
    session.goals_mut().select_active(&id).unwrap();
    assert_eq!(session.goals().active().unwrap().id, id);
    assert_eq!(
        session.goals_mut().register(GoalDraft::default()),
        Err(ValidationError::EmptyField { field: "title" })
    );
}

#[test]
fn storage_failures_surface_through_anyhow() {
    let store = FlakyStore {
        read_only: true,
        ..FlakyStore::default()
    };
    let engine = FlexdayEngine::new(JsonFixture, store);
    let session = engine.create_session(start(), 3).unwrap();
    let err = engine.save_session(&session).unwrap_err();
    assert_eq!(err.to_string(), "store is read-only");
}
