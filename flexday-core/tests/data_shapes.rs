use chrono::NaiveDate;
use flexday_core::{
    Category, Difficulty, EventKind, MissionCatalog, ReflectionStatus, Session, SessionEvent,
    UserProfile,
};
use serde_json::Value;

fn catalog_json() -> &'static str {
    include_str!("../data/missions.json")
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
}

#[test]
fn shipped_catalog_document_parses() {
    let catalog = MissionCatalog::from_json(catalog_json()).unwrap();
    assert_eq!(catalog.len(), 6);
    for category in Category::CATALOG {
        assert!(
            !catalog.list_missions(Some(*category)).is_empty(),
            "no mission for {category}"
        );
    }
    let unrated = catalog
        .iter()
        .find(|m| m.id.as_str() == "d3")
        .unwrap();
    assert_eq!(unrated.difficulty, None);
    let communication = catalog.list_missions(Some(Category::Communication));
    assert_eq!(communication[1].difficulty, Some(Difficulty::Hard));
    assert!(catalog.iter().all(|m| !m.is_custom));
}

#[test]
fn profile_document_matches_stored_shape() {
    let mut profile = UserProfile::new("u1", "Jordan");
    profile.add_custom_category("Parenting").unwrap();
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["id"], "u1");
    assert_eq!(value["currentType"], Value::Null);
    assert_eq!(value["customCategories"][0], "Parenting");
}

#[test]
fn session_snapshot_uses_camel_case_and_iso_dates() {
    let catalog = MissionCatalog::from_json(catalog_json()).unwrap();
    let mut session = Session::new(day(), catalog, UserProfile::default(), 99);
    session.on_mission_failed();
    session.on_reflection_submit("next time").unwrap();

    let value: Value = serde_json::from_str(&session.snapshot().unwrap()).unwrap();
    assert_eq!(value["today"], "2024-03-18");
    assert_eq!(value["userTypeCompleted"], false);
    assert_eq!(value["outcome"]["status"], "failed");
    let entry = &value["reflections"]["entries"][0];
    assert_eq!(entry["status"], "failed");
    assert_eq!(entry["isOwner"], true);
    assert_eq!(entry["visibility"], "public");
    assert_eq!(entry["date"], "2024-03-18");
}

#[test]
fn reflection_event_shape_is_tagged() {
    let event = SessionEvent::new(
        3,
        day(),
        EventKind::ReflectionRecorded {
            id: 7,
            status: ReflectionStatus::InProgress,
        },
    );
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["kind"]["type"], "reflection_recorded");
    assert_eq!(value["kind"]["status"], "in-progress");
    assert_eq!(value["severity"], "success");
    assert_eq!(value["ui_surface_hint"], "toast");
}
