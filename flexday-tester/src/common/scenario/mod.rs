use anyhow::Result;
use chrono::NaiveDate;
use flexday_core::{MissionCatalog, Session, UserProfile};
use rand_chacha::ChaCha20Rng;

pub mod flows;
pub mod properties;

/// Inputs handed to one scenario iteration.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub start: NaiveDate,
    pub catalog: MissionCatalog,
    pub rng: ChaCha20Rng,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// Fresh session on the context's start date with a default profile.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(
            self.start,
            self.catalog.clone(),
            UserProfile::default(),
            self.seed,
        )
    }
}

/// A check returns a one-line note on what it exercised.
pub type ScenarioCheck = fn(&mut ScenarioCtx) -> Result<String>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub check: ScenarioCheck,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, check: ScenarioCheck) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::new("Smoke Test", flows::smoke),
        "cyclic-selector" | "cycle" => {
            TestScenario::new("Cyclic Mission Selector", properties::cyclic_selector)
        }
        "alternatives-exclusion" | "alternatives" => TestScenario::new(
            "Alternatives Exclude Current",
            properties::alternatives_exclusion,
        ),
        "classifier-dominance" | "classifier" => TestScenario::new(
            "Personality Classifier Dominance",
            properties::classifier_dominance,
        ),
        "progression-rule" | "progression" => {
            TestScenario::new("Level Rollover Rule", properties::progression_rule)
        }
        "idempotent-outcome" | "outcome" => TestScenario::new(
            "Idempotent Outcome Transitions",
            properties::idempotent_outcome,
        ),
        "daily-rotation" | "rotation" => {
            TestScenario::new("Deterministic Daily Rotation", properties::daily_rotation)
        }
        "reflection-gating" | "reflection" => {
            TestScenario::new("Reflection Step Gating", flows::reflection_gating)
        }
        "full-week" | "week" => TestScenario::new("Full Week of Missions", flows::full_week),
        "persistence" | "save" => TestScenario::new("Session Persistence", flows::persistence),
        "community" | "groups" => TestScenario::new("Groups and Goals", flows::community),
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("cyclic-selector", "Cyclic Mission Selector"),
        ("alternatives-exclusion", "Alternatives Exclude Current"),
        ("classifier-dominance", "Personality Classifier Dominance"),
        ("progression-rule", "Level Rollover Rule"),
        ("idempotent-outcome", "Idempotent Outcome Transitions"),
        ("daily-rotation", "Deterministic Daily Rotation"),
        ("reflection-gating", "Reflection Step Gating"),
        ("full-week", "Full Week of Missions"),
        ("persistence", "Session Persistence"),
        ("community", "Groups and Goals"),
    ]
}
