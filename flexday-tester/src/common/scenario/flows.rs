//! End-to-end flows driven through [`Session`] and [`FlexdayEngine`].
use anyhow::{Context, Result, bail, ensure};
use chrono::Days;
use flexday_core::constants::{EXPERIENCE_CAP, STARTING_LEVEL};
use flexday_core::{
    Category, EventKind, FlexdayEngine, GoalDraft, KEY_SESSION, KEY_USER_PROFILE, MissionStatus,
    ReflectionStep, Session, ValidationError, experience_for,
};
use rand::Rng;

use super::ScenarioCtx;
use crate::common::store::{MemoryStore, PreloadedCatalog};

const ANSWERS: [&str; 3] = ["a little nervous", "lighter than expected", "start smaller"];

/// Walk the open draft through all three prompts and submit it.
fn reflect(session: &mut Session) -> Result<Vec<flexday_core::SessionEvent>> {
    let draft = session.draft_mut().context("no reflection open")?;
    for (idx, answer) in ANSWERS.iter().enumerate() {
        draft.set_answer(*answer);
        if idx + 1 < ANSWERS.len() {
            draft.next()?;
        }
    }
    Ok(session.submit_draft()?)
}

fn settle(session: &mut Session, status: MissionStatus) -> Vec<flexday_core::SessionEvent> {
    match status {
        MissionStatus::Failed => session.on_mission_failed(),
        _ => session.on_mission_complete(),
    }
}

pub fn smoke(ctx: &mut ScenarioCtx) -> Result<String> {
    let mut session = ctx.session();
    let mission = session
        .current_mission()
        .map(|m| m.title.clone())
        .context("catalog has no missions")?;
    ensure!(
        session.outcome() == MissionStatus::Pending,
        "new day should be pending"
    );
    let current = session.current_mission().map(|m| m.id.clone());
    ensure!(
        session
            .suggested_alternatives()
            .iter()
            .all(|m| Some(&m.id) != current.as_ref()),
        "suggested alternatives repeat the day's mission"
    );

    session.on_mission_complete();
    let events = reflect(&mut session)?;
    ensure!(
        events
            .iter()
            .any(|e| matches!(e.kind, EventKind::ReflectionRecorded { .. })),
        "reflection was not recorded"
    );
    ensure!(
        session.reflections().len() == 1,
        "expected one history entry"
    );
    ensure!(
        session.progression().experience() == experience_for(MissionStatus::Completed),
        "completion should grant {} experience",
        experience_for(MissionStatus::Completed)
    );
    Ok(format!("completed '{mission}'"))
}

pub fn reflection_gating(ctx: &mut ScenarioCtx) -> Result<String> {
    use ValidationError::{NotFinalStep, StepIncomplete};

    let mut session = ctx.session();
    let outcome = if ctx.rng.gen_bool(0.5) {
        MissionStatus::Completed
    } else {
        MissionStatus::Failed
    };
    settle(&mut session, outcome);
    let blank = ctx.rng.gen_range(0..ReflectionStep::ALL.len());

    let draft = session.draft_mut().context("no reflection open")?;
    for (idx, answer) in ANSWERS.iter().enumerate() {
        if idx == blank {
            draft.set_answer("   ");
            ensure!(draft.next().is_err(), "blank step {idx} advanced");
            break;
        }
        draft.set_answer(*answer);
        draft.next()?;
    }
    match session.submit_draft() {
        Err(StepIncomplete { .. } | NotFinalStep) => {}
        other => bail!("draft with blank step {blank} was accepted: {other:?}"),
    }
    ensure!(
        session.reflections().is_empty(),
        "blank draft created an entry"
    );
    ensure!(
        session.progression().experience() == 0,
        "blank draft granted experience"
    );

    let draft = session
        .draft_mut()
        .context("refused draft should stay open")?;
    for answer in &ANSWERS[blank..] {
        draft.set_answer(*answer);
        draft.next()?;
    }
    session.submit_draft()?;
    let entry = session
        .reflections()
        .entries()
        .first()
        .context("filled draft was not recorded")?;
    for (step, answer) in ReflectionStep::ALL.iter().zip(ANSWERS) {
        let line = format!("{}: {answer}", step.label(outcome));
        ensure!(entry.body.contains(&line), "entry is missing '{line}'");
    }
    Ok(format!("{outcome} with blank step {blank}"))
}

pub fn full_week(ctx: &mut ScenarioCtx) -> Result<String> {
    let mut session = ctx.session();
    let days = ctx.rng.gen_range(3..=10_u64);
    let (mut level, mut experience) = (STARTING_LEVEL, 0);
    let (mut streak, mut recorded) = (0, 0);

    for offset in 0..days {
        let today = ctx
            .start
            .checked_add_days(Days::new(offset))
            .context("date out of range")?;
        session.start_day(today);
        let status = if ctx.rng.gen_bool(0.7) {
            MissionStatus::Completed
        } else {
            MissionStatus::Failed
        };
        settle(&mut session, status);
        if ctx.rng.gen_bool(0.2) {
            continue;
        }
        reflect(&mut session)?;
        recorded += 1;
        let gained = experience_for(status);
        if experience + gained >= EXPERIENCE_CAP {
            level += 1;
            experience = 0;
        } else {
            experience += gained;
        }
        if status == MissionStatus::Completed {
            streak += 1;
        }
    }

    let progress = session.progression();
    ensure!(
        (progress.level(), progress.experience()) == (level, experience),
        "progress L{}/{} but expected L{level}/{experience}",
        progress.level(),
        progress.experience()
    );
    ensure!(
        progress.streak() == streak,
        "streak {} != {streak}",
        progress.streak()
    );
    let report = session.report();
    ensure!(
        report.total == recorded,
        "report counts {} of {recorded}",
        report.total
    );
    ensure!(
        report.completed + report.attempted == report.total,
        "report buckets do not add up"
    );
    if ctx.verbose {
        log::info!("week of {days} days: {}", report.praise());
    }
    Ok(format!("{recorded}/{days} days reflected, L{level} {experience}xp"))
}

pub fn persistence(ctx: &mut ScenarioCtx) -> Result<String> {
    let store = MemoryStore::default();
    let engine = FlexdayEngine::new(PreloadedCatalog::new(ctx.catalog.clone()), store.clone());
    let mut session = engine.create_session(ctx.start, ctx.seed)?;
    for _ in 0..ctx.rng.gen_range(0..5) {
        session.cycle_mission();
    }
    settle(&mut session, MissionStatus::Completed);
    reflect(&mut session)?;
    if ctx.rng.gen_bool(0.5) {
        session.on_mission_cancel();
    }

    engine.save_session(&session)?;
    let keys = store.keys();
    ensure!(
        keys.iter().any(|k| k == KEY_SESSION) && keys.iter().any(|k| k == KEY_USER_PROFILE),
        "saved keys were {keys:?}"
    );
    let restored = engine.load_session()?.context("saved session missing")?;
    ensure!(
        restored == session,
        "restored session differs from the saved one"
    );

    engine.clear_session()?;
    ensure!(
        engine.load_session()?.is_none(),
        "cleared session still loads"
    );
    Ok(format!("{} keys stored", keys.len()))
}

pub fn community(ctx: &mut ScenarioCtx) -> Result<String> {
    let mut session = ctx.session();
    match session.on_group_join("group3") {
        Err(ValidationError::PrivateGroup(_)) => {}
        other => bail!("joining a private listing should be refused: {other:?}"),
    }
    session.on_group_join(" mind-0003 ")?;
    ensure!(
        session.groups().get("group3").is_some_and(|g| g.joined),
        "invite code did not join group3"
    );
    let is_family = ctx.rng.gen_bool(0.5);
    session.on_group_create("Evening walkers", is_family)?;
    let created = session
        .groups()
        .groups()
        .last()
        .context("created group missing")?;
    ensure!(
        created.is_family == is_family && created.is_private == is_family,
        "family flag did not carry over"
    );

    let steps = ctx.rng.gen_range(1..=5);
    let mut draft = GoalDraft::new(
        "Speak up more",
        "Voice one idea a day",
        Category::Communication,
    );
    for i in 0..steps {
        draft.add_mission(
            &format!("Idea {i}"),
            "Share one idea",
            Category::Communication,
        )?;
    }
    let goal = session.goals_mut().register(draft)?.clone();
    session.goals_mut().select_active(&goal.id)?;
    for mission in &goal.missions {
        ensure!(
            session.goals_mut().complete_mission(&goal.id, &mission.id)?,
            "step {} was already complete",
            mission.id
        );
    }
    let active = session.goals().active().context("no active goal")?;
    ensure!(
        active.progress_percent() == 100,
        "goal at {}%",
        active.progress_percent()
    );
    Ok(format!("{steps}-step goal, family group {is_family}"))
}
