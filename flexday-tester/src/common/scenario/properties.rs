//! Randomized checks of the state machine's core invariants.
use std::collections::HashSet;

use anyhow::{Context, Result, ensure};
use chrono::Days;
use flexday_core::constants::EXPERIENCE_CAP;
use flexday_core::{
    Category, DailyRotation, EventKind, Mission, MissionSelector, MissionStatus, PersonalityType,
    Progression, Session, Tally, UserProfile, classify, experience_for,
};
use rand::Rng;

use super::ScenarioCtx;

const MAX_GENERATED_MISSIONS: usize = 24;

fn generated_missions(ctx: &mut ScenarioCtx) -> Vec<Mission> {
    let len = ctx.rng.gen_range(1..=MAX_GENERATED_MISSIONS);
    (0..len)
        .map(|i| {
            let category = Category::CATALOG[ctx.rng.gen_range(0..Category::CATALOG.len())];
            Mission::new(
                format!("gen-{i}"),
                format!("Generated mission {i}"),
                "generated",
                category,
                None,
            )
        })
        .collect()
}

fn random_status(ctx: &mut ScenarioCtx) -> MissionStatus {
    if ctx.rng.gen_bool(0.5) {
        MissionStatus::Completed
    } else {
        MissionStatus::Failed
    }
}

pub fn cyclic_selector(ctx: &mut ScenarioCtx) -> Result<String> {
    let mut empty = MissionSelector::from_missions(Vec::new());
    ensure!(
        empty.cycle_next().is_none(),
        "empty selector should yield no mission"
    );

    let missions = generated_missions(ctx);
    let len = missions.len();
    let mut selector = MissionSelector::from_missions(missions);
    let start = ctx.rng.gen_range(0..len);
    selector.select_index(start);
    let origin = selector.current().map(|m| m.id.clone());

    for step in 1..len {
        let current = selector.cycle_next().map(|m| m.id.clone());
        ensure!(current.is_some(), "cycle returned nothing at step {step}");
        ensure!(
            current != origin,
            "returned to start early at step {step} of {len}"
        );
    }
    selector.cycle_next();
    ensure!(
        selector.current_index() == start,
        "{len} cycles from {start} ended on {}",
        selector.current_index()
    );
    Ok(format!("{len} missions from index {start}"))
}

pub fn alternatives_exclusion(ctx: &mut ScenarioCtx) -> Result<String> {
    let missions = generated_missions(ctx);
    let len = missions.len();
    let mut selector = MissionSelector::from_missions(missions);
    selector.select_index(ctx.rng.gen_range(0..len));
    let count = ctx.rng.gen_range(0..len);

    let current = selector
        .current()
        .map(|m| m.id.clone())
        .context("selector should not be empty")?;
    let alternatives = selector.alternatives(count);
    ensure!(
        alternatives.len() == count,
        "asked for {count} alternatives, got {}",
        alternatives.len()
    );
    ensure!(
        alternatives.iter().all(|m| m.id != current),
        "alternatives include the current mission {current}"
    );
    let unique: HashSet<_> = alternatives.iter().map(|m| m.id.as_str()).collect();
    ensure!(unique.len() == count, "alternatives repeat a mission");
    Ok(format!("{count} of {len}"))
}

pub fn classifier_dominance(ctx: &mut ScenarioCtx) -> Result<String> {
    ensure!(classify(&[]).is_none(), "no answers should give no label");

    let n = ctx.rng.gen_range(1..=12);
    let answers: Vec<PersonalityType> = (0..n)
        .map(|_| PersonalityType::ALL[ctx.rng.gen_range(0..PersonalityType::ALL.len())])
        .collect();
    let winner = classify(&answers).context("answers must classify")?;
    let tally = Tally::from_answers(&answers);
    let best = PersonalityType::ALL
        .iter()
        .map(|label| tally.count(*label))
        .max()
        .unwrap_or(0);
    ensure!(
        tally.count(winner) == best,
        "{winner} has {} answers but the maximum is {best}",
        tally.count(winner)
    );

    let first_seen = |label: PersonalityType| answers.iter().position(|a| *a == label);
    for label in PersonalityType::ALL.iter().copied() {
        if label != winner && tally.count(label) == best {
            ensure!(
                first_seen(winner) < first_seen(label),
                "tie between {winner} and {label} should go to the earlier answer"
            );
        }
    }
    Ok(format!("{winner} from {n} answers"))
}

pub fn progression_rule(ctx: &mut ScenarioCtx) -> Result<String> {
    let level = ctx.rng.gen_range(1..=20);
    let experience = ctx.rng.gen_range(0..EXPERIENCE_CAP);
    let status = random_status(ctx);
    let mut progress = Progression::with_state(level, experience, 0);
    progress.award(status, None);

    let gained = experience_for(status);
    let (want_level, want_xp) = if experience + gained >= EXPERIENCE_CAP {
        (level + 1, 0)
    } else {
        (level, experience + gained)
    };
    ensure!(
        progress.level() == want_level && progress.experience() == want_xp,
        "L{level}/{experience} + {status} gave L{}/{} (want L{want_level}/{want_xp})",
        progress.level(),
        progress.experience()
    );
    ensure!(
        progress.experience() < EXPERIENCE_CAP,
        "experience reached the cap"
    );
    Ok(format!("L{level}/{experience} -> L{want_level}/{want_xp}"))
}

pub fn idempotent_outcome(ctx: &mut ScenarioCtx) -> Result<String> {
    let mut session = ctx.session();
    let ops = ctx.rng.gen_range(1..=12);
    let (mut prompts, mut submissions, mut grants) = (0_usize, 0_usize, 0_usize);

    for op in 0..ops {
        let before = session.outcome();
        let (events, requested) = match ctx.rng.gen_range(0..3) {
            0 => (session.on_mission_complete(), MissionStatus::Completed),
            1 => (session.on_mission_failed(), MissionStatus::Failed),
            _ => (session.on_mission_cancel(), MissionStatus::Pending),
        };
        // a settled outcome ignores further settle requests until cancelled
        let target = if before.is_terminal() && requested.is_terminal() {
            before
        } else {
            requested
        };
        ensure!(
            session.outcome() == target,
            "op {op}: expected {target}, outcome is {}",
            session.outcome()
        );
        let changed = events
            .iter()
            .any(|e| matches!(e.kind, EventKind::OutcomeChanged { .. }));
        ensure!(
            changed == (before != target),
            "op {op}: {before} -> {target} reported change={changed}"
        );
        if changed && target.is_terminal() {
            prompts += 1;
            ensure!(
                session.draft().is_some(),
                "op {op}: settled without a reflection prompt"
            );
        }

        if session.draft().is_some() && ctx.rng.gen_bool(0.5) {
            let events = session.on_reflection_submit("noted")?;
            submissions += 1;
            grants += events
                .iter()
                .filter(|e| matches!(e.kind, EventKind::ExperienceGained { .. }))
                .count();
        }
    }
    ensure!(
        submissions <= prompts,
        "{submissions} reflections from {prompts} settled outcomes"
    );
    ensure!(
        grants == submissions,
        "experience granted {grants} times for {submissions} reflections"
    );
    Ok(format!("{ops} transitions, {submissions} reflections"))
}

pub fn daily_rotation(ctx: &mut ScenarioCtx) -> Result<String> {
    let offset = ctx.rng.gen_range(0..3650);
    let day = ctx
        .start
        .checked_add_days(Days::new(offset))
        .context("date out of range")?;
    let first = Session::new(day, ctx.catalog.clone(), UserProfile::default(), ctx.seed);
    let second = Session::new(day, ctx.catalog.clone(), UserProfile::default(), ctx.seed);
    ensure!(
        first.current_mission() == second.current_mission(),
        "same seed and day picked different missions"
    );

    let expected = DailyRotation::new(ctx.seed).start_index(day, first.selector().len());
    match expected {
        Some(idx) => ensure!(
            idx == first.selector().current_index(),
            "rotation slot {idx} but selector sits at {}",
            first.selector().current_index()
        ),
        None => ensure!(
            first.current_mission().is_none(),
            "empty catalog picked a mission"
        ),
    }
    Ok(format!("{day} -> {expected:?}"))
}
