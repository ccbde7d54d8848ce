use std::path::PathBuf;
use std::sync::Arc;

use services::analytics::{SCREEN_VIEW, SIMULATION_COMPLETE, SIMULATION_START};
use services::progression::{CATALOG_RESULTS_SCREEN, StepProgress};
use services::{Clock, DeepLink, RecordingAnalytics, Screen, SimulationEngine};
use sim_core::model::{
    Answer, Catalog, EngineSettings, InteractionPayload, InteractionType, OutcomeType, ScenarioId,
    Simulation, SimulationMetadata, StepDraft, StepId,
};
use sim_core::time::fixed_now;
use storage::{JsonFileCatalog, Storage};

fn mcq_simulation(title: &str, steps: u64) -> Simulation {
    let steps = (1..=steps)
        .map(|id| {
            StepDraft::new(
                StepId::new(id),
                ScenarioId::new("S1"),
                InteractionType::Mcq,
                format!("{title} question {id}"),
            )
            .with_options(["best", "partial", "wrong", "worse"])
            .into_step()
        })
        .collect();
    Simulation::new(
        SimulationMetadata {
            title: title.into(),
            deliverables: vec![format!("{title} deliverable")],
            ..SimulationMetadata::default()
        },
        Vec::new(),
        steps,
    )
    .unwrap()
}

fn principles_simulation() -> Simulation {
    let mut draft = StepDraft::new(
        StepId::new(1),
        ScenarioId::new("S1"),
        InteractionType::ViolatedPrinciples,
        "Which principles are violated?",
    );
    draft.available_principles = Some(
        ["Specific", "Fair", "Examples", "No age bias", "Format"]
            .map(String::from)
            .to_vec(),
    );
    draft.violated_principle_indices = Some(vec![1, 3]);
    Simulation::new(
        SimulationMetadata {
            title: "Principles".into(),
            ..SimulationMetadata::default()
        },
        Vec::new(),
        vec![draft.into_step()],
    )
    .unwrap()
}

fn engine(catalog: Catalog, seed: u64) -> SimulationEngine {
    SimulationEngine::new(catalog, EngineSettings::seeded(seed))
        .with_clock(Clock::fixed(fixed_now()))
}

/// Display index currently showing canonical option `canonical`.
fn display_of(engine: &SimulationEngine, canonical: usize) -> usize {
    engine
        .state()
        .permutation()
        .display_index(canonical)
        .expect("option is mapped")
}

#[tokio::test]
async fn three_fast_correct_answers_score_thirty() {
    let storage = Storage::in_memory(Catalog::new(vec![mcq_simulation("Screening", 3)]));
    let mut engine = SimulationEngine::load(storage.catalog.as_ref(), EngineSettings::seeded(7))
        .await
        .unwrap()
        .with_clock(Clock::fixed(fixed_now()));

    engine.start_simulation();
    for _ in 0..3 {
        engine.clock_mut().advance_secs(3);
        let display = display_of(&engine, 0);
        let feedback = engine.submit_answer(Answer::Choice(display)).unwrap();
        assert_eq!(feedback.outcome, OutcomeType::Correct);
        assert!(feedback.timed_bonus);
    }

    let state = engine.state();
    assert_eq!(state.score(), 30);
    assert_eq!(state.streak(), 3);
    assert_eq!(state.history().len(), 3);
    assert!(
        state
            .history()
            .entries()
            .iter()
            .all(|entry| entry.outcome == OutcomeType::Correct && entry.points == 10)
    );
    assert_eq!(state.screen(), Screen::Results);
}

#[test]
fn classification_ignores_display_order() {
    for seed in 0..10 {
        let mut engine = engine(Catalog::new(vec![mcq_simulation("Order", 4)]), seed);
        engine.start_simulation();
        for canonical in 0..4 {
            let display = display_of(&engine, canonical);
            let feedback = engine.submit_answer(Answer::Choice(display)).unwrap();
            assert_eq!(
                feedback.outcome,
                OutcomeType::from_canonical_index(Some(canonical))
            );
        }
        assert_eq!(engine.state().score(), 15);
    }
}

#[test]
fn violated_principles_match_as_a_set() {
    let mut engine = engine(
        Catalog::new(vec![principles_simulation(), principles_simulation()]),
        21,
    );
    engine.start_simulation();
    let picks = vec![display_of(&engine, 3), display_of(&engine, 1)];
    let feedback = engine.submit_answer(Answer::Selection(picks)).unwrap();
    assert_eq!(feedback.outcome, OutcomeType::Correct);
    assert_eq!(
        engine.history().entries()[0].submitted_answer,
        "Fair, No age bias"
    );

    engine.continue_to_next();
    engine.start_simulation();
    let picks = vec![display_of(&engine, 1), display_of(&engine, 2)];
    let feedback = engine.submit_answer(Answer::Selection(picks)).unwrap();
    assert_eq!(feedback.outcome, OutcomeType::Incorrect);
    assert_eq!(feedback.percentile, None);
}

#[test]
fn last_step_of_last_simulation_reaches_results() {
    let analytics = RecordingAnalytics::new();
    let mut engine = engine(
        Catalog::new(vec![mcq_simulation("One", 1), mcq_simulation("Two", 2)]),
        5,
    )
    .with_analytics(Arc::new(analytics.clone()));

    engine.start_simulation();
    engine.submit_answer(Answer::Choice(0));
    assert_eq!(engine.state().screen(), Screen::SimResult);
    let review = engine.snapshot().review.expect("review on sim_result");
    assert_eq!(review.summary.total(), 1);
    assert_eq!(review.next_title.as_deref(), Some("Two"));

    engine.continue_to_next();
    assert_eq!(engine.state().screen(), Screen::Start);
    assert!(engine.history().is_empty());

    engine.start_simulation();
    engine.submit_answer(Answer::Choice(0));
    engine.submit_answer(Answer::Choice(0));
    assert_eq!(engine.state().screen(), Screen::Results);

    let snapshot = engine.snapshot();
    let results = snapshot.results.expect("catalog results");
    assert_eq!(results.total_score, engine.state().score());
    assert_eq!(results.simulations.len(), 2);
    assert_eq!(results.last_review.map(|r| r.summary.total()), Some(2));

    let names = analytics.names();
    assert_eq!(
        names.iter().filter(|name| *name == SIMULATION_START).count(),
        2
    );
    assert_eq!(
        names
            .iter()
            .filter(|name| *name == SIMULATION_COMPLETE)
            .count(),
        2
    );
    let last = analytics.events().pop().unwrap();
    assert_eq!(last.name, SCREEN_VIEW);
    assert_eq!(last.property_str("screen_name"), Some(CATALOG_RESULTS_SCREEN));
}

#[test]
fn terminal_screens_ignore_further_events() {
    let mut engine = engine(Catalog::new(vec![mcq_simulation("One", 1)]), 1);
    engine.start_simulation();
    engine.submit_answer(Answer::Choice(0));
    let before = engine.state().clone();

    engine.continue_to_next();
    engine.start_simulation();
    assert_eq!(engine.submit_answer(Answer::Choice(0)), None);
    assert_eq!(engine.state(), &before);
}

#[test]
fn slow_answers_score_but_break_the_streak() {
    let mut engine = engine(Catalog::new(vec![mcq_simulation("Slow", 3)]), 9);
    engine.start_simulation();

    engine.clock_mut().advance_secs(2);
    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    assert_eq!(engine.state().streak(), 1);

    engine.clock_mut().advance_secs(45);
    let feedback = engine
        .submit_answer(Answer::Choice(display_of(&engine, 0)))
        .unwrap();
    assert!(!feedback.timed_bonus);
    assert!(feedback.percentile.is_some_and(|p| (40..60).contains(&p)));
    assert_eq!(engine.state().streak(), 0);
    assert_eq!(engine.state().score(), 20);
}

#[test]
fn review_mode_reattempts_are_transient() {
    let mut engine = SimulationEngine::new(
        Catalog::new(vec![mcq_simulation("Review", 2)]),
        EngineSettings::seeded(4).with_auto_advance(false),
    )
    .with_clock(Clock::fixed(fixed_now()));
    engine.start_simulation();

    engine.submit_answer(Answer::Choice(display_of(&engine, 1)));
    let retry = engine
        .submit_answer(Answer::Choice(display_of(&engine, 0)))
        .unwrap();
    assert!(!retry.first_attempt);
    assert_eq!(retry.points, 0);
    assert_eq!(engine.state().score(), 5);
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.history().entries()[0].outcome, OutcomeType::Partial);

    let snapshot = engine.snapshot();
    assert!(snapshot.step.unwrap().feedback.is_some());

    engine.continue_to_next();
    assert_eq!(engine.state().step_index(), 1);
}

#[test]
fn deep_link_starts_mid_simulation() {
    let mut engine = engine(Catalog::new(vec![mcq_simulation("Deep", 3)]), 2).with_deep_link(
        Some(DeepLink {
            sim_index: 0,
            step_index: Some(1),
        }),
    );
    engine.open();
    assert_eq!(engine.state().screen(), Screen::Step);

    let snapshot = engine.snapshot();
    let step = snapshot.step.unwrap();
    assert_eq!(
        step.progress,
        StepProgress {
            step_number: 2,
            step_total: 3,
            scenario_position: 2,
            scenario_steps: 3,
            is_last_step: false,
        }
    );

    let mut missing = engine_with_link(9);
    missing.open();
    assert_eq!(missing.state().screen(), Screen::NotFound);
    assert!(missing.snapshot().step.is_none());
}

fn engine_with_link(sim_index: usize) -> SimulationEngine {
    engine(Catalog::new(vec![mcq_simulation("Deep", 1)]), 3).with_deep_link(Some(DeepLink {
        sim_index,
        step_index: Some(0),
    }))
}

#[test]
fn streak_badge_shows_from_two() {
    let mut engine = engine(Catalog::new(vec![mcq_simulation("Badge", 3)]), 8);
    engine.start_simulation();
    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    assert!(!engine.snapshot().show_streak_badge);
    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    assert!(engine.snapshot().show_streak_badge);
}

#[tokio::test]
async fn authored_fixture_plays_through() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../storage/fixtures/sample_catalog.json");
    let repo = JsonFileCatalog::new(path);
    let mut engine = SimulationEngine::load(&repo, EngineSettings::seeded(13))
        .await
        .unwrap()
        .with_clock(Clock::fixed(fixed_now()));

    engine.start_simulation();
    let first = engine.snapshot().step.unwrap();
    assert_eq!(first.scenario.map(|s| s.title), Some("The flooded inbox".into()));
    assert!(matches!(
        first.payload,
        InteractionPayload::Choice { ref options, .. } if options.len() == 3
    ));

    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    let bridged = engine.snapshot().step.unwrap();
    assert_eq!(
        bridged.bridge.and_then(|b| b.text).as_deref(),
        Some("The manager signs off on your criteria in ten minutes.")
    );

    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    assert!(engine.snapshot().step.unwrap().bridge.is_none());

    engine.submit_answer(Answer::Selection(vec![
        display_of(&engine, 1),
        display_of(&engine, 3),
    ]));
    engine.submit_answer(Answer::Segment(2));
    assert_eq!(engine.state().screen(), Screen::SimResult);
    assert!(engine.snapshot().review.unwrap().summary.all_correct());

    engine.continue_to_next();
    engine.start_simulation();
    engine.submit_answer(Answer::Choice(display_of(&engine, 0)));
    engine.submit_answer(Answer::Choice(0));
    engine.submit_answer(Answer::Completed);
    engine.submit_answer(Answer::Completed);
    assert_eq!(engine.state().screen(), Screen::Results);
    assert_eq!(engine.state().score(), 80);
}
