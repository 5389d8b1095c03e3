//! Projection tests: meters, organ scores and autonomic arousal
//!
//! Tests verify that:
//! - A plain composite is exactly its clamped weighted sum
//! - Overall arousal is the sigmoid of sympathetic minus parasympathetic
//! - Exercise mobilizes the autonomic state
//! - Playhead sampling clamps to the grid and empty series read zero

use physio_simulator::projections::{AutonomicState, CompositeDefinition, DisplayRange, Nonlinearity};
use physio_simulator::signals::sigmoid;
use physio_simulator::{
    ProjectionCatalog, SeriesSnapshot, SignalKey, SimulationEngine, SimulationGrid, SimulationRequest,
    TimelineItem,
};

fn run(timeline: Vec<TimelineItem>) -> (SimulationEngine, SeriesSnapshot) {
    let engine = SimulationEngine::builtin().expect("builtin engine");
    let response = engine.compute(&SimulationRequest::new(SimulationGrid::default(), timeline));
    (engine, response.snapshot)
}

fn exercise(start_min: f64, duration_min: f64, intensity: f64) -> TimelineItem {
    TimelineItem::at_minutes("run", "exercise", SimulationGrid::default().origin, start_min, duration_min)
        .with_param("intensity", intensity)
}

// ============================================================================
// Composites
// ============================================================================

/// A single-signal linear organ score is 0.8 x insulin, clamped to [-1, 1.2]
#[test]
fn test_linear_composite_is_clamped_weighted_sum() {
    let (_, snapshot) = run(vec![TimelineItem::at_minutes(
        "meal",
        "food",
        SimulationGrid::default().origin,
        480.0,
        20.0,
    )
    .with_param("carbSugar", 80.0)]);
    let pancreas = CompositeDefinition::new(
        "pancreas",
        "Pancreas",
        &[(SignalKey::Insulin, 0.8)],
        Nonlinearity::Linear,
        DisplayRange::ORGAN,
    )
    .unwrap();

    let series = pancreas.compute(&snapshot);
    assert_eq!(series.len(), snapshot.len());
    for i in 0..snapshot.len() {
        let expected = (0.8 * snapshot.value_at(SignalKey::Insulin, i)).clamp(-1.0, 1.2);
        assert_eq!(series.value_at(i), expected, "index {}", i);
    }
}

/// Every builtin composite stays inside its display range
#[test]
fn test_builtin_composites_respect_ranges() {
    let (engine, snapshot) = run(vec![exercise(600.0, 60.0, 0.8)]);
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let metrics = catalog.compute(&snapshot);

    for def in catalog.meters.iter().chain(catalog.organs.iter()) {
        let series = metrics
            .meters
            .get(&def.key)
            .or_else(|| metrics.organs.get(&def.key))
            .expect("series for every composite");
        for v in series.series.iter() {
            assert!(
                v >= def.range.min && v <= def.range.max,
                "{} = {} outside [{}, {}]",
                def.key,
                v,
                def.range.min,
                def.range.max
            );
        }
    }
}

/// Explanations rank contributors by absolute weight
#[test]
fn test_explain_top_contributors() {
    let (engine, _) = run(Vec::new());
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let stress = catalog.get("stress").expect("stress meter");

    let top = stress.explain(2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].0, SignalKey::Cortisol, "cortisol carries the largest stress weight");
    assert!(top[0].1.abs() >= top[1].1.abs());
    assert_eq!(stress.explain(100).len(), stress.terms().len());
}

/// Computing projections twice gives identical results
#[test]
fn test_projections_are_idempotent() {
    let (engine, snapshot) = run(vec![exercise(600.0, 60.0, 0.8)]);
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    assert_eq!(catalog.compute(&snapshot), catalog.compute(&snapshot));
}

// ============================================================================
// Arousal
// ============================================================================

/// overall = sigmoid(sympathetic - parasympathetic) at every index, and the
/// state classification follows it
#[test]
fn test_overall_arousal_is_balance_sigmoid() {
    let (engine, snapshot) = run(vec![exercise(600.0, 60.0, 0.8)]);
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let arousal = catalog.compute(&snapshot).arousal;

    let states = arousal.states();
    for i in 0..snapshot.len() {
        let s = arousal.sympathetic.value_at(i);
        let p = arousal.parasympathetic.value_at(i);
        assert_eq!(arousal.overall.value_at(i), sigmoid(s - p), "index {}", i);
        assert_eq!(states[i], AutonomicState::classify(arousal.overall.value_at(i)));
    }
}

/// Hard exercise mobilizes; the small hours do not
#[test]
fn test_exercise_mobilizes() {
    let (engine, snapshot) = run(vec![exercise(600.0, 60.0, 0.8)]);
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let metrics = catalog.compute(&snapshot);

    let grid = &snapshot.grid;
    let window = grid.index_at(630.0)..=grid.index_at(665.0);
    let peak = window
        .clone()
        .map(|i| metrics.arousal.overall.value_at(i))
        .fold(f64::MIN, f64::max);
    assert!(peak > 0.7, "overall arousal peaks at {} during exercise", peak);
    assert!(
        window.clone().any(|i| metrics.arousal.state_at(i) == AutonomicState::Mobilized),
        "no mobilized point between 10:30 and 11:05"
    );
    assert_ne!(metrics.autonomic_state(180.0), AutonomicState::Mobilized, "mobilized at 03:00");
}

// ============================================================================
// Playhead sampling
// ============================================================================

/// Playheads outside the grid clamp to its ends
#[test]
fn test_playhead_clamps_to_grid() {
    let (engine, snapshot) = run(Vec::new());
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let metrics = catalog.compute(&snapshot);
    let last = snapshot.len() - 1;

    assert_eq!(snapshot.sample(SignalKey::Cortisol, -100.0), snapshot.value_at(SignalKey::Cortisol, 0));
    assert_eq!(snapshot.sample(SignalKey::Cortisol, 1.0e9), snapshot.value_at(SignalKey::Cortisol, last));
    assert_eq!(snapshot.value_at(SignalKey::Cortisol, last + 1), 0.0, "out-of-range index reads zero");

    let energy = &metrics.meters["energy"];
    assert_eq!(metrics.meter("energy", -5.0), energy.value_at(0));
    assert_eq!(metrics.meter("energy", 1.0e9), energy.value_at(last));
    assert_eq!(metrics.meter("charisma", 480.0), 0.0, "unknown meter reads zero");
}

/// Projections over an empty snapshot are empty and sample as zero
#[test]
fn test_empty_snapshot_projects_to_zero() {
    let (engine, _) = run(Vec::new());
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let empty_grid = SimulationGrid::new(SimulationGrid::default().origin, 0.0, 5.0, 0);
    let metrics = catalog.compute(&SeriesSnapshot::empty(0, empty_grid));

    assert!(metrics.meters.values().all(|m| m.is_empty()));
    assert_eq!(metrics.meter("energy", 480.0), 0.0);
    assert_eq!(metrics.organ("heart", 480.0), 0.0);
    assert_eq!(metrics.autonomic_state(480.0), AutonomicState::Dorsal);
}
