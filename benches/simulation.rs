//! Simulation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use physio_simulator::interventions::TimelineItem;
use physio_simulator::projections::ProjectionCatalog;
use physio_simulator::simulation::{SimulationEngine, SimulationGrid, SimulationRequest};

fn busy_day() -> Vec<TimelineItem> {
    let origin = SimulationGrid::default().origin;
    vec![
        TimelineItem::at_minutes("breakfast", "food", origin, 450.0, 20.0).with_param("carbSugar", 30.0),
        TimelineItem::at_minutes("coffee", "caffeine", origin, 480.0, 15.0).with_param("mg", 150.0),
        TimelineItem::at_minutes("ssri", "sertraline", origin, 500.0, 5.0).with_param("mg", 50.0),
        TimelineItem::at_minutes("run", "exercise", origin, 1020.0, 45.0).with_param("intensity", 0.7),
        TimelineItem::at_minutes("wine", "alcohol", origin, 1200.0, 60.0).with_param("drinks", 2.0),
        TimelineItem::at_minutes("sleep", "sleep", origin, 1380.0, 480.0),
    ]
}

fn bench_baseline_day(c: &mut Criterion) {
    let engine = SimulationEngine::builtin().unwrap();
    let request = SimulationRequest::new(SimulationGrid::default(), Vec::new());

    c.bench_function("baseline_day_5min", |b| b.iter(|| engine.compute(black_box(&request))));
}

fn bench_busy_day_minute_grid(c: &mut Criterion) {
    let engine = SimulationEngine::builtin().unwrap();
    let grid = SimulationGrid::days(SimulationGrid::default().origin, 1.0, 1).unwrap();
    let request = SimulationRequest::new(grid, busy_day());

    c.bench_function("busy_day_1min", |b| b.iter(|| engine.compute(black_box(&request))));
}

fn bench_projections(c: &mut Criterion) {
    let engine = SimulationEngine::builtin().unwrap();
    let catalog = ProjectionCatalog::builtin(engine.signals()).unwrap();
    let grid = SimulationGrid::days(SimulationGrid::default().origin, 1.0, 1).unwrap();
    let snapshot = engine.compute(&SimulationRequest::new(grid, busy_day())).snapshot;

    c.bench_function("projections_1min", |b| b.iter(|| catalog.compute(black_box(&snapshot))));
}

criterion_group!(benches, bench_baseline_day, bench_busy_day_minute_grid, bench_projections);
criterion_main!(benches);
