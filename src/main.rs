//! Physio Simulator - Entry point
//!
//! Headless diagnostic run of the physiological signal engine.
//!
//! CLI Usage:
//!   cargo run                                   # Built-in demo day
//!   cargo run -- --scenario day.json            # Scenario snapshot
//!   cargo run -- --playhead 900 --explain focus # Sample and explain a composite
//!   cargo run -- --disable couplings --export-csv

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use physio_simulator::{
    config::{DebugToggles, EngineParameters, Toggle},
    export::{export_snapshot_json, CsvExporter, ScenarioSnapshot},
    interventions::TimelineItem,
    projections::{ProjectionCatalog, SignalStatus},
    simulation::{SimulationEngine, SimulationGrid, SimulationOptions, MINUTES_PER_DAY},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario snapshot (JSON); defaults to a built-in demo day
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Engine parameters file
    #[arg(long, default_value = "data/parameters/engine.json")]
    params: PathBuf,

    /// Grid step in minutes (overrides scenario and parameters)
    #[arg(long)]
    step: Option<f64>,

    /// Number of simulated days
    #[arg(long)]
    days: Option<u32>,

    /// Minute since grid origin to sample meters, organs and arousal at
    #[arg(short, long, default_value_t = 480.0)]
    playhead: f64,

    /// Print the top contributing signals of a composite
    #[arg(short, long)]
    explain: Option<String>,

    /// Number of signals listed by --explain
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Write the series to exports/ as CSV
    #[arg(long)]
    export_csv: bool,

    /// Write the series to exports/ as JSON
    #[arg(long)]
    export_json: bool,

    /// Disable one contribution (baselines, interventions, conditions,
    /// couplings, auxiliaries, receptors, transporters, enzymes)
    #[arg(short, long)]
    disable: Vec<String>,
}

/// A typical day: breakfast with coffee, a workout, lunch, an evening drink.
fn demo_scenario(step_min: f64) -> ScenarioSnapshot {
    let origin = SimulationGrid::default().origin;
    ScenarioSnapshot::new("Demo day", step_min)
        .with_item(TimelineItem::at_minutes("sleep-am", "sleep", origin, 0.0, 420.0))
        .with_item(
            TimelineItem::at_minutes("breakfast", "food", origin, 450.0, 20.0)
                .with_param("carbSugar", 20.0)
                .with_param("carbStarch", 40.0)
                .with_param("protein", 20.0),
        )
        .with_item(TimelineItem::at_minutes("coffee", "caffeine", origin, 480.0, 15.0).with_param("mg", 100.0))
        .with_item(TimelineItem::at_minutes("sunlight", "sunlight", origin, 510.0, 30.0))
        .with_item(
            TimelineItem::at_minutes("run", "exercise", origin, 1020.0, 45.0).with_param("intensity", 0.7),
        )
        .with_item(
            TimelineItem::at_minutes("lunch", "food", origin, 750.0, 30.0)
                .with_param("carbStarch", 60.0)
                .with_param("fat", 20.0)
                .with_param("fiber", 8.0),
        )
        .with_item(TimelineItem::at_minutes("wine", "alcohol", origin, 1200.0, 60.0).with_param("drinks", 1.0))
        .with_item(TimelineItem::at_minutes("sleep-pm", "sleep", origin, 1380.0, 480.0))
}

fn toggles_from(disable: &[String]) -> Result<DebugToggles> {
    let mut toggles = DebugToggles::default();
    for name in disable {
        let toggle = name.parse::<Toggle>().map_err(anyhow::Error::msg)?;
        toggles.set(toggle, false);
    }
    Ok(toggles)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("=== Physio Simulator - Diagnostics ===\n");

    let params = EngineParameters::load_from(&args.params);
    let engine = SimulationEngine::with_parameters(params.integrator.clone())?;
    let projections = ProjectionCatalog::builtin(engine.signals())?;

    let mut scenario = match &args.scenario {
        Some(path) => ScenarioSnapshot::load(path)?,
        None => demo_scenario(params.grid.step_min).with_subject(params.subject.clone()),
    };
    if let Some(step) = args.step {
        scenario.grid_step_min = step;
    }
    let days = args.days.unwrap_or(params.grid.days).max(1);

    let options = SimulationOptions::with_toggles(toggles_from(&args.disable)?);
    let request = scenario.to_request(days)?.with_options(options);

    println!("Scenario: {} ({} items)", scenario.name, scenario.items.len());
    println!(
        "Grid: {} points, {:.1} min step, {} day(s)",
        request.grid.len, request.grid.step_min, days
    );
    if !args.disable.is_empty() {
        println!("Disabled: {}", args.disable.join(", "));
    }

    let start_time = Instant::now();
    let response = engine.compute(&request);
    let metrics = projections.compute(&response.snapshot);
    let elapsed = start_time.elapsed();

    let diagnostics = &response.diagnostics;
    println!(
        "Computed {} steps in {:.2?} (engine {:.2?})",
        diagnostics.steps, elapsed, diagnostics.elapsed
    );
    if !diagnostics.is_clean() {
        println!(
            "Warnings: {} failed evaluations, {} repaired values, {} clamped forcing, skipped items {:?}, unknown conditions {:?}",
            diagnostics.total_failures(),
            diagnostics.repaired_values,
            diagnostics.clamped_forcing,
            diagnostics.skipped_items,
            diagnostics.unknown_conditions
        );
    }

    let playhead = args.playhead;
    let index = request.grid.index_at(playhead);
    let minute_of_day = playhead.rem_euclid(MINUTES_PER_DAY);
    println!(
        "\n--- Playhead {:.0} min ({:02}:{:02}, grid index {}) ---\n",
        playhead,
        (minute_of_day / 60.0).floor() as u32,
        (minute_of_day % 60.0).floor() as u32,
        index
    );

    println!("Signals:");
    for def in engine.definitions() {
        let value = response.snapshot.value_at(def.key, index);
        let status = SignalStatus::assess(def, value);
        println!(
            "  {:<20} {:>10.2} {:<8} {}",
            def.label,
            value,
            def.unit,
            if status == SignalStatus::Normal { "" } else { status.name() }
        );
    }

    println!("\nMeters:");
    for (key, series) in &metrics.meters {
        println!("  {:<14} {:>6.3}", key, series.value_at(index));
    }

    println!("\nOrgans:");
    for (key, series) in &metrics.organs {
        println!("  {:<14} {:>6.3}", key, series.value_at(index));
    }

    println!("\nArousal:");
    println!("  sympathetic    {:>6.3}", metrics.arousal.sympathetic.value_at(index));
    println!("  parasympathetic{:>6.3}", metrics.arousal.parasympathetic.value_at(index));
    println!(
        "  overall        {:>6.3} ({})",
        metrics.arousal.overall.value_at(index),
        metrics.arousal.state_at(index).name()
    );

    if let Some(key) = &args.explain {
        match projections.get(key) {
            Some(def) => {
                println!("\nTop contributors to '{}':", def.label);
                for (signal, weight) in def.explain(args.top) {
                    println!("  {:<20} {:>+8.3}", signal, weight);
                }
            }
            None => println!("\nUnknown composite '{}'. Available: {}", key, projections.keys().join(", ")),
        }
    }

    if args.export_csv {
        let mut exporter = CsvExporter::new()?;
        exporter.write_snapshot_with(&response.snapshot, Some(&metrics))?;
        let path = exporter.finish()?;
        println!("\nCSV written: {}", path.display());
    }
    if args.export_json {
        let path = export_snapshot_json(&response.snapshot)?;
        println!("JSON written: {}", path.display());
    }

    Ok(())
}
