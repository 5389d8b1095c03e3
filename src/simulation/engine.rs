//! Simulation engine: integrates signals and auxiliaries over a grid.
//!
//! One call to [`SimulationEngine::compute`] is one complete, deterministic
//! pass. Inputs are resolved up front (setpoints, exposure curves, condition
//! adjustments), then every grid step:
//!
//! 1. Pharmacodynamic terms act on receptors, transporters and enzymes
//! 2. Receptor drive and transporter release become production terms
//! 3. Transporter density and enzyme activity scale clearance
//! 4. Cross-signal couplings add drive or scale clearance
//! 5. Each signal relaxes exactly toward its forced target
//! 6. Densities, activities and vesicle reserves adapt
//!
//! Step `i` reads state at `i` and writes state at `i + 1`. Exposure is zero
//! at the dose instant, so a dose that begins at grid point `k` first shows
//! in the series at `k + 2`.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionRegistry, DynamicsAdjustments};
use crate::config::{DebugToggles, IntegratorParameters};
use crate::error::ConfigurationError;
use crate::interventions::{resolve_timeline, InterventionCatalog, ResolvedExposure, TimelineItem};
use crate::pharmacology::{
    hill_fraction, ClearanceRoute, DirectKind, EnzymeKey, Mechanism, ReceptorKey, TargetHandle, TargetRegistry,
    TransporterKey,
};
use crate::signals::{
    AuxiliaryDynamics, AuxiliaryKey, CouplingEffect, SetpointContext, SignalDefinition, SignalKey, SignalRegistry,
    VesicleKey,
};
use crate::signals::auxiliary::{adapt_density, refill_reserve, turnover_activity};
use crate::state::{StateLayout, StatePool};

use super::grid::SimulationGrid;
use super::integrator::{relax_toward, relaxation_step, StepOutcome};
use super::options::{SimulationDiagnostics, SimulationOptions};
use super::series::{Series, SeriesSnapshot};
use super::subject::Subject;

/// Coupling clearance factors never drop below this.
const COUPLING_CLEARANCE_FLOOR: f64 = 0.2;

/// Neutral fallback used when a signal's dynamics fail for one step.
const FALLBACK_TAU_MIN: f64 = 60.0;

/// Everything one computation needs. Copied by value across the worker
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Input generation this request was built from
    pub generation: u64,
    pub grid: SimulationGrid,
    pub timeline: Vec<TimelineItem>,
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub options: SimulationOptions,
}

impl SimulationRequest {
    pub fn new(grid: SimulationGrid, timeline: Vec<TimelineItem>) -> Self {
        Self {
            generation: 0,
            grid,
            timeline,
            subject: Subject::default(),
            options: SimulationOptions::default(),
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_toggles(mut self, toggles: DebugToggles) -> Self {
        self.options.toggles = toggles;
        self
    }
}

/// Result of one computation.
#[derive(Debug, Clone)]
pub struct SimulationResponse {
    pub generation: u64,
    pub snapshot: SeriesSnapshot,
    /// Auxiliary series; empty unless requested
    pub auxiliaries: BTreeMap<AuxiliaryKey, Series>,
    /// Intervention-driven production per signal; empty unless requested
    pub production: BTreeMap<SignalKey, Series>,
    pub diagnostics: SimulationDiagnostics,
}

/// Static model plus integrator settings. Immutable once built; share it
/// behind an `Arc` between threads.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    signals: SignalRegistry,
    definitions: Vec<SignalDefinition>,
    targets: TargetRegistry,
    catalog: InterventionCatalog,
    layout: StateLayout,
    params: IntegratorParameters,
    clearance_routes: Vec<Vec<ClearanceRoute>>,
}

impl SimulationEngine {
    /// Engine over the built-in registries with default integrator settings.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::with_parameters(IntegratorParameters::default())
    }

    /// Engine over the built-in registries.
    pub fn with_parameters(params: IntegratorParameters) -> Result<Self, ConfigurationError> {
        let targets = TargetRegistry::builtin()?;
        let signals = SignalRegistry::builtin(&targets)?;
        let catalog = InterventionCatalog::builtin(&targets)?;
        Ok(Self::new(signals, targets, catalog, params))
    }

    pub fn new(
        signals: SignalRegistry,
        targets: TargetRegistry,
        catalog: InterventionCatalog,
        params: IntegratorParameters,
    ) -> Self {
        let definitions = signals.get_all_definitions();
        let layout = StateLayout::new(signals.auxiliaries().keys().copied());
        let clearance_routes = SignalKey::ALL.iter().map(|&key| targets.clearance_routes(key)).collect();

        log::info!(
            "Simulation engine ready: {} signals ({} explicit), {} auxiliaries, {} interventions",
            definitions.len(),
            signals.explicit_count(),
            layout.auxiliary_count(),
            catalog.len()
        );

        Self {
            signals,
            definitions,
            targets,
            catalog,
            layout,
            params,
            clearance_routes,
        }
    }

    pub fn signals(&self) -> &SignalRegistry {
        &self.signals
    }

    pub fn definitions(&self) -> &[SignalDefinition] {
        &self.definitions
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn catalog(&self) -> &InterventionCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    pub fn parameters(&self) -> &IntegratorParameters {
        &self.params
    }

    /// Run one full pass over the request grid.
    pub fn compute(&self, request: &SimulationRequest) -> SimulationResponse {
        let started = Instant::now();
        let grid = &request.grid;
        let toggles = request.options.toggles;
        let mut diagnostics = SimulationDiagnostics::default();

        if grid.is_empty() || !(grid.step_min.is_finite() && grid.step_min > 0.0) {
            log::debug!("Empty or invalid grid, returning empty snapshot");
            return SimulationResponse {
                generation: request.generation,
                snapshot: SeriesSnapshot::empty(request.generation, grid.clone()),
                auxiliaries: BTreeMap::new(),
                production: BTreeMap::new(),
                diagnostics,
            };
        }

        let n = grid.len;
        let dt = grid.step_min;

        let adjustments = if toggles.enable_conditions {
            let (adjustments, unknown) = ConditionRegistry::adjustments_for(
                request.subject.conditions.iter().map(|c| (c.key.as_str(), c.severity)),
            );
            diagnostics.unknown_conditions = unknown;
            adjustments
        } else {
            DynamicsAdjustments::default()
        };

        let exposure = if toggles.enable_interventions {
            let substep = dt / f64::from(self.params.pk_substeps.max(1));
            resolve_timeline(&self.catalog, &request.timeline, grid, &request.subject, substep)
        } else {
            ResolvedExposure::default()
        };
        diagnostics.skipped_items = exposure.skipped.clone();

        let setpoints = self.setpoint_table(grid, &request.subject, &adjustments, toggles.enable_baselines);
        let aux_baselines = self.auxiliary_baselines(&adjustments);

        let mut state = StatePool::new(&self.layout);
        for (def, setpoint) in self.definitions.iter().zip(&setpoints) {
            let initial = def.initial_value.filter(|v| v.is_finite()).unwrap_or(setpoint[0]);
            state.set_signal(def.key, initial);
        }
        for (slot, &baseline) in aux_baselines.iter().enumerate() {
            state.set(SignalKey::COUNT + slot, baseline);
        }

        let mut signal_out: Vec<Vec<f64>> = vec![Vec::with_capacity(n); SignalKey::COUNT];
        let mut aux_out: Vec<Vec<f64>> = if request.options.include_auxiliaries {
            vec![Vec::with_capacity(n); self.layout.auxiliary_count()]
        } else {
            Vec::new()
        };
        let mut production_out: Vec<Vec<f64>> = if request.options.record_production {
            vec![Vec::with_capacity(n); SignalKey::COUNT]
        } else {
            Vec::new()
        };

        let mut scratch = StepScratch::new();

        for i in 0..n {
            for (s, out) in signal_out.iter_mut().enumerate() {
                out.push(state.get(s));
            }
            for (slot, out) in aux_out.iter_mut().enumerate() {
                out.push(state.get(SignalKey::COUNT + slot));
            }

            scratch.reset();
            self.apply_interventions(i, &exposure, &state, &toggles, &mut scratch);

            for (s, out) in production_out.iter_mut().enumerate() {
                out.push(scratch.forcing[s]);
            }

            if i + 1 == n {
                break;
            }

            self.apply_clearance_routes(&state, &aux_baselines, &toggles, &mut scratch);
            if toggles.enable_couplings {
                self.apply_couplings(&state, &mut scratch);
            }

            for def in &self.definitions {
                let s = def.key.index();
                let clearance = scratch.clearance[s] * adjustments.clearance_factor(def.key);
                let current = state.get(s);
                let next = match relaxation_step(
                    current,
                    setpoints[s][i],
                    def.dynamics.tau_min,
                    scratch.forcing[s],
                    clearance,
                    dt,
                    &self.params,
                ) {
                    StepOutcome::Advanced { value, forcing_clamped } => {
                        if forcing_clamped {
                            diagnostics.clamped_forcing += 1;
                        }
                        value
                    }
                    StepOutcome::NonFinite => {
                        *diagnostics.failed_evaluations.entry(def.key).or_insert(0) += 1;
                        let start = if current.is_finite() { current } else { 0.0 };
                        relax_toward(start, 0.0, FALLBACK_TAU_MIN, dt)
                    }
                };
                state.set(s, if def.non_negative { next.max(0.0) } else { next });
            }

            if toggles.enable_auxiliary_pools {
                self.update_auxiliaries(&mut state, &aux_baselines, &scratch, dt);
            }

            diagnostics.repaired_values += state.repair_non_finite(|idx| {
                if idx < SignalKey::COUNT {
                    let setpoint = setpoints[idx][i + 1];
                    if setpoint.is_finite() {
                        setpoint
                    } else {
                        0.0
                    }
                } else {
                    aux_baselines.get(idx - SignalKey::COUNT).copied().unwrap_or(1.0)
                }
            });
            diagnostics.steps += 1;
        }

        diagnostics.elapsed = started.elapsed();
        if diagnostics.total_failures() > 0 || diagnostics.repaired_values > 0 {
            log::warn!(
                "Generation {}: {} failed evaluations, {} repaired values",
                request.generation,
                diagnostics.total_failures(),
                diagnostics.repaired_values
            );
        }
        log::debug!(
            "Generation {} computed: {} steps, {} PD terms, {} direct terms in {:?}",
            request.generation,
            diagnostics.steps,
            exposure.pd_terms.len(),
            exposure.direct_terms.len(),
            diagnostics.elapsed
        );

        let series = SignalKey::ALL
            .iter()
            .zip(signal_out)
            .map(|(&key, values)| (key, Series::new(values)))
            .collect();
        let auxiliaries = self
            .layout
            .auxiliary_keys()
            .iter()
            .zip(aux_out)
            .map(|(&key, values)| (key, Series::new(values)))
            .collect();
        let production = SignalKey::ALL
            .iter()
            .zip(production_out)
            .map(|(&key, values)| (key, Series::new(values)))
            .collect();

        SimulationResponse {
            generation: request.generation,
            snapshot: SeriesSnapshot::new(request.generation, grid.clone(), series),
            auxiliaries,
            production,
            diagnostics,
        }
    }

    /// Setpoint of every signal at every grid point.
    fn setpoint_table(
        &self,
        grid: &SimulationGrid,
        subject: &Subject,
        adjustments: &DynamicsAdjustments,
        baselines: bool,
    ) -> Vec<Vec<f64>> {
        let contexts: Vec<SetpointContext> = (0..grid.len)
            .map(|i| SetpointContext {
                minute_of_day: grid.minute_of_day(i),
                sex: subject.sex,
                cycle: subject.cycle_position(grid.time_at(i)),
            })
            .collect();

        self.definitions
            .iter()
            .map(|def| {
                let rhythm_gain = if baselines { adjustments.rhythm_factor(def.key) } else { 0.0 };
                let scale = adjustments.setpoint_factor(def.key);
                contexts
                    .iter()
                    .map(|ctx| def.dynamics.setpoint.evaluate(ctx, rhythm_gain) * scale)
                    .collect()
            })
            .collect()
    }

    /// Condition-adjusted baseline of every auxiliary, in layout order.
    fn auxiliary_baselines(&self, adjustments: &DynamicsAdjustments) -> Vec<f64> {
        self.layout
            .auxiliary_keys()
            .iter()
            .map(|key| {
                let baseline = self.signals.auxiliaries().get(key).map(|d| d.baseline).unwrap_or(1.0);
                baseline * adjustments.auxiliary_factor(*key)
            })
            .collect()
    }

    fn auxiliary(&self, state: &StatePool, key: AuxiliaryKey) -> f64 {
        state.auxiliary(&self.layout, key)
    }

    /// Pharmacodynamic and direct intervention terms at grid index `i`.
    fn apply_interventions(
        &self,
        i: usize,
        exposure: &ResolvedExposure,
        state: &StatePool,
        toggles: &DebugToggles,
        scratch: &mut StepScratch,
    ) {
        let at = |values: &[f64]| values.get(i).copied().unwrap_or(0.0);

        // Allosteric modulators first: they rescale the apparent potency of
        // every other ligand at the same receptor.
        if toggles.enable_receptors {
            for term in &exposure.pd_terms {
                if let (TargetHandle::Receptor(key), Mechanism::Pam | Mechanism::Nam) =
                    (term.effect.target, term.effect.mechanism)
                {
                    scratch.potency[key.index()] *= term.effect.potency_factor(at(&term.effect_site));
                }
            }
        }

        for term in &exposure.pd_terms {
            let effect = &term.effect;
            let c = at(&term.effect_site);
            if c <= 0.0 {
                continue;
            }
            match effect.target {
                TargetHandle::Receptor(key) if toggles.enable_receptors => {
                    let Some(receptor) = self.targets.receptor(key) else {
                        continue;
                    };
                    let density = self.auxiliary(state, AuxiliaryKey::ReceptorDensity(key));
                    let (activation, signed) = match effect.mechanism {
                        Mechanism::Agonist => {
                            let occ = hill_fraction(c, effect.half_max / scratch.potency[key.index()], effect.hill);
                            (occ, occ)
                        }
                        Mechanism::Antagonist => {
                            let occ = hill_fraction(c, effect.half_max / scratch.potency[key.index()], effect.hill);
                            (-occ, -occ)
                        }
                        Mechanism::Pam | Mechanism::Nam => {
                            // Shift of the endogenous ligand's own occupancy
                            let Some(ligand) = receptor.endogenous_ligand else {
                                continue;
                            };
                            let level = state.signal(ligand.signal);
                            let factor = effect.potency_factor(c);
                            let delta =
                                hill_fraction(level, ligand.ec50 / factor, 1.0) - hill_fraction(level, ligand.ec50, 1.0);
                            (delta, delta)
                        }
                    };
                    let drive = effect.effect_gain * activation * density;
                    for coupling in &receptor.couplings {
                        scratch.forcing[coupling.signal.index()] += coupling.weight * drive;
                    }
                    scratch.receptor_occupancy[key.index()] += signed;
                }
                TargetHandle::Transporter(key) if toggles.enable_transporters => {
                    let occ = effect.occupancy(c);
                    match effect.mechanism {
                        Mechanism::Agonist => scratch.release[key.index()] += effect.effect_gain * occ,
                        _ => scratch.transporter_remaining[key.index()] *= 1.0 - (effect.effect_gain * occ).clamp(0.0, 1.0),
                    }
                    scratch.transporter_occupancy[key.index()] += occ;
                }
                TargetHandle::Enzyme(key) if toggles.enable_enzymes => {
                    let occ = effect.occupancy(c);
                    match effect.mechanism {
                        Mechanism::Agonist => scratch.enzyme_induction[key.index()] += effect.effect_gain * occ,
                        _ => scratch.enzyme_remaining[key.index()] *= 1.0 - (effect.effect_gain * occ).clamp(0.0, 1.0),
                    }
                }
                _ => {}
            }
        }

        if toggles.enable_transporters {
            for transporter in self.targets.transporters() {
                let release = scratch.release[transporter.key.index()];
                if release <= 0.0 {
                    continue;
                }
                let reserve = match transporter.vesicle {
                    Some(vesicle) => self.auxiliary(state, AuxiliaryKey::VesiclePool(vesicle)).max(0.0),
                    None => 1.0,
                };
                scratch.forcing[transporter.primary.index()] += transporter.release_rate_per_min * release * reserve;
                if let Some(vesicle) = transporter.vesicle {
                    scratch.depletion[vesicle.index()] += transporter.depletion_per_min * release;
                }
            }
        }

        for term in &exposure.direct_terms {
            let value = at(&term.values);
            let s = term.signal.index();
            match term.kind {
                DirectKind::Drive => scratch.forcing[s] += value,
                DirectKind::Clearance => scratch.clearance[s] *= (1.0 + value).max(self.params.clearance_floor),
            }
        }
    }

    /// Transporter and enzyme modulation of clearance.
    fn apply_clearance_routes(
        &self,
        state: &StatePool,
        aux_baselines: &[f64],
        toggles: &DebugToggles,
        scratch: &mut StepScratch,
    ) {
        for (s, routes) in self.clearance_routes.iter().enumerate() {
            for route in routes {
                let factor = match *route {
                    ClearanceRoute::Transporter(key) if toggles.enable_transporters => {
                        let Some(def) = self.targets.transporter(key) else {
                            continue;
                        };
                        let density = self.auxiliary(state, AuxiliaryKey::TransporterDensity(key));
                        1.0 - def.clearance_share * (1.0 - density * scratch.transporter_remaining[key.index()])
                    }
                    ClearanceRoute::Enzyme(key) if toggles.enable_enzymes => {
                        let Some(def) = self.targets.enzyme(key) else {
                            continue;
                        };
                        let activity = if toggles.enable_auxiliary_pools {
                            self.auxiliary(state, AuxiliaryKey::EnzymeActivity(key))
                        } else {
                            let baseline = self
                                .layout
                                .auxiliary(AuxiliaryKey::EnzymeActivity(key))
                                .and_then(|idx| aux_baselines.get(idx - SignalKey::COUNT))
                                .copied()
                                .unwrap_or(1.0);
                            baseline
                                * scratch.enzyme_remaining[key.index()]
                                * (1.0 + scratch.enzyme_induction[key.index()])
                        };
                        1.0 - def.clearance_share * (1.0 - activity)
                    }
                    _ => continue,
                };
                scratch.clearance[s] *= factor.max(self.params.clearance_floor);
            }
        }
    }

    /// Cross-signal couplings, reading state before this step.
    fn apply_couplings(&self, state: &StatePool, scratch: &mut StepScratch) {
        for def in &self.definitions {
            let s = def.key.index();
            for coupling in &def.dynamics.couplings {
                let deviation = coupling.deviation(state.signal(coupling.source));
                match coupling.effect {
                    CouplingEffect::Drive => scratch.forcing[s] += coupling.gain * deviation,
                    CouplingEffect::Clearance => {
                        scratch.clearance[s] *= (1.0 + coupling.gain * deviation).max(COUPLING_CLEARANCE_FLOOR)
                    }
                }
            }
        }
    }

    fn update_auxiliaries(&self, state: &mut StatePool, aux_baselines: &[f64], scratch: &StepScratch, dt: f64) {
        for (slot, key) in self.layout.auxiliary_keys().iter().enumerate() {
            let Some(def) = self.signals.auxiliaries().get(key) else {
                continue;
            };
            let idx = SignalKey::COUNT + slot;
            let current = state.get(idx);
            let baseline = aux_baselines[slot];
            let next = match (*key, def.dynamics) {
                (AuxiliaryKey::ReceptorDensity(k), AuxiliaryDynamics::Adaptation(adaptation)) => {
                    adapt_density(current, baseline, scratch.receptor_occupancy[k.index()], &adaptation, dt)
                }
                (AuxiliaryKey::TransporterDensity(k), AuxiliaryDynamics::Adaptation(adaptation)) => {
                    adapt_density(current, baseline, scratch.transporter_occupancy[k.index()], &adaptation, dt)
                }
                (AuxiliaryKey::EnzymeActivity(k), AuxiliaryDynamics::Turnover { tau_min }) => turnover_activity(
                    current,
                    baseline,
                    1.0 - scratch.enzyme_remaining[k.index()],
                    scratch.enzyme_induction[k.index()],
                    tau_min,
                    dt,
                ),
                (AuxiliaryKey::VesiclePool(k), AuxiliaryDynamics::Reserve { refill_tau_min }) => {
                    refill_reserve(current, baseline, scratch.depletion[k.index()], refill_tau_min, dt)
                }
                _ => current,
            };
            state.set(idx, next);
        }
    }
}

/// Per-step accumulators, reset at the start of every step.
struct StepScratch {
    forcing: [f64; SignalKey::COUNT],
    clearance: [f64; SignalKey::COUNT],
    potency: [f64; ReceptorKey::ALL.len()],
    receptor_occupancy: [f64; ReceptorKey::ALL.len()],
    transporter_remaining: [f64; TransporterKey::ALL.len()],
    transporter_occupancy: [f64; TransporterKey::ALL.len()],
    release: [f64; TransporterKey::ALL.len()],
    enzyme_remaining: [f64; EnzymeKey::ALL.len()],
    enzyme_induction: [f64; EnzymeKey::ALL.len()],
    depletion: [f64; VesicleKey::ALL.len()],
}

impl StepScratch {
    fn new() -> Self {
        Self {
            forcing: [0.0; SignalKey::COUNT],
            clearance: [1.0; SignalKey::COUNT],
            potency: [1.0; ReceptorKey::ALL.len()],
            receptor_occupancy: [0.0; ReceptorKey::ALL.len()],
            transporter_remaining: [1.0; TransporterKey::ALL.len()],
            transporter_occupancy: [0.0; TransporterKey::ALL.len()],
            release: [0.0; TransporterKey::ALL.len()],
            enzyme_remaining: [1.0; EnzymeKey::ALL.len()],
            enzyme_induction: [0.0; EnzymeKey::ALL.len()],
            depletion: [0.0; VesicleKey::ALL.len()],
        }
    }

    fn reset(&mut self) {
        self.forcing.fill(0.0);
        self.clearance.fill(1.0);
        self.potency.fill(1.0);
        self.receptor_occupancy.fill(0.0);
        self.transporter_remaining.fill(1.0);
        self.transporter_occupancy.fill(0.0);
        self.release.fill(0.0);
        self.enzyme_remaining.fill(1.0);
        self.enzyme_induction.fill(0.0);
        self.depletion.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Toggle;

    fn engine() -> SimulationEngine {
        SimulationEngine::builtin().expect("builtin engine")
    }

    fn caffeine_at(minute: f64, mg: f64) -> TimelineItem {
        TimelineItem::at_minutes("c1", "caffeine", SimulationGrid::default().origin, minute, 30.0).with_param("mg", mg)
    }

    #[test]
    fn test_empty_grid_returns_empty_snapshot() {
        let grid = SimulationGrid::new(SimulationGrid::default().origin, 0.0, 5.0, 0);
        let response = engine().compute(&SimulationRequest::new(grid, Vec::new()));
        assert!(response.snapshot.is_empty());
        assert_eq!(response.snapshot.keys().count(), SignalKey::COUNT);
        assert_eq!(response.diagnostics.steps, 0);
    }

    #[test]
    fn test_baseline_run_is_clean() {
        let response = engine().compute(&SimulationRequest::new(SimulationGrid::default(), Vec::new()));
        assert_eq!(response.snapshot.len(), 288);
        assert!(
            response.diagnostics.is_clean(),
            "diagnostics not clean: {:?}",
            response.diagnostics
        );
        for (key, series) in response.snapshot.iter() {
            assert!(series.iter().all(f64::is_finite), "{} has non-finite values", key);
        }
    }

    #[test]
    fn test_first_point_is_initial_state() {
        let engine = engine();
        let request = SimulationRequest::new(SimulationGrid::default(), vec![caffeine_at(0.0, 200.0)]);
        let with = engine.compute(&request);
        let without = engine.compute(&SimulationRequest::new(SimulationGrid::default(), Vec::new()));
        for key in SignalKey::ALL {
            assert_eq!(with.snapshot.value_at(key, 0), without.snapshot.value_at(key, 0), "{}", key);
        }
    }

    #[test]
    fn test_unknown_items_are_reported() {
        let origin = SimulationGrid::default().origin;
        let items = vec![TimelineItem::at_minutes("x", "teleportation", origin, 60.0, 30.0)];
        let response = engine().compute(&SimulationRequest::new(SimulationGrid::default(), items));
        assert_eq!(response.diagnostics.skipped_items, vec!["x".to_string()]);
    }

    #[test]
    fn test_disabling_auxiliaries_holds_baseline() {
        let request = SimulationRequest::new(SimulationGrid::default(), vec![caffeine_at(480.0, 200.0)])
            .with_options(SimulationOptions {
                toggles: DebugToggles::default().without(Toggle::AuxiliaryPools),
                include_auxiliaries: true,
                record_production: false,
            });
        let response = engine().compute(&request);
        assert!(!response.auxiliaries.is_empty());
        for (key, series) in &response.auxiliaries {
            let first = series.value_at(0);
            assert!(series.iter().all(|v| v == first), "{} moved with pools disabled", key);
        }
    }

    #[test]
    fn test_caffeine_upregulates_adenosine_receptors() {
        let request = SimulationRequest::new(SimulationGrid::default(), vec![caffeine_at(480.0, 200.0)])
            .with_options(SimulationOptions {
                include_auxiliaries: true,
                ..SimulationOptions::default()
            });
        let response = engine().compute(&request);
        let density = &response.auxiliaries[&AuxiliaryKey::ReceptorDensity(ReceptorKey::A1)];
        let (_, peak) = density.peak().expect("density series");
        assert!(peak > 1.0, "A1 density peak {} should rise under antagonism", peak);
    }
}
