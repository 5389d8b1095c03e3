//! Resolution of a timeline into per-grid-point exposure terms.
//!
//! Each timeline item is evaluated once, before stepping, into flat arrays on
//! the simulation grid: effect-site exposure per PD effect, and precomputed
//! values for direct and nutrient effects. The engine only indexes into them.

use crate::pharmacology::{effect_site_curve, DirectKind, PdEffect};
use crate::signals::SignalKey;
use crate::simulation::{SimulationGrid, Subject};

use super::catalog::{InterventionCatalog, Profile};
use super::params::resolve_params;
use super::timeline::TimelineItem;

/// A target-mediated effect with its effect-site exposure on the grid.
#[derive(Debug, Clone)]
pub struct PdTerm {
    pub item_id: String,
    pub effect: PdEffect,
    pub effect_site: Vec<f64>,
}

/// A target-free effect: value on the grid is production (drive) or
/// fractional clearance change (clearance).
#[derive(Debug, Clone)]
pub struct DirectTerm {
    pub item_id: String,
    pub signal: SignalKey,
    pub kind: DirectKind,
    pub values: Vec<f64>,
}

/// Exposure of a whole timeline.
#[derive(Debug, Clone, Default)]
pub struct ResolvedExposure {
    pub pd_terms: Vec<PdTerm>,
    pub direct_terms: Vec<DirectTerm>,
    /// Items skipped because their intervention key is not in the catalog
    pub skipped: Vec<String>,
}

impl ResolvedExposure {
    pub fn is_empty(&self) -> bool {
        self.pd_terms.is_empty() && self.direct_terms.is_empty()
    }
}

/// Evaluate every timeline item on the grid.
///
/// Unknown intervention keys are skipped with a warning. Exposure is never
/// negative and never non-finite.
pub fn resolve_timeline(
    catalog: &InterventionCatalog,
    timeline: &[TimelineItem],
    grid: &SimulationGrid,
    subject: &Subject,
    pk_substep_min: f64,
) -> ResolvedExposure {
    let mut resolved = ResolvedExposure::default();

    for item in timeline {
        let Some(def) = catalog.get(&item.intervention_key) else {
            log::warn!(
                "Timeline item '{}' references unknown intervention '{}', skipping",
                item.id,
                item.intervention_key
            );
            resolved.skipped.push(item.id.clone());
            continue;
        };

        let intensity = if item.intensity.is_finite() { item.intensity.max(0.0) } else { 0.0 };
        let params = resolve_params(&def.params, &item.params);
        let start_min = grid.minutes_since_origin(item.start);
        let duration_min = item.duration_min();
        let offsets: Vec<f64> = (0..grid.len).map(|i| grid.time_at(i) - start_min).collect();

        match &def.profile {
            Profile::Pharmacology(profile) => {
                let amount = params.get(&profile.dose.param).copied().unwrap_or(0.0) * profile.dose.per_unit * intensity;
                let mut exposure =
                    profile
                        .pk
                        .exposure_curve(amount, duration_min, subject, &offsets, pk_substep_min);
                sanitize(&mut exposure);

                log::debug!(
                    "Resolved '{}' ({}): amount {:.3}, peak exposure {:.4}",
                    item.id,
                    def.key,
                    amount,
                    exposure.iter().cloned().fold(0.0, f64::max)
                );

                for effect in &profile.pd {
                    resolved.pd_terms.push(PdTerm {
                        item_id: item.id.clone(),
                        effect: *effect,
                        effect_site: effect_site_curve(&exposure, effect.onset_tau_min, grid.step_min),
                    });
                }
                for effect in &profile.direct {
                    let mut values: Vec<f64> = exposure.iter().map(|&c| effect.value(c)).collect();
                    sanitize_signed(&mut values);
                    resolved.direct_terms.push(DirectTerm {
                        item_id: item.id.clone(),
                        signal: effect.signal,
                        kind: effect.kind,
                        values,
                    });
                }
            }
            Profile::Nutrition(nutrition) => {
                let delay = nutrition.gastric_delay.minutes(&params);
                for effect in &nutrition.effects {
                    let amount: f64 =
                        effect.params.iter().filter_map(|p| params.get(p)).sum::<f64>() * intensity;
                    let mut values: Vec<f64> = offsets
                        .iter()
                        .map(|&t| effect.value(amount, t - delay, nutrition.rise_window_min))
                        .collect();
                    sanitize_signed(&mut values);
                    resolved.direct_terms.push(DirectTerm {
                        item_id: item.id.clone(),
                        signal: effect.signal,
                        kind: effect.kind,
                        values,
                    });
                }
            }
        }
    }

    resolved
}

fn sanitize(values: &mut [f64]) {
    for v in values.iter_mut() {
        if !v.is_finite() || *v < 0.0 {
            *v = 0.0;
        }
    }
}

fn sanitize_signed(values: &mut [f64]) {
    for v in values.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharmacology::TargetRegistry;
    use chrono::NaiveDateTime;

    fn setup() -> (InterventionCatalog, SimulationGrid) {
        let targets = TargetRegistry::builtin().unwrap();
        (InterventionCatalog::builtin(&targets).unwrap(), SimulationGrid::default())
    }

    #[test]
    fn test_unknown_key_skipped() {
        let (catalog, grid) = setup();
        let timeline = vec![TimelineItem::at_minutes("x", "unobtainium", NaiveDateTime::default(), 60.0, 10.0)];
        let resolved = resolve_timeline(&catalog, &timeline, &grid, &Subject::default(), 1.0);
        assert!(resolved.is_empty());
        assert_eq!(resolved.skipped, vec!["x".to_string()]);
    }

    #[test]
    fn test_caffeine_exposure_starts_at_dose() {
        let (catalog, grid) = setup();
        let timeline = vec![TimelineItem::at_minutes("c", "caffeine", grid.origin, 480.0, 5.0)];
        let resolved = resolve_timeline(&catalog, &timeline, &grid, &Subject::default(), 1.0);
        assert_eq!(resolved.pd_terms.len(), 2);
        let site = &resolved.pd_terms[0].effect_site;
        let dose_index = grid.index_at(480.0);
        assert!(site[..=dose_index].iter().all(|&c| c == 0.0));
        assert!(site[dose_index + 12] > 0.0);
    }

    #[test]
    fn test_meal_has_no_effect_before_gastric_delay() {
        let (catalog, grid) = setup();
        let timeline = vec![TimelineItem::at_minutes("m", "food", grid.origin, 480.0, 20.0)];
        let resolved = resolve_timeline(&catalog, &timeline, &grid, &Subject::default(), 1.0);
        let delay_index = grid.index_at(495.0);
        for term in &resolved.direct_terms {
            assert!(
                term.values[..=delay_index].iter().all(|&v| v == 0.0),
                "{} active before delay",
                term.signal
            );
            assert!(term.values[delay_index + 6] > 0.0);
        }
    }

    #[test]
    fn test_zero_intensity_gives_zero_exposure() {
        let (catalog, grid) = setup();
        let timeline =
            vec![TimelineItem::at_minutes("e", "exercise", grid.origin, 600.0, 60.0).with_intensity(0.0)];
        let resolved = resolve_timeline(&catalog, &timeline, &grid, &Subject::default(), 1.0);
        assert!(resolved
            .direct_terms
            .iter()
            .all(|term| term.values.iter().all(|&v| v == 0.0)));
    }
}
