//! Time integration.
//!
//! Two schemes are used:
//! - Signals and auxiliaries advance with an exact exponential relaxation
//!   step, which is unconditionally stable for any grid step and tau.
//! - Nonlinear pharmacokinetics (saturable elimination) is integrated with
//!   4th-order Runge-Kutta on sub-steps of the grid.
//!
//! Reference: Press et al., Numerical Recipes, 3rd ed., Cambridge University Press 2007

use crate::config::IntegratorParameters;

/// Configuration for the RK4 integrator
#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Integration sub-step in minutes
    pub dt_min: f64,
    /// Maximum allowed change per step (for stability)
    pub max_change: f64,
    /// Minimum value (prevents negative concentrations)
    pub min_value: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt_min: 1.0,
            max_change: 1.0e6,
            min_value: 0.0,
        }
    }
}

/// 4th-order Runge-Kutta integrator for small ODE systems
///
/// Solves dy/dt = f(t, y)
pub struct RK4Integrator {
    pub config: IntegratorConfig,
    /// Current time in minutes
    pub time_min: f64,
    pub step_count: u64,
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    y_temp: Vec<f64>,
}

impl RK4Integrator {
    /// Create a new RK4 integrator for a system with n variables
    pub fn new(n_variables: usize, config: IntegratorConfig) -> Self {
        Self {
            config,
            time_min: 0.0,
            step_count: 0,
            k1: vec![0.0; n_variables],
            k2: vec![0.0; n_variables],
            k3: vec![0.0; n_variables],
            k4: vec![0.0; n_variables],
            y_temp: vec![0.0; n_variables],
        }
    }

    fn resize(&mut self, n_variables: usize) {
        if self.k1.len() != n_variables {
            self.k1.resize(n_variables, 0.0);
            self.k2.resize(n_variables, 0.0);
            self.k3.resize(n_variables, 0.0);
            self.k4.resize(n_variables, 0.0);
            self.y_temp.resize(n_variables, 0.0);
        }
    }

    /// Perform one RK4 step of length `dt` starting at `self.time_min`.
    ///
    /// k1 = f(t, y)
    /// k2 = f(t + dt/2, y + dt/2 * k1)
    /// k3 = f(t + dt/2, y + dt/2 * k2)
    /// k4 = f(t + dt, y + dt * k3)
    /// y_new = y + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
    pub fn step_by<F>(&mut self, dt: f64, y: &mut [f64], derivatives: F)
    where
        F: Fn(f64, &[f64], &mut [f64]),
    {
        let n = y.len();
        self.resize(n);
        let t = self.time_min;

        derivatives(t, y, &mut self.k1);

        for i in 0..n {
            self.y_temp[i] = y[i] + 0.5 * dt * self.k1[i];
        }
        derivatives(t + 0.5 * dt, &self.y_temp, &mut self.k2);

        for i in 0..n {
            self.y_temp[i] = y[i] + 0.5 * dt * self.k2[i];
        }
        derivatives(t + 0.5 * dt, &self.y_temp, &mut self.k3);

        for i in 0..n {
            self.y_temp[i] = y[i] + dt * self.k3[i];
        }
        derivatives(t + dt, &self.y_temp, &mut self.k4);

        let dt_6 = dt / 6.0;
        for i in 0..n {
            let dy = dt_6 * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
            y[i] += dy.clamp(-self.config.max_change, self.config.max_change);
            if y[i] < self.config.min_value {
                y[i] = self.config.min_value;
            }
        }

        self.time_min = t + dt;
        self.step_count += 1;
    }

    /// Integrate up to `until_min` in steps no longer than `config.dt_min`.
    pub fn advance_to<F>(&mut self, until_min: f64, y: &mut [f64], derivatives: F)
    where
        F: Fn(f64, &[f64], &mut [f64]),
    {
        let span = until_min - self.time_min;
        if span <= 0.0 {
            return;
        }
        let n_steps = (span / self.config.dt_min.max(1e-9)).ceil().max(1.0) as usize;
        let dt = span / n_steps as f64;
        for _ in 0..n_steps {
            self.step_by(dt, y, &derivatives);
        }
        // Remove accumulated rounding so the clock lands exactly on the target
        self.time_min = until_min;
    }

    /// Reset the clock
    pub fn reset(&mut self, time_min: f64) {
        self.time_min = time_min;
        self.step_count = 0;
    }
}

/// Exact solution of dx/dt = (target - x) / tau over `dt_min`.
pub fn relax_toward(current: f64, target: f64, tau_min: f64, dt_min: f64) -> f64 {
    target + (current - target) * (-dt_min / tau_min).exp()
}

/// Outcome of one signal step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Advanced { value: f64, forcing_clamped: bool },
    /// Setpoint, forcing or clearance was not finite
    NonFinite,
}

/// Advance one signal by `dt_min`.
///
/// dx/dt = (setpoint - c * x) / tau + forcing
///
/// with clearance multiplier `c`, which relaxes exactly toward
/// `(setpoint + tau * forcing) / c` with time constant `tau / c`.
pub fn relaxation_step(
    current: f64,
    setpoint: f64,
    tau_min: f64,
    forcing: f64,
    clearance: f64,
    dt_min: f64,
    guards: &IntegratorParameters,
) -> StepOutcome {
    if !(setpoint.is_finite() && forcing.is_finite() && clearance.is_finite() && tau_min.is_finite()) {
        return StepOutcome::NonFinite;
    }
    let cap = guards.max_forcing_per_min;
    let forcing_clamped = forcing.abs() > cap;
    let forcing = forcing.clamp(-cap, cap);
    let c = clearance.clamp(guards.clearance_floor, guards.clearance_ceiling);
    let tau = tau_min.max(guards.tau_floor_min);
    let tau_eff = (tau / c).max(guards.tau_floor_min);
    let target = (setpoint + tau * forcing) / c;
    if !target.is_finite() {
        return StepOutcome::NonFinite;
    }
    let start = if current.is_finite() { current } else { setpoint };
    StepOutcome::Advanced {
        value: relax_toward(start, target, tau_eff, dt_min),
        forcing_clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_exponential_decay() {
        // dy/dt = -y, y(0) = 1, analytical y(t) = exp(-t)
        let mut integrator = RK4Integrator::new(
            1,
            IntegratorConfig {
                dt_min: 0.01,
                max_change: 10.0,
                min_value: 0.0,
            },
        );

        let mut y = vec![1.0];
        integrator.advance_to(1.0, &mut y, |_t, state, dydt| {
            dydt[0] = -state[0];
        });

        let expected = (-1.0_f64).exp();
        let error = (y[0] - expected).abs();
        assert!(error < 1e-6, "RK4 error too large: {} vs expected {}", y[0], expected);
        assert_eq!(integrator.time_min, 1.0);
    }

    #[test]
    fn test_rk4_time_dependent_input() {
        // dy/dt = 2t, y(0) = 0, analytical y = t^2
        let mut integrator = RK4Integrator::new(1, IntegratorConfig::default());
        let mut y = vec![0.0];
        integrator.advance_to(10.0, &mut y, |t, _state, dydt| {
            dydt[0] = 2.0 * t;
        });
        assert!((y[0] - 100.0).abs() < 1e-9, "y(10) = {}", y[0]);
    }

    #[test]
    fn test_relaxation_step_steady_state() {
        let guards = IntegratorParameters::default();
        // At setpoint with no forcing and unit clearance the value is unchanged
        let outcome = relaxation_step(10.0, 10.0, 30.0, 0.0, 1.0, 5.0, &guards);
        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                value: 10.0,
                forcing_clamped: false
            }
        );

        // Doubling clearance halves the steady state
        let mut x = 10.0;
        for _ in 0..1000 {
            if let StepOutcome::Advanced { value, .. } = relaxation_step(x, 10.0, 30.0, 0.0, 2.0, 5.0, &guards) {
                x = value;
            }
        }
        assert!((x - 5.0).abs() < 1e-9, "x = {}", x);
    }

    #[test]
    fn test_relaxation_step_rejects_non_finite() {
        let guards = IntegratorParameters::default();
        assert_eq!(
            relaxation_step(1.0, 1.0, 10.0, f64::NAN, 1.0, 5.0, &guards),
            StepOutcome::NonFinite
        );
        assert_eq!(
            relaxation_step(1.0, f64::INFINITY, 10.0, 0.0, 1.0, 5.0, &guards),
            StepOutcome::NonFinite
        );
        let clamped = relaxation_step(1.0, 1.0, 10.0, 1e12, 1.0, 5.0, &guards);
        assert!(matches!(clamped, StepOutcome::Advanced { forcing_clamped: true, .. }));
    }

    #[test]
    fn test_relaxation_is_stable_for_large_steps() {
        // Step 100x longer than tau still lands on the target, never overshoots
        let x = relax_toward(50.0, 10.0, 0.1, 10.0);
        assert!((x - 10.0).abs() < 1e-9, "x = {}", x);
        let half = relax_toward(0.0, 1.0, 1.0, std::f64::consts::LN_2);
        assert!((half - 0.5).abs() < 1e-12);
    }
}
