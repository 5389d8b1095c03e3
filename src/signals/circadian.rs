//! Setpoint shapes: tonic level plus circadian and menstrual pulses.
//!
//! All circadian shapes are periodic in the minute of day, so a multi-day
//! grid repeats the same baseline each day.

use std::f64::consts::PI;

use crate::simulation::Sex;

/// Minutes per day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Wrap a minute value into [0, 1440).
pub fn wrap_minute(minute: f64) -> f64 {
    minute.rem_euclid(MINUTES_PER_DAY)
}

/// Shortest distance between two points on a circle of length `period`.
fn circular_distance(a: f64, b: f64, period: f64) -> f64 {
    let d = (a - b).rem_euclid(period);
    d.min(period - d)
}

/// One circadian component of a setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pulse {
    /// Bell-shaped bump centred on a clock minute.
    Gaussian {
        center_min: f64,
        width_min: f64,
        amplitude: f64,
    },
    /// Plateau between two clock minutes with logistic edges; may wrap midnight.
    Window {
        start_min: f64,
        end_min: f64,
        ramp_min: f64,
        amplitude: f64,
    },
    /// Sinusoid peaking at the acrophase.
    Cosine {
        acrophase_min: f64,
        amplitude: f64,
        period_min: f64,
    },
}

impl Pulse {
    pub fn gaussian(center_min: f64, width_min: f64, amplitude: f64) -> Self {
        Pulse::Gaussian {
            center_min,
            width_min,
            amplitude,
        }
    }

    pub fn window(start_min: f64, end_min: f64, ramp_min: f64, amplitude: f64) -> Self {
        Pulse::Window {
            start_min,
            end_min,
            ramp_min,
            amplitude,
        }
    }

    pub fn cosine(acrophase_min: f64, amplitude: f64) -> Self {
        Pulse::Cosine {
            acrophase_min,
            amplitude,
            period_min: MINUTES_PER_DAY,
        }
    }

    /// Value at a minute of day.
    pub fn evaluate(&self, minute_of_day: f64) -> f64 {
        match *self {
            Pulse::Gaussian {
                center_min,
                width_min,
                amplitude,
            } => {
                let d = circular_distance(minute_of_day, center_min, MINUTES_PER_DAY);
                let w = width_min.max(1e-6);
                amplitude * (-d * d / (2.0 * w * w)).exp()
            }
            Pulse::Window {
                start_min,
                end_min,
                ramp_min,
                amplitude,
            } => {
                let mut len = (end_min - start_min).rem_euclid(MINUTES_PER_DAY);
                if len == 0.0 {
                    len = MINUTES_PER_DAY;
                }
                let r = (ramp_min / 4.0).max(1e-6);
                // Place x so that the off-period is split evenly before and after
                let mut x = (minute_of_day - start_min).rem_euclid(MINUTES_PER_DAY);
                if x > len + (MINUTES_PER_DAY - len) / 2.0 {
                    x -= MINUTES_PER_DAY;
                }
                amplitude * sigmoid(x / r) * sigmoid((len - x) / r)
            }
            Pulse::Cosine {
                acrophase_min,
                amplitude,
                period_min,
            } => amplitude * (2.0 * PI * (minute_of_day - acrophase_min) / period_min).cos(),
        }
    }
}

/// Gaussian bump over the menstrual cycle day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePulse {
    pub center_day: f64,
    pub width_days: f64,
    pub amplitude: f64,
}

impl CyclePulse {
    pub fn evaluate(&self, cycle_day: f64, cycle_length_days: f64) -> f64 {
        let d = circular_distance(cycle_day, self.center_day, cycle_length_days.max(1.0));
        let w = self.width_days.max(1e-6);
        self.amplitude * (-d * d / (2.0 * w * w)).exp()
    }
}

/// Multiplier applied to the circadian part of a setpoint per sex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SexScale {
    pub male: f64,
    pub female: f64,
}

impl SexScale {
    pub fn factor(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }
}

/// Inputs a setpoint depends on besides its own shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointContext {
    pub minute_of_day: f64,
    pub sex: Sex,
    /// Day within the menstrual cycle and the cycle length, if tracked
    pub cycle: Option<(f64, f64)>,
}

/// Baseline target a signal relaxes toward.
#[derive(Debug, Clone, PartialEq)]
pub struct Setpoint {
    pub tonic: f64,
    pub pulses: Vec<Pulse>,
    pub sex_scale: Option<SexScale>,
    /// Menstrual-cycle pulses, female subjects with a tracked cycle only
    pub cycle_pulses: Vec<CyclePulse>,
}

impl Setpoint {
    pub fn constant(tonic: f64) -> Self {
        Self {
            tonic,
            pulses: Vec::new(),
            sex_scale: None,
            cycle_pulses: Vec::new(),
        }
    }

    /// Evaluate the setpoint.
    ///
    /// `rhythm_gain` scales every pulse (0 leaves only the tonic level).
    pub fn evaluate(&self, ctx: &SetpointContext, rhythm_gain: f64) -> f64 {
        let mut value = self.tonic;
        if rhythm_gain != 0.0 {
            let rhythm: f64 = self.pulses.iter().map(|p| p.evaluate(ctx.minute_of_day)).sum();
            value += rhythm_gain * rhythm;
        }
        if let Some(scale) = &self.sex_scale {
            value *= scale.factor(ctx.sex);
        }
        if rhythm_gain != 0.0 && ctx.sex == Sex::Female {
            if let Some((day, length)) = ctx.cycle {
                let cycle: f64 = self.cycle_pulses.iter().map(|p| p.evaluate(day, length)).sum();
                value += rhythm_gain * cycle;
            }
        }
        value
    }
}
