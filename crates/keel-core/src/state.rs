// AGENT-AUTHORED
//! EISV state dynamics and the coherence function.
//!
//! The tracked state is four variables: energy `e`, information `i`,
//! entropy `s` (all in `[0, 1]`), and the unbounded void accumulator `v`,
//! which integrates the energy–information imbalance. Coherence
//! `C(v) = c_max * 0.5 * (1 + tanh(c1 * v))` is the bounded stabilizing
//! feedback derived from `v`; it is never stored, always recomputed.
//!
//! # Invariants
//!
//! - Post-step, `e`, `i`, `s` are clipped into `[0, 1]`; clips are minor
//!   anomalies (logged, reported in the step outcome, cycle continues).
//! - `s` is floored at the configured epistemic-humility floor after every
//!   step, so the entropy term can never claim perfect certainty.
//! - Any NaN/Inf after the update is fatal: the step returns an error and
//!   the caller must discard the working copy.
//! - The gain is represented solely by `Theta::eta1`; the control gain λ1
//!   is always derived through one fixed linear map and never stored, so
//!   the two representations cannot drift apart.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::StateConfig;
use crate::error::KernelError;

/// Slope of the fixed `eta1 -> lambda1` linear map.
///
/// With `eta1` in `[0.1, 0.5]` this places λ1 in `[0.2, 1.0]`. The inverse
/// map divides by the same constant; both directions live here and nowhere
/// else.
pub const LAMBDA1_SLOPE: f64 = 2.0;

/// The four-variable thermodynamic state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EisvState {
    /// Energy, in `[0, 1]`.
    pub e: f64,
    /// Information, in `[0, 1]`.
    pub i: f64,
    /// Entropy, in `[s_floor, 1]`.
    pub s: f64,
    /// Void: accumulated energy–information imbalance. Unbounded, finite.
    pub v: f64,
}

impl EisvState {
    /// A neutral starting state for a fresh session.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            e: 0.5,
            i: 0.5,
            s: 0.5,
            v: 0.0,
        }
    }

    /// Validates that every variable is finite.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ValidationFatal`] naming the first non-finite
    /// variable.
    pub fn ensure_finite(&self, update_count: u64) -> Result<(), KernelError> {
        KernelError::check_finite("e", self.e, update_count)?;
        KernelError::check_finite("i", self.i, update_count)?;
        KernelError::check_finite("s", self.s, update_count)?;
        KernelError::check_finite("v", self.v, update_count)?;
        Ok(())
    }
}

/// Control parameters. `eta1` is the sole stored representation of gain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Theta {
    /// Coherence steepness.
    pub c1: f64,
    /// Gain representation, in `[0.1, 0.5]`.
    pub eta1: f64,
}

impl Theta {
    /// Builds theta from the configured defaults.
    #[must_use]
    pub fn from_config(config: &StateConfig) -> Self {
        Self {
            c1: config.c1,
            eta1: config.eta1,
        }
    }

    /// The control gain λ1, derived from `eta1` through the fixed map.
    #[must_use]
    pub fn lambda1(&self) -> f64 {
        LAMBDA1_SLOPE * self.eta1
    }

    /// Sets the gain by storing the exact inverse image of `lambda1`,
    /// clamping `eta1` into `[eta1_min, eta1_max]`.
    pub fn set_lambda1(&mut self, lambda1: f64, eta1_min: f64, eta1_max: f64) {
        self.eta1 = (lambda1 / LAMBDA1_SLOPE).clamp(eta1_min, eta1_max);
    }
}

/// Coherence `C(v) = c_max * 0.5 * (1 + tanh(c1 * v))`.
///
/// Strictly increasing in `v`, bounded to `[0, c_max]`, with
/// `C(0) = c_max / 2`.
#[must_use]
pub fn coherence(v: f64, c1: f64, c_max: f64) -> f64 {
    c_max * 0.5 * (1.0 + (c1 * v).tanh())
}

/// Outcome of one state step.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    /// The post-step state, clipped and floored.
    pub state: EisvState,
    /// Whether any bounded variable needed clipping.
    pub clipped: bool,
}

/// Advances the state by one explicit-Euler step.
///
/// Deterministic given its inputs. The drift vector feeds each of the
/// bounded variables; complexity drives energy and entropy; information
/// grows by transfer from energy; the void integrates the `e - i`
/// imbalance damped by the coherence feedback with gain λ1.
///
/// # Errors
///
/// Returns [`KernelError::ValidationFatal`] if any post-step variable is
/// NaN or infinite. The input state is unmodified; the caller discards the
/// cycle.
#[allow(clippy::too_many_arguments)]
pub fn step(
    state: &EisvState,
    theta: &Theta,
    delta_eta: [f64; 3],
    dt: f64,
    complexity: f64,
    noise: f64,
    config: &StateConfig,
    update_count: u64,
) -> Result<StepOutcome, KernelError> {
    let lambda1 = theta.lambda1();
    let c = coherence(state.v, theta.c1, config.c_max);
    let c_mid = config.c_max / 2.0;

    let e_raw = state.e
        + dt * (delta_eta[0] + config.energy_complexity_gain * complexity - lambda1 * state.e)
        + noise;
    let i_raw = state.i + dt * (delta_eta[1] + config.info_transfer_gain * state.e * (1.0 - state.i));
    let s_raw = state.s
        + dt * (delta_eta[2] + config.entropy_complexity_gain * complexity
            - config.entropy_info_decay * state.i);
    let v_raw = state.v + dt * ((state.e - state.i) - lambda1 * (c - c_mid));

    // Fatal check happens on the raw values: a clip must never mask a
    // numerical blow-up into a silently saturated state.
    let candidate = EisvState {
        e: e_raw,
        i: i_raw,
        s: s_raw,
        v: v_raw,
    };
    candidate.ensure_finite(update_count)?;

    let mut clipped = false;
    let mut clip = |name: &'static str, value: f64| -> f64 {
        if (0.0..=1.0).contains(&value) {
            value
        } else {
            warn!(var = name, value, "state variable overshot [0, 1]; clipping");
            clipped = true;
            value.clamp(0.0, 1.0)
        }
    };

    let e = clip("e", e_raw);
    let i = clip("i", i_raw);
    let s = clip("s", s_raw).max(config.s_floor);

    Ok(StepOutcome {
        state: EisvState { e, i, s, v: v_raw },
        clipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StateConfig {
        StateConfig::default()
    }

    #[test]
    fn coherence_midpoint_at_zero_void() {
        assert!((coherence(0.0, 0.8, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn coherence_saturates_toward_bounds() {
        assert!(coherence(100.0, 0.8, 1.0) > 0.999);
        assert!(coherence(-100.0, 0.8, 1.0) < 0.001);
    }

    #[test]
    fn lambda1_round_trips_through_inverse_map() {
        let mut theta = Theta { c1: 0.8, eta1: 0.37 };
        let lambda1 = theta.lambda1();
        theta.set_lambda1(lambda1, 0.1, 0.5);
        assert!((theta.eta1 - 0.37).abs() < 1e-12);
    }

    #[test]
    fn set_lambda1_clamps_eta1() {
        let mut theta = Theta { c1: 0.8, eta1: 0.3 };
        theta.set_lambda1(10.0, 0.1, 0.5);
        assert!((theta.eta1 - 0.5).abs() < f64::EPSILON);
        theta.set_lambda1(0.0, 0.1, 0.5);
        assert!((theta.eta1 - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn step_is_deterministic() {
        let state = EisvState::initial();
        let theta = Theta { c1: 0.8, eta1: 0.3 };
        let a = step(&state, &theta, [0.1, 0.05, -0.02], 1.0, 0.6, 0.0, &config(), 0).unwrap();
        let b = step(&state, &theta, [0.1, 0.05, -0.02], 1.0, 0.6, 0.0, &config(), 0).unwrap();
        assert_eq!(a.state, b.state);
    }

    #[test]
    fn step_floors_entropy() {
        let state = EisvState {
            e: 0.5,
            i: 1.0,
            s: 0.01,
            v: 0.0,
        };
        let theta = Theta { c1: 0.8, eta1: 0.3 };
        let out = step(&state, &theta, [0.0, 0.0, -0.5], 1.0, 0.0, 0.0, &config(), 0).unwrap();
        assert!(out.state.s >= 0.001);
        assert!(out.clipped, "a large negative entropy drift clips");
    }

    #[test]
    fn step_clips_energy_overshoot() {
        let state = EisvState {
            e: 0.9,
            i: 0.5,
            s: 0.5,
            v: 0.0,
        };
        let theta = Theta { c1: 0.8, eta1: 0.3 };
        let out = step(&state, &theta, [0.9, 0.0, 0.0], 1.0, 1.0, 0.0, &config(), 0).unwrap();
        assert!((out.state.e - 1.0).abs() < f64::EPSILON);
        assert!(out.clipped);
    }

    #[test]
    fn nan_noise_is_fatal_and_leaves_input_untouched() {
        let state = EisvState::initial();
        let theta = Theta { c1: 0.8, eta1: 0.3 };
        let err = step(&state, &theta, [0.0; 3], 1.0, 0.5, f64::NAN, &config(), 4).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(state, EisvState::initial());
    }

    #[test]
    fn void_damping_pulls_toward_zero() {
        // With e == i the only void dynamic is the coherence feedback,
        // which must push v toward 0 from either side.
        let theta = Theta { c1: 0.8, eta1: 0.5 };
        let up = EisvState {
            e: 0.5,
            i: 0.5,
            s: 0.5,
            v: 2.0,
        };
        let down = EisvState {
            e: 0.5,
            i: 0.5,
            s: 0.5,
            v: -2.0,
        };
        let out_up = step(&up, &theta, [0.0; 3], 1.0, 0.0, 0.0, &config(), 0).unwrap();
        let out_down = step(&down, &theta, [0.0; 3], 1.0, 0.0, 0.0, &config(), 0).unwrap();
        assert!(out_up.state.v < 2.0);
        assert!(out_down.state.v > -2.0);
    }
}
