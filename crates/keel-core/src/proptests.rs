//! Property-based tests for the kernel's numerical invariants.
//!
//! These verify the hard safety properties under fuzzed inputs:
//! coherence bounds and monotonicity, post-step state bounds and
//! finiteness, gain-map round-tripping, and damper clamping.

#![allow(clippy::items_after_statements)]

use proptest::prelude::*;

use crate::config::{OscillationConfig, StateConfig};
use crate::oscillation::{damp, DamperParams};
use crate::phase::PhaseLabel;
use crate::state::{coherence, step, EisvState, Theta};

/// Strategy for a bounded state variable.
fn unit_interval() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

/// Strategy for a finite void value, covering both tame and wild ranges.
fn void_value() -> impl Strategy<Value = f64> {
    prop_oneof![-5.0f64..=5.0, -1e6f64..=1e6]
}

/// Strategy for a drift component.
fn drift_component() -> impl Strategy<Value = f64> {
    -1.0f64..=1.0
}

/// Strategy for a valid gain representation.
fn eta1_value() -> impl Strategy<Value = f64> {
    0.1f64..=0.5
}

proptest! {
    /// Coherence stays in `[0, c_max]` for any finite void.
    #[test]
    fn coherence_is_bounded(v in void_value(), c1 in 0.1f64..=2.0) {
        let c = coherence(v, c1, 1.0);
        prop_assert!((0.0..=1.0).contains(&c));
    }

    /// Coherence is strictly increasing away from saturation.
    #[test]
    fn coherence_is_monotone(v in -5.0f64..=5.0, dv in 0.01f64..=1.0) {
        let lo = coherence(v, 0.8, 1.0);
        let hi = coherence(v + dv, 0.8, 1.0);
        prop_assert!(hi > lo, "coherence({}) = {lo} !< coherence({}) = {hi}", v, v + dv);
    }

    /// `C(0) = c_max / 2` for any steepness and ceiling.
    #[test]
    fn coherence_midpoint(c1 in 0.1f64..=2.0, c_max in 0.5f64..=2.0) {
        let c = coherence(0.0, c1, c_max);
        prop_assert!((c - c_max / 2.0).abs() < 1e-12);
    }

    /// Post-step bounds: E, I, S in `[0, 1]`, S floored, everything finite.
    #[test]
    fn step_preserves_invariants(
        e in unit_interval(),
        i in unit_interval(),
        s in unit_interval(),
        v in -5.0f64..=5.0,
        d0 in drift_component(),
        d1 in drift_component(),
        d2 in drift_component(),
        dt in 0.01f64..=2.0,
        complexity in unit_interval(),
        eta1 in eta1_value(),
    ) {
        let config = StateConfig::default();
        let state = EisvState { e, i, s, v };
        let theta = Theta { c1: 0.8, eta1 };
        let out = step(&state, &theta, [d0, d1, d2], dt, complexity, 0.0, &config, 0)
            .expect("finite inputs never trip the fatal gate");
        prop_assert!((0.0..=1.0).contains(&out.state.e));
        prop_assert!((0.0..=1.0).contains(&out.state.i));
        prop_assert!((0.0..=1.0).contains(&out.state.s));
        prop_assert!(out.state.s >= config.s_floor);
        prop_assert!(out.state.v.is_finite());
    }

    /// The gain map round-trips: eta1 -> lambda1 -> eta1' within tolerance.
    #[test]
    fn gain_map_round_trips(eta1 in eta1_value()) {
        let mut theta = Theta { c1: 0.8, eta1 };
        let lambda1 = theta.lambda1();
        theta.set_lambda1(lambda1, 0.1, 0.5);
        prop_assert!((theta.eta1 - eta1).abs() < 1e-12);
    }

    /// Damper outputs stay within configured bounds for arbitrary extreme
    /// inputs, in both phases.
    #[test]
    fn damper_outputs_stay_bounded(
        tau in 0.25f64..=0.75,
        beta in 0.2f64..=0.6,
        coherence in -1e9f64..=1e9,
        risk in -1e9f64..=1e9,
        exploring in any::<bool>(),
    ) {
        let config = OscillationConfig::default();
        let phase = if exploring { PhaseLabel::Exploration } else { PhaseLabel::Integration };
        let params = DamperParams { tau, beta };
        let out = damp(&params, coherence, risk, phase, &config);
        prop_assert!((config.tau_min..=config.tau_max).contains(&out.tau));
        prop_assert!((config.beta_min..=config.beta_max).contains(&out.beta));
        // Per-step movement is rate-limited.
        prop_assert!((out.tau - tau).abs() <= config.delta_max + 1e-12);
        prop_assert!((out.beta - beta).abs() <= config.delta_max + 1e-12);
    }
}
