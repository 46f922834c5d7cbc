// AGENT-AUTHORED
//! Confidence-gated PI control of the adaptive gain.
//!
//! Every `adapt_interval` accepted cycles the controller nudges the control
//! gain λ1 toward two targets at once: a target **void frequency** (the
//! fraction of recent `|v|` samples above an adaptive excursion threshold)
//! and a target **coherence**. The excursion threshold is itself derived
//! from the recent history as `mean + k·σ`, so "excursion" scales with the
//! session's own noise floor instead of a fixed constant.
//!
//! The integral term is bounded (anti-windup) and persists across cycles
//! and snapshots. λ1 is clamped into its configured range and written back
//! through the exact inverse of the `eta1 -> lambda1` map, so `eta1`
//! remains the only stored representation of gain.
//!
//! # Gating
//!
//! The core safety property: low-trust signals must never move control
//! parameters. If the cycle's confidence is below the gate, the attempt is
//! recorded as an explicit skip (an audited no-op, not an error) and λ1
//! holds its value. The interval counter still resets, so a gated session
//! is re-examined at the normal cadence rather than on every cycle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ControllerConfig;
use crate::history::HistoryWindow;
use crate::state::Theta;

/// Persistent controller state: the PI integral and the interval counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerState {
    /// Bounded integral of the combined error.
    pub integral: f64,
    /// Accepted cycles since the last adaptation attempt.
    pub cycles_since_adapt: u32,
}

/// Why an adaptation attempt did not change the gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// Not due yet: the interval has not elapsed.
    Interval,
    /// Confidence below the gate at the scheduled attempt.
    LowConfidence {
        /// The cycle's confidence.
        confidence: f64,
        /// The configured gate.
        gate: f64,
    },
}

/// Result of one adaptation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdaptationOutcome {
    /// The gain was PI-stepped (possibly by zero, at exact targets).
    Applied {
        /// λ1 before the step.
        lambda1_before: f64,
        /// λ1 after the step and clamp.
        lambda1_after: f64,
        /// Observed void frequency this attempt.
        void_frequency: f64,
        /// Combined error fed to the PI step.
        error: f64,
    },
    /// No parameter moved.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
}

impl AdaptationOutcome {
    /// `true` when the gain was actually stepped.
    #[must_use]
    pub const fn applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Runs one adaptation attempt.
///
/// Increments the interval counter; when the interval elapses and the
/// confidence clears the gate, PI-steps λ1 toward the targets and writes
/// the result back into `theta` through the inverse gain map.
pub fn adapt(
    state: &mut ControllerState,
    theta: &mut Theta,
    coherence: f64,
    confidence: f64,
    v_history: &HistoryWindow<f64>,
    config: &ControllerConfig,
) -> AdaptationOutcome {
    state.cycles_since_adapt += 1;
    if state.cycles_since_adapt < config.adapt_interval {
        return AdaptationOutcome::Skipped {
            reason: SkipReason::Interval,
        };
    }
    state.cycles_since_adapt = 0;

    if confidence < config.confidence_gate {
        debug!(
            confidence,
            gate = config.confidence_gate,
            "adaptation gated: confidence below threshold"
        );
        return AdaptationOutcome::Skipped {
            reason: SkipReason::LowConfidence {
                confidence,
                gate: config.confidence_gate,
            },
        };
    }

    let void_frequency = void_frequency(v_history, config);
    let error = config.weight_void * (void_frequency - config.void_freq_target)
        + config.weight_coherence * (config.coherence_target - coherence);

    state.integral = (state.integral + error).clamp(-config.integral_max, config.integral_max);

    let lambda1_before = theta.lambda1();
    let lambda1_raw = lambda1_before + config.kp * error + config.ki * state.integral;
    let lambda1_min = crate::state::LAMBDA1_SLOPE * config.eta1_min;
    let lambda1_max = crate::state::LAMBDA1_SLOPE * config.eta1_max;
    let lambda1_after = lambda1_raw.clamp(lambda1_min, lambda1_max);
    theta.set_lambda1(lambda1_after, config.eta1_min, config.eta1_max);

    debug!(
        lambda1_before,
        lambda1_after, void_frequency, error, "adaptive gain stepped"
    );

    AdaptationOutcome::Applied {
        lambda1_before,
        lambda1_after,
        void_frequency,
        error,
    }
}

/// Fraction of recent `|v|` samples above the adaptive excursion threshold.
///
/// The threshold is `mean + k·σ` over the same trailing window. An empty
/// history reports zero frequency: no evidence, no excursions.
#[must_use]
pub fn void_frequency(v_history: &HistoryWindow<f64>, config: &ControllerConfig) -> f64 {
    let samples: Vec<f64> = v_history.tail(config.void_window).map(|v| v.abs()).collect();
    if samples.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let threshold = mean + config.void_sigma_k * variance.sqrt();
    #[allow(clippy::cast_precision_loss)]
    let over = samples.iter().filter(|v| **v > threshold).count() as f64;
    over / n
}
