// AGENT-AUTHORED
//! Risk estimation: physics objective, verdict, blend, task adjustment.
//!
//! The physics objective φ is a weighted combination of the post-step
//! state and the drift-vector norm. Its classification into
//! Safe / Caution / HighRisk drives the decision engine's verdict checks,
//! while its piecewise-linear image `phi_risk ∈ [0, 1]` is blended with
//! the externally supplied heuristic risk (defaults 0.7 / 0.3).
//!
//! The task-type adjustment is applied **after** blending and reported as
//! original-vs-adjusted, never silently: a convergent task sitting at the
//! entropy floor gets up to 20% relief on elevated risk (floored), a
//! divergent task at the entropy floor gets up to 15% uplift on low risk
//! (capped). The blend-then-adjust order is load-bearing and must not be
//! reordered.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::RiskConfig;
use crate::input::TaskType;
use crate::state::EisvState;

/// Classification of the physics objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsVerdict {
    /// φ at or below the safe threshold.
    Safe,
    /// φ between the safe and caution thresholds.
    Caution,
    /// φ above the caution threshold.
    HighRisk,
}

impl PhysicsVerdict {
    /// String form used in snapshots and audit payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::HighRisk => "high_risk",
        }
    }
}

/// Full risk breakdown for one cycle, reported in the snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// The physics objective.
    pub phi: f64,
    /// Verdict classification of φ.
    pub verdict: PhysicsVerdict,
    /// Piecewise-linear image of φ in `[0, 1]`.
    pub phi_risk: f64,
    /// Heuristic risk as supplied, if the collaborator answered.
    pub heuristic_risk: Option<f64>,
    /// Blended risk before task adjustment.
    pub original: f64,
    /// Risk after task adjustment; equals `original` when no adjustment
    /// applied.
    pub adjusted: f64,
    /// Whether the task-type adjustment changed the value.
    pub adjustment_applied: bool,
}

/// Computes the physics objective φ from the post-step state and drift.
///
/// `φ = w_entropy·s + w_void·tanh(|v|) + w_drift·(‖δη‖/√3) + w_info·(1−i)`.
/// Each term is bounded, so φ is bounded by the weight sum.
#[must_use]
pub fn phi_objective(state: &EisvState, delta_eta: [f64; 3], config: &RiskConfig) -> f64 {
    let drift_norm = (delta_eta.iter().map(|d| d * d).sum::<f64>()).sqrt() / 3f64.sqrt();
    config.w_entropy * state.s
        + config.w_void * state.v.abs().tanh()
        + config.w_drift * drift_norm
        + config.w_info * (1.0 - state.i)
}

/// Classifies φ into a verdict.
#[must_use]
pub fn verdict(phi: f64, config: &RiskConfig) -> PhysicsVerdict {
    if phi <= config.phi_safe {
        PhysicsVerdict::Safe
    } else if phi <= config.phi_caution {
        PhysicsVerdict::Caution
    } else {
        PhysicsVerdict::HighRisk
    }
}

/// Maps φ through the piecewise-linear risk curve into `[0, 1]`.
///
/// Segments: `[0, phi_safe] -> [0, 1/3]`, `(phi_safe, phi_caution] ->
/// (1/3, 2/3]`, `(phi_caution, 2·phi_caution] -> (2/3, 1]`, clamped at 1
/// beyond. A degenerate range (which [`KernelConfig::validate`] already
/// normalizes away) falls back to the default thresholds here as well, so
/// this function can never divide by zero.
///
/// [`KernelConfig::validate`]: crate::config::KernelConfig::validate
#[must_use]
pub fn phi_to_risk(phi: f64, config: &RiskConfig) -> f64 {
    let (safe, caution) = if config.phi_caution > config.phi_safe && config.phi_safe > 0.0 {
        (config.phi_safe, config.phi_caution)
    } else {
        warn!(
            phi_safe = config.phi_safe,
            phi_caution = config.phi_caution,
            "degenerate phi mapping range; using default thresholds"
        );
        (0.3, 0.6)
    };

    let phi = phi.max(0.0);
    if phi <= safe {
        (phi / safe) * (1.0 / 3.0)
    } else if phi <= caution {
        1.0 / 3.0 + ((phi - safe) / (caution - safe)) * (1.0 / 3.0)
    } else {
        (2.0 / 3.0 + ((phi - caution) / caution) * (1.0 / 3.0)).min(1.0)
    }
}

/// Blends physics-derived and heuristic risk with the configured weights.
///
/// An absent heuristic contributes zero at its configured weight; the
/// physics share is *not* renormalized upward, so a missing collaborator
/// shows up as systematically lower risk rather than being papered over.
#[must_use]
pub fn blend(phi_risk: f64, heuristic_risk: Option<f64>, config: &RiskConfig) -> f64 {
    let heuristic = heuristic_risk.unwrap_or(0.0).clamp(0.0, 1.0);
    (config.phi_weight * phi_risk + config.heuristic_weight * heuristic).clamp(0.0, 1.0)
}

/// Applies the task-type adjustment to the blended risk.
///
/// Returns `(adjusted, applied)`. Only fires when entropy sits at the
/// configured floor: that is the signal the task-type hint is meant to
/// reinterpret.
#[must_use]
pub fn adjust_for_task(
    blended: f64,
    task_type: TaskType,
    s: f64,
    s_floor: f64,
    config: &RiskConfig,
) -> (f64, bool) {
    let at_floor = s <= s_floor;
    match task_type {
        TaskType::Convergent if at_floor && blended > config.elevated_threshold => {
            let adjusted = (blended * (1.0 - config.convergent_relief)).max(config.convergent_floor);
            (adjusted, true)
        },
        TaskType::Divergent if at_floor && blended < config.divergent_cap => {
            let adjusted = (blended * (1.0 + config.divergent_uplift)).min(config.divergent_cap);
            (adjusted, true)
        },
        _ => (blended, false),
    }
}

/// Runs the full risk pipeline for one cycle.
#[must_use]
pub fn estimate(
    state: &EisvState,
    delta_eta: [f64; 3],
    heuristic_risk: Option<f64>,
    task_type: TaskType,
    s_floor: f64,
    config: &RiskConfig,
) -> RiskBreakdown {
    let phi = phi_objective(state, delta_eta, config);
    let verdict = verdict(phi, config);
    let phi_risk = phi_to_risk(phi, config);
    let original = blend(phi_risk, heuristic_risk, config);
    let (adjusted, adjustment_applied) =
        adjust_for_task(original, task_type, state.s, s_floor, config);
    RiskBreakdown {
        phi,
        verdict,
        phi_risk,
        heuristic_risk,
        original,
        adjusted,
        adjustment_applied,
    }
}
