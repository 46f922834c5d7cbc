//! Confidence derivation and capping.
//!
//! The kernel never takes a client's confidence at face value. A
//! state-derived confidence is always computed from (information, entropy,
//! coherence, void magnitude); if an outcome-observation collaborator has
//! history for the agent, the derived value is calibrated toward the
//! observed success rate with a reliability that grows with observation
//! count. An externally supplied confidence can only *lower* the result:
//! the final value is `min(external, derived)` with the cap recorded in
//! metadata, so saturating the input cannot bypass the adaptation gate.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceConfig;
use crate::state::EisvState;

/// Outcome-observation summary supplied by an external collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutcomeSummary {
    /// Number of observed outcomes for this agent.
    pub observations: u64,
    /// Fraction of observed outcomes judged successful, in `[0, 1]`.
    pub success_rate: f64,
}

/// Where the final confidence value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// Pure state-derived value; no outcome history was available.
    State,
    /// State-derived value calibrated against observed outcomes.
    Calibrated,
}

/// Metadata accompanying every confidence value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceMetadata {
    /// Provenance of the derived value.
    pub source: ConfidenceSource,
    /// The state-derived (and possibly calibrated) value before capping.
    pub derived: f64,
    /// The externally supplied value, if any.
    pub external: Option<f64>,
    /// Outcome reliability in `[0, 1)`, when calibration ran.
    pub reliability: Option<f64>,
    /// Whether outcome calibration was applied.
    pub calibration_applied: bool,
    /// Whether the external value capped the result below `derived`.
    pub capped: bool,
}

/// Derives the cycle's confidence.
///
/// Returns the final confidence and its metadata. `external` must already
/// be clamped into `[0, 1]` by input validation.
#[must_use]
pub fn derive(
    state: &EisvState,
    coherence: f64,
    external: Option<f64>,
    outcome: Option<&OutcomeSummary>,
    config: &ConfidenceConfig,
) -> (f64, ConfidenceMetadata) {
    let base = (config.w_info * state.i + config.w_coherence * coherence
        + config.w_entropy * (1.0 - state.s)
        - config.w_void * state.v.abs().tanh())
    .clamp(0.0, 1.0);

    let (derived, source, reliability, calibration_applied) = match outcome {
        Some(summary) if summary.observations > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let n = summary.observations as f64;
            let reliability = n / (n + config.reliability_half_count);
            let success = summary.success_rate.clamp(0.0, 1.0);
            let calibrated = ((1.0 - reliability) * base + reliability * success).clamp(0.0, 1.0);
            (calibrated, ConfidenceSource::Calibrated, Some(reliability), true)
        },
        _ => (base, ConfidenceSource::State, None, false),
    };

    let (finalized, capped) = match external {
        Some(ext) if ext < derived => (ext, true),
        Some(_) | None => (derived, false),
    };

    (
        finalized,
        ConfidenceMetadata {
            source,
            derived,
            external,
            reliability,
            calibration_applied,
            capped,
        },
    )
}
