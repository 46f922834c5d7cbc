// AGENT-AUTHORED
//! The final verdict-to-action state machine.
//!
//! Checks run in a fixed order; the first match is terminal for the cycle:
//!
//! 1. **Void interlock**: an active void excursion pauses the agent
//!    regardless of risk or coherence. This is the one hard safety stop
//!    that nothing downstream can soften.
//! 2. **High-risk verdict**: pauses; critical only when the blended risk
//!    also clears the rejection threshold.
//! 3. **Critical coherence**: below the phase's critical threshold the
//!    agent pauses to re-ground.
//! 4. **Aware proceed**: a caution verdict with approvable risk proceeds,
//!    reframed as heightened-awareness guidance rather than a block.
//! 5. **Risk ladder**: approve < revise < reject against the phase table:
//!    proceed, proceed-with-revision, soft pause, soft pause.
//!
//! `critical` distinguishes hard safety stops from soft pauses; every
//! pause carries a `reason` and, where useful, a `guidance` hint.

use serde::{Deserialize, Serialize};

use crate::config::PhaseThresholds;
use crate::risk::PhysicsVerdict;

/// The governed action for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// The agent may continue.
    Proceed,
    /// The agent must pause.
    Pause,
}

impl DecisionAction {
    /// Route label retained in decision history for flip counting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Pause => "pause",
        }
    }
}

/// Outcome of the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Proceed or pause.
    pub action: DecisionAction,
    /// Why this action was chosen.
    pub reason: String,
    /// Optional guidance for the paused or cautioned agent.
    pub guidance: Option<String>,
    /// `true` for hard safety stops, `false` for soft pauses.
    pub critical: bool,
}

impl DecisionResult {
    fn proceed(reason: &str) -> Self {
        Self {
            action: DecisionAction::Proceed,
            reason: reason.to_string(),
            guidance: None,
            critical: false,
        }
    }

    fn proceed_with(reason: &str, guidance: &str) -> Self {
        Self {
            action: DecisionAction::Proceed,
            reason: reason.to_string(),
            guidance: Some(guidance.to_string()),
            critical: false,
        }
    }

    fn pause(reason: String, guidance: Option<&str>, critical: bool) -> Self {
        Self {
            action: DecisionAction::Pause,
            reason,
            guidance: guidance.map(ToString::to_string),
            critical,
        }
    }
}

/// Runs the ordered decision checks.
#[must_use]
pub fn decide(
    risk: f64,
    coherence: f64,
    void_active: bool,
    verdict: PhysicsVerdict,
    thresholds: &PhaseThresholds,
) -> DecisionResult {
    // 1. Hard interlock: an active void excursion overrides everything.
    if void_active {
        return DecisionResult::pause(
            "void excursion active: trajectory imbalance exceeds hard limit".to_string(),
            Some("halt and re-ground before continuing; imbalance must decay first"),
            true,
        );
    }

    // 2. High-risk physics verdict.
    if verdict == PhysicsVerdict::HighRisk {
        let critical = risk >= thresholds.risk_reject;
        return DecisionResult::pause(
            format!("physics verdict is high-risk (risk {risk:.2})"),
            Some("reduce drift and complexity before retrying"),
            critical,
        );
    }

    // 3. Coherence below the phase's critical threshold.
    if coherence < thresholds.coherence_critical {
        return DecisionResult::pause(
            format!(
                "coherence {coherence:.2} below critical threshold {:.2}",
                thresholds.coherence_critical
            ),
            Some("stabilize before taking further action"),
            false,
        );
    }

    // 4. Caution verdict with approvable risk proceeds, reframed.
    if verdict == PhysicsVerdict::Caution && risk < thresholds.risk_approve {
        return DecisionResult::proceed_with(
            "caution verdict with approvable risk",
            "proceed with heightened awareness of the flagged caution",
        );
    }

    // 5. Three-tier risk ladder against the phase table.
    if risk < thresholds.risk_approve {
        DecisionResult::proceed("risk within approval threshold")
    } else if risk < thresholds.risk_revise {
        DecisionResult::proceed_with(
            "risk in revision band",
            "revise the current approach to bring risk down",
        )
    } else if risk < thresholds.risk_reject {
        DecisionResult::pause(
            format!(
                "risk {risk:.2} at or above revision threshold {:.2}",
                thresholds.risk_revise
            ),
            Some("pause and rework; risk is above the revision band"),
            false,
        )
    } else {
        DecisionResult::pause(
            format!(
                "risk {risk:.2} at or above rejection threshold {:.2}",
                thresholds.risk_reject
            ),
            Some("stop; this trajectory is rejected at current risk"),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseConfig;

    fn integration() -> PhaseThresholds {
        PhaseConfig::default().integration
    }

    fn exploration() -> PhaseThresholds {
        PhaseConfig::default().exploration
    }

    #[test]
    fn safe_low_risk_proceeds_without_guidance() {
        let result = decide(0.2, 0.85, false, PhysicsVerdict::Safe, &integration());
        assert_eq!(result.action, DecisionAction::Proceed);
        assert!(result.guidance.is_none());
        assert!(!result.critical);
    }

    #[test]
    fn caution_with_elevated_risk_pauses() {
        let result = decide(0.65, 0.85, false, PhysicsVerdict::Caution, &integration());
        assert_eq!(result.action, DecisionAction::Pause);
        assert!(!result.critical);
    }

    #[test]
    fn void_interlock_is_unconditional_and_critical() {
        for (risk, coherence) in [(0.0, 1.0), (1.0, 0.0), (0.2, 0.85)] {
            let result = decide(risk, coherence, true, PhysicsVerdict::Safe, &integration());
            assert_eq!(result.action, DecisionAction::Pause);
            assert!(result.critical);
            assert!(result.reason.contains("void"));
        }
    }

    #[test]
    fn low_coherence_pauses_under_both_phase_tables() {
        // 0.30 < 0.35 exploration-critical and < 0.40 integration-critical.
        let explored = decide(0.2, 0.30, false, PhysicsVerdict::Safe, &exploration());
        assert_eq!(explored.action, DecisionAction::Pause);
        let integrated = decide(0.2, 0.30, false, PhysicsVerdict::Safe, &integration());
        assert_eq!(integrated.action, DecisionAction::Pause);

        // 0.37 sits between the tables: exploration proceeds, integration
        // pauses; the phase wiring is live.
        let explored = decide(0.2, 0.37, false, PhysicsVerdict::Safe, &exploration());
        assert_eq!(explored.action, DecisionAction::Proceed);
        let integrated = decide(0.2, 0.37, false, PhysicsVerdict::Safe, &integration());
        assert_eq!(integrated.action, DecisionAction::Pause);
    }

    #[test]
    fn caution_with_low_risk_proceeds_aware() {
        let result = decide(0.2, 0.85, false, PhysicsVerdict::Caution, &integration());
        assert_eq!(result.action, DecisionAction::Proceed);
        let guidance = result.guidance.expect("aware guidance present");
        assert!(guidance.contains("awareness"));
    }

    #[test]
    fn high_risk_verdict_critical_only_past_reject() {
        let soft = decide(0.5, 0.85, false, PhysicsVerdict::HighRisk, &integration());
        assert_eq!(soft.action, DecisionAction::Pause);
        assert!(!soft.critical);

        let hard = decide(0.8, 0.85, false, PhysicsVerdict::HighRisk, &integration());
        assert_eq!(hard.action, DecisionAction::Pause);
        assert!(hard.critical);
    }

    #[test]
    fn risk_ladder_bands() {
        let thresholds = integration();
        let approve = decide(0.3, 0.85, false, PhysicsVerdict::Safe, &thresholds);
        assert_eq!(approve.action, DecisionAction::Proceed);
        assert!(approve.guidance.is_none());

        let revise = decide(0.45, 0.85, false, PhysicsVerdict::Safe, &thresholds);
        assert_eq!(revise.action, DecisionAction::Proceed);
        assert!(revise.guidance.is_some());

        let reject_band = decide(0.6, 0.85, false, PhysicsVerdict::Safe, &thresholds);
        assert_eq!(reject_band.action, DecisionAction::Pause);
        assert!(!reject_band.critical);

        let rejected = decide(0.8, 0.85, false, PhysicsVerdict::Safe, &thresholds);
        assert_eq!(rejected.action, DecisionAction::Pause);
        assert!(rejected.reason.contains("rejection"));
    }

    #[test]
    fn every_pause_carries_a_reason() {
        let cases = [
            decide(0.0, 1.0, true, PhysicsVerdict::Safe, &integration()),
            decide(0.9, 0.85, false, PhysicsVerdict::HighRisk, &integration()),
            decide(0.2, 0.1, false, PhysicsVerdict::Safe, &integration()),
            decide(0.6, 0.85, false, PhysicsVerdict::Safe, &integration()),
        ];
        for result in cases {
            assert_eq!(result.action, DecisionAction::Pause);
            assert!(!result.reason.is_empty());
        }
    }
}
