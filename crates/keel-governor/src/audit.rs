//! Audit event taxonomy.
//!
//! The governor emits one audit record per notable control event:
//! adaptation applied or gated, regime transition, resonance trigger, and
//! fatal validation. Emission is fire-and-forget: the kernel never blocks
//! on the audit sink, and a failing sink never fails a cycle.

use chrono::{DateTime, Utc};
use keel_core::ResonanceTrigger;
use serde::{Deserialize, Serialize};

/// A notable control event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum AuditEvent {
    /// The adaptive gain was stepped.
    GainApplied {
        /// λ1 before the step.
        lambda1_before: f64,
        /// λ1 after the step.
        lambda1_after: f64,
        /// Observed void frequency at the attempt.
        void_frequency: f64,
    },
    /// A scheduled adaptation was gated on low confidence.
    GainSkipped {
        /// The cycle's confidence.
        confidence: f64,
        /// The configured gate.
        gate: f64,
    },
    /// The regime classification changed.
    RegimeTransition {
        /// Regime before the cycle.
        from: String,
        /// Regime after the cycle.
        to: String,
    },
    /// The oscillation detector found the session resonant.
    ResonanceTriggered {
        /// Which detector fired.
        trigger: ResonanceTrigger,
        /// Oscillation index at the trigger.
        oi: f64,
        /// Flip count at the trigger.
        flips: usize,
    },
    /// A cycle aborted on fatal validation.
    ValidationFatal {
        /// The kernel's error message.
        reason: String,
    },
}

impl AuditEvent {
    /// Stable event-type string for downstream filtering.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::GainApplied { .. } => "gain.applied",
            Self::GainSkipped { .. } => "gain.skipped",
            Self::RegimeTransition { .. } => "regime.transition",
            Self::ResonanceTriggered { .. } => "resonance.triggered",
            Self::ValidationFatal { .. } => "validation.fatal",
        }
    }
}

/// A timestamped, agent-scoped audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The governed agent.
    pub agent_id: String,
    /// When the record was created.
    pub at: DateTime<Utc>,
    /// The event payload.
    pub event: AuditEvent,
}

impl AuditRecord {
    /// Creates a record stamped now.
    #[must_use]
    pub fn new(agent_id: impl Into<String>, event: AuditEvent) -> Self {
        Self {
            agent_id: agent_id.into(),
            at: Utc::now(),
            event,
        }
    }
}
