//! Validated cycle input.
//!
//! One governance cycle consumes exactly one [`CycleInput`]: the drift
//! vector and complexity estimate produced by the interaction, plus the
//! optional signals (external confidence, timestep, noise) and an opaque
//! response payload that is passed through to the heuristic risk
//! collaborator untouched.
//!
//! Construction is the validation boundary: non-finite numbers are rejected
//! here, before any state is touched, so the step integrator only ever sees
//! finite inputs. Out-of-range but finite values (complexity 1.3, confidence
//! -0.1) are clamped with a warning; a misbehaving client gets a decision,
//! not an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::KernelError;

/// Task-type hint supplied by the caller, used only by the risk adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// No adjustment either way.
    #[default]
    Analytical,
    /// Convergent work: zero entropy is expected, elevated risk is relieved.
    Convergent,
    /// Divergent work: zero entropy is suspicious, low risk is raised.
    Divergent,
}

impl TaskType {
    /// String form used in snapshots and audit payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Convergent => "convergent",
            Self::Divergent => "divergent",
        }
    }
}

/// Input signals for one governance cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleInput {
    /// Ethical-drift vector for the interaction.
    pub ethical_drift: [f64; 3],

    /// Complexity estimate in `[0, 1]`.
    pub complexity: f64,

    /// Task-type hint for risk adjustment.
    #[serde(default)]
    pub task_type: TaskType,

    /// Externally supplied confidence, if any. Final confidence is the
    /// minimum of this and the state-derived value.
    #[serde(default)]
    pub confidence: Option<f64>,

    /// Integration timestep; the configured default applies when absent.
    #[serde(default)]
    pub dt: Option<f64>,

    /// Additive noise applied to the energy variable.
    #[serde(default)]
    pub noise: f64,

    /// Opaque response payload forwarded to the heuristic risk collaborator.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CycleInput {
    /// Creates an input with the given drift and complexity and neutral
    /// defaults for everything else.
    #[must_use]
    pub fn new(ethical_drift: [f64; 3], complexity: f64) -> Self {
        Self {
            ethical_drift,
            complexity,
            task_type: TaskType::default(),
            confidence: None,
            dt: None,
            noise: 0.0,
            payload: serde_json::Value::Null,
        }
    }

    /// Sets the task type.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Sets an externally supplied confidence.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Sets the integration timestep.
    #[must_use]
    pub const fn with_dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Sets the response payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Rejects non-finite numeric fields.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ValidationFatal`] naming the first non-finite
    /// field.
    pub fn validate(&self, update_count: u64) -> Result<(), KernelError> {
        for (idx, d) in self.ethical_drift.iter().enumerate() {
            if !d.is_finite() {
                return Err(KernelError::ValidationFatal {
                    field: drift_field_name(idx),
                    value: *d,
                    update_count,
                });
            }
        }
        KernelError::check_finite("complexity", self.complexity, update_count)?;
        if let Some(c) = self.confidence {
            KernelError::check_finite("confidence", c, update_count)?;
        }
        if let Some(dt) = self.dt {
            KernelError::check_finite("dt", dt, update_count)?;
            if dt <= 0.0 {
                return Err(KernelError::ValidationFatal {
                    field: "dt",
                    value: dt,
                    update_count,
                });
            }
        }
        KernelError::check_finite("noise", self.noise, update_count)?;
        Ok(())
    }

    /// Clamps finite but out-of-range fields into their documented ranges.
    ///
    /// Returns `true` if anything was clamped. Call after [`validate`]
    /// succeeded; the clamp is a minor anomaly reflected in the snapshot,
    /// not an error.
    ///
    /// [`validate`]: Self::validate
    pub fn clamp_ranges(&mut self) -> bool {
        let mut clamped = false;
        if !(0.0..=1.0).contains(&self.complexity) {
            warn!(complexity = self.complexity, "complexity outside [0, 1]; clamping");
            self.complexity = self.complexity.clamp(0.0, 1.0);
            clamped = true;
        }
        if let Some(c) = self.confidence {
            if !(0.0..=1.0).contains(&c) {
                warn!(confidence = c, "confidence outside [0, 1]; clamping");
                self.confidence = Some(c.clamp(0.0, 1.0));
                clamped = true;
            }
        }
        clamped
    }
}

const fn drift_field_name(idx: usize) -> &'static str {
    match idx {
        0 => "ethical_drift[0]",
        1 => "ethical_drift[1]",
        _ => "ethical_drift[2]",
    }
}
