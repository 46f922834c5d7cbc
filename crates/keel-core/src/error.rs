//! Error types for the governance kernel.
//!
//! The kernel distinguishes exactly two failure surfaces:
//!
//! - [`KernelError::ValidationFatal`]: a state variable became NaN or
//!   infinite. The cycle that produced it is aborted and nothing is
//!   committed to the live session.
//! - [`KernelError::Configuration`]: the static configuration is unusable
//!   as given (for example a zero-width risk mapping range) and no
//!   documented fallback applies.
//!
//! Everything else the kernel encounters (small bounds overshoots, a
//! confidence value below the adaptation gate, a missing heuristic risk
//! source) is recovered locally and reported through the returned cycle
//! snapshot, never through this type. Callers that receive `Ok` always
//! get a decision.

use thiserror::Error;

/// Errors that can abort a governance cycle.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A state variable or derived quantity became NaN or infinite.
    ///
    /// This is non-recoverable for the cycle: the working copy is
    /// discarded and the live session keeps its pre-cycle state.
    #[error("fatal validation failure: {field} is not finite (value: {value}) at update {update_count}")]
    ValidationFatal {
        /// Which variable failed the finiteness check.
        field: &'static str,
        /// The offending value, formatted for diagnostics.
        value: f64,
        /// The session's update count at the time of the failure.
        update_count: u64,
    },

    /// The configuration is invalid and no documented fallback applies.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl KernelError {
    /// Returns `true` for failures that must abort the cycle without
    /// committing any state.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ValidationFatal { .. })
    }

    /// Validates that `value` is finite, attributing failures to `field`.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ValidationFatal`] if `value` is NaN or
    /// infinite.
    pub fn check_finite(field: &'static str, value: f64, update_count: u64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::ValidationFatal {
                field,
                value,
                update_count,
            })
        }
    }
}
