//! Error types for the orchestration layer.

use thiserror::Error;

/// Errors surfaced by the governor.
///
/// Only kernel failures and persistence failures abort a cycle. Audit,
/// outcome, and heuristic-risk collaborators degrade gracefully: their
/// failures are logged and the cycle proceeds without them.
#[derive(Debug, Error)]
pub enum GovernorError {
    /// The kernel aborted the cycle (fatal validation or configuration).
    #[error(transparent)]
    Kernel(#[from] keel_core::KernelError),

    /// The snapshot store failed to load or save.
    #[error("persistence failure for agent {agent_id}: {reason}")]
    Persistence {
        /// The agent whose snapshot was being handled.
        agent_id: String,
        /// What went wrong.
        reason: String,
    },
}
