// AGENT-AUTHORED
//! The governor service: one atomic governance cycle per call.
//!
//! `process` wires a full cycle end-to-end:
//!
//! 1. resolve collaborator inputs (heuristic risk, outcome summary),
//!    the only awaits that touch the outside world, done *before* the
//!    kernel runs;
//! 2. take the agent's advisory lock;
//! 3. load-or-create the session (snapshot upgrade happens here, once);
//! 4. run the kernel pipeline (pure, no suspension points);
//! 5. persist the new snapshot;
//! 6. release the lock and emit audit events fire-and-forget.
//!
//! `simulate` resolves the same inputs, copies the session under a brief
//! lock, then runs the identical pipeline unlocked against the private
//! copy; it never persists, never audits control changes, and never
//! advances the live session.

use std::sync::Arc;

use keel_core::{
    AdaptationOutcome, CycleContext, CycleInput, CycleSnapshot, GovernanceSession, KernelConfig,
    SkipReason,
};
use tracing::{error, instrument};

use crate::audit::{AuditEvent, AuditRecord};
use crate::collaborators::Collaborators;
use crate::error::GovernorError;
use crate::store::SessionStore;

/// Orchestrates governance cycles across agents.
pub struct Governor {
    config: Arc<KernelConfig>,
    store: SessionStore,
    collaborators: Collaborators,
}

impl Governor {
    /// Creates a governor with the given configuration and collaborators.
    #[must_use]
    pub fn new(config: KernelConfig, collaborators: Collaborators) -> Self {
        Self {
            config: Arc::new(config),
            store: SessionStore::new(),
            collaborators,
        }
    }

    /// The active kernel configuration.
    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of agents with a registered session slot.
    pub async fn session_count(&self) -> usize {
        self.store.len().await
    }

    /// Runs one committed governance cycle for an agent.
    ///
    /// # Errors
    ///
    /// Returns [`GovernorError::Kernel`] when the cycle aborts on fatal
    /// validation (nothing is committed or persisted), and
    /// [`GovernorError::Persistence`] when the snapshot store fails.
    #[instrument(skip(self, input), fields(agent_id = %agent_id))]
    pub async fn process(
        &self,
        agent_id: &str,
        input: CycleInput,
    ) -> Result<CycleSnapshot, GovernorError> {
        let ctx = self.resolve_context(agent_id, &input).await;

        let slot = self.store.slot(agent_id).await;
        let mut guard = slot.lock().await;

        if guard.session.is_none() {
            guard.session = Some(self.load_or_create(agent_id).await?);
        }
        let session = guard.session.as_mut().expect("slot populated above");

        let snapshot = match session.process(&input, &ctx, &self.config) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(agent_id, %err, "governance cycle aborted");
                self.emit(AuditRecord::new(
                    agent_id,
                    AuditEvent::ValidationFatal {
                        reason: err.to_string(),
                    },
                ));
                return Err(err.into());
            },
        };

        // Persist while still holding the agent's lock: a racing cycle
        // must never save an older snapshot over a newer one.
        let persisted = session.snapshot();
        self.collaborators
            .snapshots
            .save(agent_id, persisted)
            .await
            .map_err(|reason| GovernorError::Persistence {
                agent_id: agent_id.to_string(),
                reason,
            })?;
        drop(guard);

        self.audit_cycle(agent_id, &snapshot);
        Ok(snapshot)
    }

    /// Runs one dry-run cycle against a private copy of the session.
    ///
    /// The lock is held only long enough to copy; the pipeline then runs
    /// unlocked, so a long simulation never starves real cycles. Nothing
    /// is persisted or audited.
    ///
    /// # Errors
    ///
    /// Same kernel failure surface as [`process`](Self::process); the
    /// error refers to the discarded copy.
    #[instrument(skip(self, input), fields(agent_id = %agent_id))]
    pub async fn simulate(
        &self,
        agent_id: &str,
        input: CycleInput,
    ) -> Result<CycleSnapshot, GovernorError> {
        let ctx = self.resolve_context(agent_id, &input).await;

        let slot = self.store.slot(agent_id).await;
        let session = {
            let mut guard = slot.lock().await;
            if guard.session.is_none() {
                guard.session = Some(self.load_or_create(agent_id).await?);
            }
            guard.session.as_ref().expect("slot populated above").clone()
        };

        Ok(session.simulate(&input, &ctx, &self.config)?)
    }

    /// Resolves collaborator inputs for a cycle. Collaborator failures
    /// degrade to absence, never abort the cycle.
    async fn resolve_context(&self, agent_id: &str, input: &CycleInput) -> CycleContext {
        let heuristic_risk = self.collaborators.heuristic_risk.score(&input.payload).await;
        let outcome = self.collaborators.outcomes.observe(agent_id).await;
        CycleContext {
            heuristic_risk,
            outcome,
        }
    }

    /// Loads an agent's session from the snapshot store, or creates a
    /// fresh one on first contact.
    async fn load_or_create(&self, agent_id: &str) -> Result<GovernanceSession, GovernorError> {
        match self.collaborators.snapshots.load(agent_id).await {
            Ok(Some(snapshot)) => Ok(GovernanceSession::restore(snapshot, &self.config)),
            Ok(None) => Ok(GovernanceSession::new(agent_id, &self.config)),
            Err(reason) => Err(GovernorError::Persistence {
                agent_id: agent_id.to_string(),
                reason,
            }),
        }
    }

    /// Emits the audit events a committed cycle produced.
    fn audit_cycle(&self, agent_id: &str, snapshot: &CycleSnapshot) {
        match snapshot.adaptation {
            AdaptationOutcome::Applied {
                lambda1_before,
                lambda1_after,
                void_frequency,
                ..
            } => {
                self.emit(AuditRecord::new(
                    agent_id,
                    AuditEvent::GainApplied {
                        lambda1_before,
                        lambda1_after,
                        void_frequency,
                    },
                ));
            },
            AdaptationOutcome::Skipped {
                reason: SkipReason::LowConfidence { confidence, gate },
            } => {
                self.emit(AuditRecord::new(
                    agent_id,
                    AuditEvent::GainSkipped { confidence, gate },
                ));
            },
            AdaptationOutcome::Skipped {
                reason: SkipReason::Interval,
            } => {},
        }

        if let Some(transition) = snapshot.regime_transition {
            self.emit(AuditRecord::new(
                agent_id,
                AuditEvent::RegimeTransition {
                    from: transition.from.as_str().to_string(),
                    to: transition.to.as_str().to_string(),
                },
            ));
        }

        if snapshot.oscillation.resonant {
            self.emit(AuditRecord::new(
                agent_id,
                AuditEvent::ResonanceTriggered {
                    trigger: snapshot.oscillation.trigger,
                    oi: snapshot.oscillation.oi,
                    flips: snapshot.oscillation.flips,
                },
            ));
        }
    }

    /// Fire-and-forget audit emission.
    fn emit(&self, record: AuditRecord) {
        let sink = Arc::clone(&self.collaborators.audit);
        tokio::spawn(async move {
            sink.record(record).await;
        });
    }
}

impl std::fmt::Debug for Governor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MemorySnapshotStore;

    #[tokio::test]
    async fn first_contact_creates_and_persists_a_session() {
        let collaborators = Collaborators::in_memory();
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let collaborators = Collaborators {
            snapshots: Arc::clone(&snapshots) as Arc<dyn crate::collaborators::SnapshotStore>,
            ..collaborators
        };
        let governor = Governor::new(KernelConfig::default(), collaborators);

        let snapshot = governor
            .process("agent-1", CycleInput::new([0.0, 0.0, 0.0], 0.3))
            .await
            .unwrap();
        assert_eq!(snapshot.update_count, 1);
        assert_eq!(snapshots.len().await, 1);
        assert_eq!(governor.session_count().await, 1);
    }
}
