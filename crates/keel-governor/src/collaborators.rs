//! External collaborator interfaces.
//!
//! The kernel is pure; everything it needs from the outside world comes
//! through these traits, resolved by the governor *before* a cycle runs.
//! Each trait ships an in-memory or null implementation: the null
//! implementations are the graceful-degradation path (no outcome history,
//! no heuristic score, audit to the void), and the in-memory ones back
//! the integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use keel_core::{OutcomeSummary, SessionSnapshot};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::audit::AuditRecord;

/// Persistence for session snapshots.
///
/// The store is the source of durability, not of truth about derived
/// values: the governor recomputes coherence from the restored void and
/// runs every snapshot through the schema upgrade on load.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the snapshot for an agent, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason on storage failure.
    async fn load(&self, agent_id: &str) -> Result<Option<SessionSnapshot>, String>;

    /// Saves the snapshot for an agent, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason on storage failure.
    async fn save(&self, agent_id: &str, snapshot: SessionSnapshot) -> Result<(), String>;
}

/// Outcome telemetry, consumed only by confidence derivation.
#[async_trait]
pub trait OutcomeObserver: Send + Sync {
    /// Returns the observed-outcome summary for an agent, if any.
    async fn observe(&self, agent_id: &str) -> Option<OutcomeSummary>;
}

/// Fire-and-forget audit sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records an audit event. Failures must be absorbed, not propagated.
    async fn record(&self, record: AuditRecord);
}

/// Opaque heuristic risk scorer.
#[async_trait]
pub trait HeuristicRiskSource: Send + Sync {
    /// Scores a response payload into `[0, 1]`, or `None` when no score
    /// is available.
    async fn score(&self, payload: &serde_json::Value) -> Option<f64>;
}

// ============================================================================
// In-memory / null implementations
// ============================================================================

/// In-memory snapshot store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    inner: RwLock<HashMap<String, SessionSnapshot>>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns `true` when no snapshot has been saved.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, agent_id: &str) -> Result<Option<SessionSnapshot>, String> {
        Ok(self.inner.read().await.get(agent_id).cloned())
    }

    async fn save(&self, agent_id: &str, snapshot: SessionSnapshot) -> Result<(), String> {
        self.inner
            .write()
            .await
            .insert(agent_id.to_string(), snapshot);
        Ok(())
    }
}

/// Observer with no outcome history for anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOutcomes;

#[async_trait]
impl OutcomeObserver for NoOutcomes {
    async fn observe(&self, _agent_id: &str) -> Option<OutcomeSummary> {
        None
    }
}

/// In-memory outcome observer keyed by agent id.
#[derive(Debug, Default)]
pub struct MemoryOutcomeObserver {
    inner: RwLock<HashMap<String, OutcomeSummary>>,
}

impl MemoryOutcomeObserver {
    /// Creates an empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary reported for an agent.
    pub async fn set(&self, agent_id: impl Into<String>, summary: OutcomeSummary) {
        self.inner.write().await.insert(agent_id.into(), summary);
    }
}

#[async_trait]
impl OutcomeObserver for MemoryOutcomeObserver {
    async fn observe(&self, agent_id: &str) -> Option<OutcomeSummary> {
        self.inner.read().await.get(agent_id).copied()
    }
}

/// Audit sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, record: AuditRecord) {
        debug!(
            agent_id = %record.agent_id,
            event = record.event.event_type(),
            "audit event dropped by null sink"
        );
    }
}

/// Audit sink that collects records in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Returns the recorded events of one type.
    pub async fn of_type(&self, event_type: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.event.event_type() == event_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) {
        self.records.lock().await.push(record);
    }
}

/// Risk source with no opinion.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHeuristicRisk;

#[async_trait]
impl HeuristicRiskSource for NoHeuristicRisk {
    async fn score(&self, _payload: &serde_json::Value) -> Option<f64> {
        None
    }
}

/// Risk source returning a fixed score, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedHeuristicRisk(
    /// The score returned for every payload.
    pub f64,
);

#[async_trait]
impl HeuristicRiskSource for FixedHeuristicRisk {
    async fn score(&self, _payload: &serde_json::Value) -> Option<f64> {
        Some(self.0.clamp(0.0, 1.0))
    }
}

/// Convenience bundle of collaborator handles.
#[derive(Clone)]
pub struct Collaborators {
    /// Snapshot persistence.
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Outcome telemetry.
    pub outcomes: Arc<dyn OutcomeObserver>,
    /// Audit sink.
    pub audit: Arc<dyn AuditSink>,
    /// Heuristic risk scorer.
    pub heuristic_risk: Arc<dyn HeuristicRiskSource>,
}

impl Collaborators {
    /// A fully in-memory bundle with null telemetry and risk sources.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            snapshots: Arc::new(MemorySnapshotStore::new()),
            outcomes: Arc::new(NoOutcomes),
            audit: Arc::new(NullAuditSink),
            heuristic_risk: Arc::new(NoHeuristicRisk),
        }
    }
}
