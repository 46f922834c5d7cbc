//! # keel-governor
//!
//! Async orchestration for the KEEL governance kernel. This crate owns
//! everything `keel-core` deliberately does not: per-agent advisory
//! locking, collaborator wiring (persistence, outcome telemetry, audit,
//! heuristic risk), and the load → process → persist → audit cycle.
//!
//! The concurrency model is one advisory lock per agent id: `process`
//! holds it for the whole cycle, `simulate` only long enough to copy the
//! session. Sessions for different agents share no mutable state, so
//! their cycles interleave freely. The kernel itself contains no
//! suspension points; every await in this crate happens either before the
//! pipeline runs (collaborator resolution) or after it committed
//! (persistence, audit).

#![warn(missing_docs)]

pub mod audit;
pub mod collaborators;
pub mod error;
pub mod governor;
pub mod store;

pub use audit::{AuditEvent, AuditRecord};
pub use collaborators::{
    AuditSink, Collaborators, FixedHeuristicRisk, HeuristicRiskSource, MemoryAuditSink,
    MemoryOutcomeObserver, MemorySnapshotStore, NoHeuristicRisk, NoOutcomes, NullAuditSink,
    OutcomeObserver, SnapshotStore,
};
pub use error::GovernorError;
pub use governor::Governor;
pub use store::{SessionSlot, SessionStore};
