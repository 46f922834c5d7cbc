//! # keel-core
//!
//! The pure governance kernel behind KEEL: a nonlinear feedback controller
//! that turns per-interaction signals (an ethical-drift vector, a
//! complexity estimate, optional confidence) into a bounded, auditable
//! proceed/pause decision for an autonomous agent, while resisting
//! gaming, numerical blow-up, and oscillatory flapping between decisions.
//!
//! The crate is deliberately synchronous and I/O-free. Everything that
//! talks to the outside world (persistence, audit, outcome telemetry,
//! heuristic risk scoring) lives behind the orchestration layer in
//! `keel-governor`, which resolves collaborator inputs *before* invoking
//! the kernel.
//!
//! ## Cycle pipeline
//!
//! ```text
//! CycleInput
//!   │ validate / clamp
//!   ▼
//! state::step ──────── explicit-Euler EISV update, clip + floor + NaN gate
//!   ▼
//! state::coherence ─── C(v), always recomputed, never persisted
//!   ▼
//! phase::classify ──── Exploration vs Integration over the trend window
//!   ▼
//! confidence::derive ─ state-derived, outcome-calibrated, min-capped
//!   ▼
//! controller::adapt ── confidence-gated PI step on λ1 (every N cycles)
//!   ▼
//! risk::estimate ───── φ objective → verdict → blend → task adjustment
//!   ▼
//! oscillation ──────── incremental-EMA index + flip count → damping
//!   ▼
//! regime ───────────── macro-trajectory classification
//!   ▼
//! decision::decide ─── ordered checks → proceed/pause + reason/guidance
//! ```
//!
//! [`GovernanceSession::process`] runs this pipeline atomically against a
//! working clone and commits only on full success;
//! [`GovernanceSession::simulate`] runs the identical pipeline on a copy
//! it drops.
//!
//! [`GovernanceSession::process`]: session::GovernanceSession::process
//! [`GovernanceSession::simulate`]: session::GovernanceSession::simulate

#![warn(missing_docs)]

pub mod config;
pub mod confidence;
pub mod controller;
pub mod decision;
pub mod error;
pub mod history;
pub mod input;
pub mod oscillation;
pub mod phase;
pub mod regime;
pub mod risk;
pub mod session;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod proptests;

pub use config::{KernelConfig, PhaseThresholds};
pub use confidence::{ConfidenceMetadata, ConfidenceSource, OutcomeSummary};
pub use controller::{AdaptationOutcome, ControllerState, SkipReason};
pub use decision::{DecisionAction, DecisionResult};
pub use error::KernelError;
pub use history::HistoryWindow;
pub use input::{CycleInput, TaskType};
pub use oscillation::{DamperParams, OscillationAssessment, OscillationState, ResonanceTrigger};
pub use phase::{PhaseLabel, PhaseSignals};
pub use regime::{Regime, RegimeState};
pub use risk::{PhysicsVerdict, RiskBreakdown};
pub use session::{CycleContext, CycleSnapshot, GovernanceSession, RegimeTransition};
pub use snapshot::{SessionSnapshot, SCHEMA_VERSION};
pub use state::{coherence, EisvState, Theta, LAMBDA1_SLOPE};
