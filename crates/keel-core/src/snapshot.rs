//! Versioned session snapshots.
//!
//! A snapshot is the full persisted image of one agent's session: state,
//! theta, damper references, oscillation accumulators, controller state,
//! regime, bounded histories, and counters. Snapshots carry an explicit
//! `schema_version`; all backward compatibility lives in one
//! [`SessionSnapshot::upgrade`] call run once at load time, never in
//! scattered default-lookups on the hot path.
//!
//! Coherence is deliberately absent: it is a pure function of `v` and is
//! recomputed wherever needed, so a formula change can never leave a stale
//! persisted value alive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::controller::ControllerState;
use crate::history::HistoryWindow;
use crate::oscillation::{DamperParams, OscillationState};
use crate::regime::{Regime, RegimeState};
use crate::state::{EisvState, Theta};

/// Current snapshot schema version.
///
/// - v1: predates the persisted oscillation EMAs and PI integral.
/// - v2: adds `oscillation` and `controller` state.
pub const SCHEMA_VERSION: u32 = 2;

/// Bounded history arrays persisted with a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotHistories {
    /// Information samples.
    pub i: HistoryWindow<f64>,
    /// Entropy samples.
    pub s: HistoryWindow<f64>,
    /// Complexity samples.
    pub complexity: HistoryWindow<f64>,
    /// Void samples (signed).
    pub v: HistoryWindow<f64>,
    /// Adjusted risk samples.
    pub risk: HistoryWindow<f64>,
    /// Decision route labels.
    pub routes: HistoryWindow<String>,
    /// Regime classifications.
    pub regimes: HistoryWindow<Regime>,
}

/// The persisted image of one agent's governance session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    /// Schema version tag; see [`SCHEMA_VERSION`].
    pub schema_version: u32,

    /// The governed agent's identifier.
    pub agent_id: String,

    /// EISV state at the last committed cycle.
    pub state: EisvState,

    /// Control parameters (gain represented solely via `eta1`).
    pub theta: Theta,

    /// Damper reference thresholds.
    pub damper: DamperParams,

    /// Oscillation accumulators and sign window. Absent in v1 snapshots.
    #[serde(default)]
    pub oscillation: Option<OscillationState>,

    /// PI integral and interval counter. Absent in v1 snapshots.
    #[serde(default)]
    pub controller: Option<ControllerState>,

    /// Regime classification and STABLE streak.
    pub regime: RegimeState,

    /// Bounded history arrays.
    pub histories: SnapshotHistories,

    /// Monotonic count of committed cycles.
    pub update_count: u64,

    /// When the session was first created.
    pub created_at: DateTime<Utc>,

    /// When the session last committed a cycle.
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Upgrades an older snapshot to the current schema, in place.
    ///
    /// This is the single compatibility point: a v1 snapshot (or a
    /// corrupted v2 missing its accumulators) gets zeroed oscillation and
    /// controller state with an explicit warning; detection and
    /// adaptation restart from scratch, visibly, never silently.
    #[must_use]
    pub fn upgrade(mut self, oscillation_window: usize) -> Self {
        if self.schema_version < SCHEMA_VERSION {
            warn!(
                agent_id = %self.agent_id,
                from = self.schema_version,
                to = SCHEMA_VERSION,
                "upgrading session snapshot schema"
            );
        }
        if self.oscillation.is_none() {
            warn!(
                agent_id = %self.agent_id,
                "snapshot lacks oscillation accumulators; resetting detection state"
            );
            self.oscillation = Some(OscillationState {
                ema_coherence: 0.0,
                ema_risk: 0.0,
                signs: HistoryWindow::new(oscillation_window),
            });
        }
        if self.controller.is_none() {
            warn!(
                agent_id = %self.agent_id,
                "snapshot lacks controller state; resetting PI integral"
            );
            self.controller = Some(ControllerState::default());
        }
        self.schema_version = SCHEMA_VERSION;
        self
    }
}
