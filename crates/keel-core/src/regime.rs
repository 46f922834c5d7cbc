//! Macro-trajectory regime classification.
//!
//! Where the phase detector looks at a short trend window, the regime
//! detector classifies the overall shape of the trajectory from the
//! current state and its per-cycle deltas:
//!
//! - **Stable**: information saturated and entropy at the floor, held for
//!   the configured number of consecutive cycles. The persistence counter
//!   resets on any non-qualifying cycle, so a single wobble restarts the
//!   clock.
//! - **Divergence**: entropy rising (or plateaued high) with an elevated
//!   void magnitude. Also the default when nothing else matches.
//! - **Transition**: entropy falling while information rises.
//! - **Convergence**: entropy low and not rising, information high.
//!
//! Classification has exactly two side effects: the updated persistence
//! counter and a log line on transitions.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RegimeConfig;

/// Macro-trajectory classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Entropy rising or plateaued high with elevated void. The default.
    #[default]
    Divergence,
    /// Entropy falling while information rises.
    Transition,
    /// Entropy low, information high.
    Convergence,
    /// Saturated and quiet for the required consecutive cycles.
    Stable,
}

impl Regime {
    /// String form used in snapshots and audit payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Divergence => "divergence",
            Self::Transition => "transition",
            Self::Convergence => "convergence",
            Self::Stable => "stable",
        }
    }
}

/// Persistent regime state: current label plus the STABLE streak counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RegimeState {
    /// Most recent classification.
    pub current: Regime,
    /// Consecutive STABLE-qualifying cycles seen so far.
    pub stable_streak: u32,
}

impl RegimeState {
    /// Classifies the current cycle and updates the persistence counter.
    ///
    /// `ds` and `di` are the per-cycle deltas of entropy and information.
    /// Logs when the classification changes.
    pub fn classify(
        &mut self,
        i: f64,
        s: f64,
        v_abs: f64,
        ds: f64,
        di: f64,
        config: &RegimeConfig,
    ) -> Regime {
        let qualifies = i >= config.stable_i_min && s <= config.stable_s_max;
        if qualifies {
            self.stable_streak = self.stable_streak.saturating_add(1);
        } else {
            self.stable_streak = 0;
        }

        let eps = config.trend_eps;
        let next = if qualifies && self.stable_streak >= config.stable_cycles {
            Regime::Stable
        } else if (ds > eps || (ds.abs() <= eps && s >= config.s_high)) && v_abs > config.v_elevated
        {
            Regime::Divergence
        } else if ds < -eps && di > eps {
            Regime::Transition
        } else if s <= config.s_low && ds < eps && i >= config.i_high {
            Regime::Convergence
        } else {
            Regime::Divergence
        };

        if next != self.current {
            info!(from = self.current.as_str(), to = next.as_str(), "regime transition");
        }
        self.current = next;
        next
    }
}
