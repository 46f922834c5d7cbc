//! Phase detection: Exploration vs Integration.
//!
//! The phase detector is a pure function of a trailing window of
//! information, entropy, and complexity samples. Three boolean signals
//! vote for Exploration:
//!
//! 1. information growing faster than the configured rate,
//! 2. entropy declining faster than the configured rate,
//! 3. mean complexity above the configured threshold.
//!
//! Two of three votes classify the window as Exploration; anything less
//! (including an insufficient window) is Integration, the conservative
//! default. Each phase carries its own decision-threshold table: an
//! exploring agent is allowed lower coherence before a critical pause but
//! is held to stricter risk limits.

use serde::{Deserialize, Serialize};

use crate::config::{PhaseConfig, PhaseThresholds};
use crate::history::HistoryWindow;

/// Trajectory phase over the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    /// Rapid information uptake; thresholds loosen on coherence and
    /// tighten on risk.
    Exploration,
    /// Consolidation; the default when history is insufficient.
    #[default]
    Integration,
}

impl PhaseLabel {
    /// String form used in snapshots and audit payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exploration => "exploration",
            Self::Integration => "integration",
        }
    }
}

/// The individual trend signals behind a classification, kept for
/// observability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseSignals {
    /// Per-cycle information growth rate over the window.
    pub i_growth: f64,
    /// Per-cycle entropy decline rate over the window.
    pub s_decline: f64,
    /// Mean complexity over the window.
    pub mean_complexity: f64,
    /// How many of the three signals voted for Exploration.
    pub exploration_votes: u8,
}

/// Classifies the trailing window, returning the phase and its signals.
#[must_use]
pub fn classify(
    i_history: &HistoryWindow<f64>,
    s_history: &HistoryWindow<f64>,
    complexity_history: &HistoryWindow<f64>,
    config: &PhaseConfig,
) -> (PhaseLabel, PhaseSignals) {
    let len = i_history
        .len()
        .min(s_history.len())
        .min(complexity_history.len());

    // Trend rates need at least two samples regardless of configuration.
    if len < config.min_samples.max(2) {
        return (
            PhaseLabel::Integration,
            PhaseSignals {
                i_growth: 0.0,
                s_decline: 0.0,
                mean_complexity: 0.0,
                exploration_votes: 0,
            },
        );
    }

    let n = len.min(config.window);
    let i_tail: Vec<f64> = i_history.tail(n).copied().collect();
    let s_tail: Vec<f64> = s_history.tail(n).copied().collect();
    let cx_tail: Vec<f64> = complexity_history.tail(n).copied().collect();

    #[allow(clippy::cast_precision_loss)]
    let span = n as f64;
    let i_growth = (i_tail[n - 1] - i_tail[0]) / span;
    let s_decline = (s_tail[0] - s_tail[n - 1]) / span;
    let mean_complexity = cx_tail.iter().sum::<f64>() / span;

    let mut votes = 0u8;
    if i_growth > config.i_growth_threshold {
        votes += 1;
    }
    if s_decline > config.s_decline_threshold {
        votes += 1;
    }
    if mean_complexity > config.complexity_threshold {
        votes += 1;
    }

    let label = if votes >= 2 {
        PhaseLabel::Exploration
    } else {
        PhaseLabel::Integration
    };

    (
        label,
        PhaseSignals {
            i_growth,
            s_decline,
            mean_complexity,
            exploration_votes: votes,
        },
    )
}

/// Returns the decision-threshold table for a phase.
#[must_use]
pub const fn thresholds(phase: PhaseLabel, config: &PhaseConfig) -> &PhaseThresholds {
    match phase {
        PhaseLabel::Exploration => &config.exploration,
        PhaseLabel::Integration => &config.integration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(
        i: &[f64],
        s: &[f64],
        cx: &[f64],
    ) -> (HistoryWindow<f64>, HistoryWindow<f64>, HistoryWindow<f64>) {
        let mut iw = HistoryWindow::new(32);
        let mut sw = HistoryWindow::new(32);
        let mut cw = HistoryWindow::new(32);
        for &x in i {
            iw.push(x);
        }
        for &x in s {
            sw.push(x);
        }
        for &x in cx {
            cw.push(x);
        }
        (iw, sw, cw)
    }

    #[test]
    fn insufficient_history_defaults_to_integration() {
        let (iw, sw, cw) = windows(&[0.5, 0.6], &[0.5, 0.4], &[0.9, 0.9]);
        let (label, signals) = classify(&iw, &sw, &cw, &PhaseConfig::default());
        assert_eq!(label, PhaseLabel::Integration);
        assert_eq!(signals.exploration_votes, 0);
    }

    #[test]
    fn growing_info_falling_entropy_is_exploration() {
        // Strong information growth and entropy decline: two votes.
        let i: Vec<f64> = (0..8).map(|n| 0.3 + 0.05 * f64::from(n)).collect();
        let s: Vec<f64> = (0..8).map(|n| 0.7 - 0.05 * f64::from(n)).collect();
        let cx = vec![0.2; 8];
        let (iw, sw, cw) = windows(&i, &s, &cx);
        let (label, signals) = classify(&iw, &sw, &cw, &PhaseConfig::default());
        assert_eq!(label, PhaseLabel::Exploration);
        assert_eq!(signals.exploration_votes, 2);
    }

    #[test]
    fn one_vote_is_integration() {
        // Only mean complexity votes; flat information and entropy.
        let (iw, sw, cw) = windows(&[0.5; 8], &[0.5; 8], &[0.9; 8]);
        let (label, signals) = classify(&iw, &sw, &cw, &PhaseConfig::default());
        assert_eq!(label, PhaseLabel::Integration);
        assert_eq!(signals.exploration_votes, 1);
    }

    #[test]
    fn complexity_tips_a_single_trend_into_exploration() {
        let i: Vec<f64> = (0..8).map(|n| 0.3 + 0.05 * f64::from(n)).collect();
        let (iw, sw, cw) = windows(&i, &[0.5; 8], &[0.9; 8]);
        let (label, _) = classify(&iw, &sw, &cw, &PhaseConfig::default());
        assert_eq!(label, PhaseLabel::Exploration);
    }

    #[test]
    fn threshold_tables_differ_by_phase() {
        let config = PhaseConfig::default();
        let exploration = thresholds(PhaseLabel::Exploration, &config);
        let integration = thresholds(PhaseLabel::Integration, &config);
        assert!(exploration.coherence_critical < integration.coherence_critical);
        assert!(exploration.risk_approve > integration.risk_approve);
    }
}
