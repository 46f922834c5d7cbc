// AGENT-AUTHORED
//! Oscillation detection and resonance damping.
//!
//! A governed agent can end up flapping: coherence hovering around a
//! threshold, risk crossing back and forth, decisions alternating between
//! proceed and pause. This module detects that condition and damps it.
//!
//! Detection tracks two things over a bounded window:
//!
//! - the **oscillation index** `oi`: the sum of two exponential moving
//!   averages over the per-cycle *change* of `sign(coherence - tau)` and
//!   `sign(risk - beta)`. The accumulators are updated incrementally from
//!   only the newest transition and persist across cycles (and through
//!   snapshots); they are never recomputed from the whole window.
//! - the **flip count**: adjacent decision-route changes within the window.
//!
//! Either signal past its phase-scaled threshold marks the session
//! resonant. The damper then pulls the sign references `tau` and `beta`
//! toward the current coherence and risk, with the per-step adjustment
//! clamped and the results held inside configured bounds. Moving the
//! references toward the signals is what breaks the flapping: the signs
//! stop alternating once the reference sits on the signal's side. During
//! Exploration the pull rate is halved; an exploring trajectory is
//! expected to swing, and an aggressive damper would chase it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OscillationConfig;
use crate::history::HistoryWindow;
use crate::phase::PhaseLabel;

/// What tripped the resonance detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceTrigger {
    /// The oscillation index crossed its phase-scaled threshold.
    Oi,
    /// The flip count crossed its phase-scaled threshold.
    Flips,
    /// Not resonant.
    #[default]
    None,
}

impl ResonanceTrigger {
    /// String form used in snapshots and audit payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oi => "oi",
            Self::Flips => "flips",
            Self::None => "none",
        }
    }
}

/// One sign sample: which side of the references the signals were on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignSample {
    /// `sign(coherence - tau)`.
    pub coherence_sign: i8,
    /// `sign(risk - beta)`.
    pub risk_sign: i8,
}

/// Damper-owned reference thresholds the sign products are taken against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DamperParams {
    /// Coherence reference, held in `[tau_min, tau_max]`.
    pub tau: f64,
    /// Risk reference, held in `[beta_min, beta_max]`.
    pub beta: f64,
}

impl DamperParams {
    /// Builds the references from the configured defaults.
    #[must_use]
    pub fn from_config(config: &OscillationConfig) -> Self {
        Self {
            tau: config.tau_default,
            beta: config.beta_default,
        }
    }
}

/// Persistent oscillation-detection state.
///
/// The EMA accumulators and the sign window survive across cycles and
/// round-trip through session snapshots; losing them resets detection,
/// which is only acceptable as the explicit, logged snapshot-upgrade
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OscillationState {
    /// EMA over per-cycle changes of the coherence sign.
    pub ema_coherence: f64,
    /// EMA over per-cycle changes of the risk sign.
    pub ema_risk: f64,
    /// Bounded window of recent sign samples.
    pub signs: HistoryWindow<SignSample>,
}

impl OscillationState {
    /// Creates empty detection state with the configured window.
    #[must_use]
    pub fn new(config: &OscillationConfig) -> Self {
        Self {
            ema_coherence: 0.0,
            ema_risk: 0.0,
            signs: HistoryWindow::new(config.window),
        }
    }

    /// Ingests one cycle's signals and assesses resonance.
    ///
    /// `routes` is the bounded decision history; flips are counted over
    /// adjacent entries. The EMA update consumes only the transition from
    /// the previous sample to this one.
    pub fn update(
        &mut self,
        coherence: f64,
        risk: f64,
        damper: &DamperParams,
        routes: &HistoryWindow<String>,
        phase: PhaseLabel,
        config: &OscillationConfig,
    ) -> OscillationAssessment {
        let sample = SignSample {
            coherence_sign: sign(coherence - damper.tau),
            risk_sign: sign(risk - damper.beta),
        };

        let (d_coherence, d_risk) = match self.signs.back() {
            Some(prev) => (
                f64::from(sample.coherence_sign - prev.coherence_sign),
                f64::from(sample.risk_sign - prev.risk_sign),
            ),
            None => (0.0, 0.0),
        };

        let lambda = config.ema_lambda;
        self.ema_coherence = lambda * d_coherence + (1.0 - lambda) * self.ema_coherence;
        self.ema_risk = lambda * d_risk + (1.0 - lambda) * self.ema_risk;
        self.signs.push(sample);

        let oi = self.ema_coherence + self.ema_risk;
        let flips = count_flips(routes, config.window);

        let oi_threshold = match phase {
            PhaseLabel::Exploration => config.oi_threshold * config.exploration_oi_scale,
            PhaseLabel::Integration => config.oi_threshold,
        };
        let flip_threshold = match phase {
            PhaseLabel::Exploration => config.flip_threshold + config.exploration_flip_bonus,
            PhaseLabel::Integration => config.flip_threshold,
        };

        let trigger = if oi.abs() >= oi_threshold {
            ResonanceTrigger::Oi
        } else if flips >= flip_threshold {
            ResonanceTrigger::Flips
        } else {
            ResonanceTrigger::None
        };

        if trigger != ResonanceTrigger::None {
            debug!(
                oi,
                flips,
                trigger = trigger.as_str(),
                phase = phase.as_str(),
                "resonance detected"
            );
        }

        OscillationAssessment {
            oi,
            flips,
            resonant: trigger != ResonanceTrigger::None,
            trigger,
        }
    }
}

/// Per-cycle view of the detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OscillationAssessment {
    /// Current oscillation index.
    pub oi: f64,
    /// Adjacent route changes in the window.
    pub flips: usize,
    /// Whether either trigger fired.
    pub resonant: bool,
    /// Which trigger fired, if any.
    pub trigger: ResonanceTrigger,
}

/// Pulls the references toward the current signals while resonant.
///
/// The per-step adjustment is clamped to `±delta_max` and the results are
/// clamped to the configured bounds, so even pathological inputs cannot
/// drag a reference outside its range or move it faster than the
/// configured rate.
#[must_use]
pub fn damp(
    params: &DamperParams,
    coherence: f64,
    risk: f64,
    phase: PhaseLabel,
    config: &OscillationConfig,
) -> DamperParams {
    let kappa = match phase {
        PhaseLabel::Exploration => config.kappa / 2.0,
        PhaseLabel::Integration => config.kappa,
    };

    let tau_step = (kappa * (coherence - params.tau)).clamp(-config.delta_max, config.delta_max);
    let beta_step = (kappa * (risk - params.beta)).clamp(-config.delta_max, config.delta_max);

    DamperParams {
        tau: (params.tau + tau_step).clamp(config.tau_min, config.tau_max),
        beta: (params.beta + beta_step).clamp(config.beta_min, config.beta_max),
    }
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn count_flips(routes: &HistoryWindow<String>, window: usize) -> usize {
    let tail: Vec<&String> = routes.tail(window).collect();
    tail.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OscillationConfig {
        OscillationConfig::default()
    }

    fn route_window(labels: &[&str]) -> HistoryWindow<String> {
        let mut routes = HistoryWindow::new(64);
        for l in labels {
            routes.push((*l).to_string());
        }
        routes
    }

    #[test]
    fn alternating_routes_trigger_flips() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        // Steady signals (no sign changes, oi stays 0) with alternating
        // decisions: the flip trigger must fire on its own.
        let routes = route_window(&["A", "B", "A", "B", "A", "B"]);
        let assessment = state.update(
            0.7,
            0.3,
            &damper,
            &routes,
            PhaseLabel::Integration,
            &config,
        );
        assert!(assessment.resonant);
        assert_eq!(assessment.trigger, ResonanceTrigger::Flips);
        assert_eq!(assessment.flips, 5);
    }

    #[test]
    fn exploration_raises_the_flip_bar() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        // 5 flips: resonant under Integration (threshold 4), not under
        // Exploration (threshold 6).
        let routes = route_window(&["A", "B", "A", "B", "A", "B"]);
        let assessment = state.update(0.7, 0.3, &damper, &routes, PhaseLabel::Exploration, &config);
        assert!(!assessment.resonant);
    }

    #[test]
    fn sign_flapping_drives_the_oscillation_index() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        let routes = route_window(&[]);
        // Coherence and risk jump across their references every cycle.
        let mut last = OscillationAssessment {
            oi: 0.0,
            flips: 0,
            resonant: false,
            trigger: ResonanceTrigger::None,
        };
        for n in 0..12 {
            let high = n % 2 == 0;
            let coherence = if high { 0.9 } else { 0.1 };
            let risk = if high { 0.9 } else { 0.1 };
            last = state.update(
                coherence,
                risk,
                &damper,
                &routes,
                PhaseLabel::Integration,
                &config,
            );
        }
        assert!(last.resonant);
        assert_eq!(last.trigger, ResonanceTrigger::Oi);
        assert!(last.oi.abs() >= config.oi_threshold);
    }

    #[test]
    fn steady_signals_decay_the_index() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        let routes = route_window(&[]);
        // One crossing, then steady: the EMAs must decay back toward zero.
        state.update(0.1, 0.1, &damper, &routes, PhaseLabel::Integration, &config);
        state.update(0.9, 0.9, &damper, &routes, PhaseLabel::Integration, &config);
        let mut last_oi = f64::MAX;
        for _ in 0..10 {
            let a = state.update(0.9, 0.9, &damper, &routes, PhaseLabel::Integration, &config);
            assert!(a.oi.abs() <= last_oi);
            last_oi = a.oi.abs();
        }
        assert!(last_oi < 0.1);
    }

    #[test]
    fn ema_accumulators_persist_incrementally() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        let routes = route_window(&[]);
        state.update(0.1, 0.4, &damper, &routes, PhaseLabel::Integration, &config);
        state.update(0.9, 0.4, &damper, &routes, PhaseLabel::Integration, &config);
        // coherence sign went -1 -> +1: delta 2, ema = 0.35 * 2.0
        assert!((state.ema_coherence - 0.7).abs() < 1e-12);
        assert!(state.ema_risk.abs() < 1e-12);
    }

    #[test]
    fn damper_halves_kappa_during_exploration() {
        let config = config();
        let params = DamperParams { tau: 0.5, beta: 0.4 };
        // Small offsets so the delta_max clamp stays out of the picture.
        let integration = damp(&params, 0.55, 0.45, PhaseLabel::Integration, &config);
        let exploration = damp(&params, 0.55, 0.45, PhaseLabel::Exploration, &config);
        let int_step = integration.tau - params.tau;
        let exp_step = exploration.tau - params.tau;
        assert!((int_step - 2.0 * exp_step).abs() < 1e-12);
        let int_beta = integration.beta - params.beta;
        let exp_beta = exploration.beta - params.beta;
        assert!((int_beta - 2.0 * exp_beta).abs() < 1e-12);
    }

    #[test]
    fn damper_clamps_step_and_bounds() {
        let config = config();
        let params = DamperParams { tau: 0.5, beta: 0.4 };
        // An extreme coherence can move tau by at most delta_max.
        let damped = damp(&params, 1000.0, -1000.0, PhaseLabel::Integration, &config);
        assert!((damped.tau - (0.5 + config.delta_max)).abs() < 1e-12);
        assert!((damped.beta - (0.4 - config.delta_max)).abs() < 1e-12);

        // Repeated extreme pulls saturate at the configured bounds.
        let mut params = params;
        for _ in 0..100 {
            params = damp(&params, 1000.0, 1000.0, PhaseLabel::Integration, &config);
        }
        assert!((params.tau - config.tau_max).abs() < 1e-12);
        assert!((params.beta - config.beta_max).abs() < 1e-12);
    }

    #[test]
    fn trigger_prefers_oi_over_flips() {
        let config = config();
        let mut state = OscillationState::new(&config);
        let damper = DamperParams::from_config(&config);
        let routes = route_window(&["A", "B", "A", "B", "A", "B"]);
        for n in 0..12 {
            let high = n % 2 == 0;
            let c = if high { 0.9 } else { 0.1 };
            let assessment = state.update(c, c, &damper, &routes, PhaseLabel::Integration, &config);
            if assessment.oi.abs() >= config.oi_threshold {
                assert_eq!(assessment.trigger, ResonanceTrigger::Oi);
            }
        }
    }
}
