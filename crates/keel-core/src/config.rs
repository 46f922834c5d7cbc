//! Static kernel configuration.
//!
//! All window sizes, thresholds, bounds, and controller gains are read-only
//! inputs to the kernel: nothing in this module is ever mutated by a
//! governance cycle. Configuration is loaded from TOML (every field has a
//! serde default, so an empty file yields the documented defaults) and
//! passed through [`KernelConfig::validate`] once at startup.
//!
//! Validation is normalizing where a safe fallback exists: an inverted
//! risk mapping range (`phi_caution <= phi_safe`) falls back to the
//! documented defaults with a warning rather than failing, so a
//! misconfigured deployment still produces decisions and never divides by
//! zero.
//! Structurally unusable values (empty windows, inverted gain ranges) are
//! rejected outright.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::KernelError;

/// Top-level kernel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KernelConfig {
    /// State dynamics constants.
    #[serde(default)]
    pub state: StateConfig,

    /// Phase detector thresholds and per-phase decision tables.
    #[serde(default)]
    pub phase: PhaseConfig,

    /// Oscillation detection and resonance damping.
    #[serde(default)]
    pub oscillation: OscillationConfig,

    /// Regime classification thresholds.
    #[serde(default)]
    pub regime: RegimeConfig,

    /// Adaptive gain controller (PI on the control gain).
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Risk estimation weights and thresholds.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Confidence derivation weights.
    #[serde(default)]
    pub confidence: ConfidenceConfig,

    /// Decision engine hard limits.
    #[serde(default)]
    pub decision: DecisionConfig,

    /// General-purpose history window length (risk, regimes, routes).
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl KernelConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, KernelError> {
        let content = std::fs::read_to_string(path).map_err(|e| KernelError::Configuration {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Configuration`] if the TOML is invalid or a
    /// value is structurally unusable.
    pub fn from_toml(content: &str) -> Result<Self, KernelError> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| KernelError::Configuration {
                reason: format!("failed to parse configuration: {e}"),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, normalizing recoverable mistakes.
    ///
    /// Recoverable mistakes (inverted risk mapping range, gate outside
    /// `[0,1]`) are replaced with the documented defaults and logged.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Configuration`] for structurally unusable
    /// values: zero-length windows, an out-of-range EMA factor, or an
    /// inverted gain range.
    pub fn validate(&mut self) -> Result<(), KernelError> {
        if self.history_window == 0 {
            return Err(KernelError::Configuration {
                reason: "history_window must be at least 1".to_string(),
            });
        }
        if self.phase.window < self.phase.min_samples {
            return Err(KernelError::Configuration {
                reason: format!(
                    "phase.window ({}) must be >= phase.min_samples ({})",
                    self.phase.window, self.phase.min_samples
                ),
            });
        }
        if self.oscillation.window == 0 {
            return Err(KernelError::Configuration {
                reason: "oscillation.window must be at least 1".to_string(),
            });
        }
        if !(self.oscillation.ema_lambda > 0.0 && self.oscillation.ema_lambda <= 1.0) {
            return Err(KernelError::Configuration {
                reason: format!(
                    "oscillation.ema_lambda must be in (0, 1], got {}",
                    self.oscillation.ema_lambda
                ),
            });
        }
        if self.controller.eta1_min >= self.controller.eta1_max {
            return Err(KernelError::Configuration {
                reason: "controller gain range is inverted (eta1_min >= eta1_max)".to_string(),
            });
        }

        // Recoverable: a zero-width or inverted phi mapping range would
        // divide by zero in the risk map. Fall back to the documented
        // defaults, keep running.
        if self.risk.phi_caution <= self.risk.phi_safe {
            warn!(
                phi_safe = self.risk.phi_safe,
                phi_caution = self.risk.phi_caution,
                "risk mapping range is zero-width or inverted; falling back to defaults"
            );
            self.risk.phi_safe = default_phi_safe();
            self.risk.phi_caution = default_phi_caution();
        }
        if !(0.0..=1.0).contains(&self.controller.confidence_gate) {
            warn!(
                gate = self.controller.confidence_gate,
                "controller.confidence_gate outside [0, 1]; falling back to default"
            );
            self.controller.confidence_gate = default_confidence_gate();
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            state: StateConfig::default(),
            phase: PhaseConfig::default(),
            oscillation: OscillationConfig::default(),
            regime: RegimeConfig::default(),
            controller: ControllerConfig::default(),
            risk: RiskConfig::default(),
            confidence: ConfidenceConfig::default(),
            decision: DecisionConfig::default(),
            history_window: default_history_window(),
        }
    }
}

/// State dynamics constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    /// Epistemic-humility floor applied to entropy after every step.
    #[serde(default = "default_s_floor")]
    pub s_floor: f64,

    /// Coherence ceiling; `coherence(v)` lives in `[0, c_max]`.
    #[serde(default = "default_c_max")]
    pub c_max: f64,

    /// Default coherence steepness for a fresh session's theta.
    #[serde(default = "default_c1")]
    pub c1: f64,

    /// Default gain representation for a fresh session's theta.
    #[serde(default = "default_eta1")]
    pub eta1: f64,

    /// Energy gain per unit of task complexity.
    #[serde(default = "default_energy_complexity_gain")]
    pub energy_complexity_gain: f64,

    /// Information transfer rate from energy.
    #[serde(default = "default_info_transfer_gain")]
    pub info_transfer_gain: f64,

    /// Entropy gain per unit of task complexity.
    #[serde(default = "default_entropy_complexity_gain")]
    pub entropy_complexity_gain: f64,

    /// Entropy decay per unit of information.
    #[serde(default = "default_entropy_info_decay")]
    pub entropy_info_decay: f64,

    /// Default integration timestep when the input does not supply one.
    #[serde(default = "default_dt")]
    pub default_dt: f64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            s_floor: default_s_floor(),
            c_max: default_c_max(),
            c1: default_c1(),
            eta1: default_eta1(),
            energy_complexity_gain: default_energy_complexity_gain(),
            info_transfer_gain: default_info_transfer_gain(),
            entropy_complexity_gain: default_entropy_complexity_gain(),
            entropy_info_decay: default_entropy_info_decay(),
            default_dt: default_dt(),
        }
    }
}

/// Per-phase decision thresholds consumed by the decision engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PhaseThresholds {
    /// Coherence below this pauses the agent outright.
    pub coherence_critical: f64,
    /// Coherence below this is degraded (reported, not blocking).
    pub coherence_degraded: f64,
    /// Coherence at or above this is healthy.
    pub coherence_healthy: f64,
    /// Risk below this proceeds without guidance.
    pub risk_approve: f64,
    /// Risk below this proceeds with revision guidance.
    pub risk_revise: f64,
    /// Risk at or above this is a rejection-grade pause.
    pub risk_reject: f64,
}

/// Phase detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    /// Trailing window length examined for trend signals.
    #[serde(default = "default_phase_window")]
    pub window: usize,

    /// Minimum samples before classification is attempted; below this the
    /// detector reports Integration.
    #[serde(default = "default_phase_min_samples")]
    pub min_samples: usize,

    /// Per-cycle information growth rate that votes for Exploration.
    #[serde(default = "default_i_growth_threshold")]
    pub i_growth_threshold: f64,

    /// Per-cycle entropy decline rate that votes for Exploration.
    #[serde(default = "default_s_decline_threshold")]
    pub s_decline_threshold: f64,

    /// Mean complexity that votes for Exploration.
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: f64,

    /// Decision thresholds while integrating.
    #[serde(default = "default_integration_thresholds")]
    pub integration: PhaseThresholds,

    /// Decision thresholds while exploring.
    #[serde(default = "default_exploration_thresholds")]
    pub exploration: PhaseThresholds,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            window: default_phase_window(),
            min_samples: default_phase_min_samples(),
            i_growth_threshold: default_i_growth_threshold(),
            s_decline_threshold: default_s_decline_threshold(),
            complexity_threshold: default_complexity_threshold(),
            integration: default_integration_thresholds(),
            exploration: default_exploration_thresholds(),
        }
    }
}

/// Oscillation detection and resonance damping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OscillationConfig {
    /// Sign-sample window length.
    #[serde(default = "default_osc_window")]
    pub window: usize,

    /// EMA smoothing factor for the oscillation index accumulators.
    #[serde(default = "default_ema_lambda")]
    pub ema_lambda: f64,

    /// `|oi|` at or above this triggers resonance (Integration phase).
    #[serde(default = "default_oi_threshold")]
    pub oi_threshold: f64,

    /// Multiplier applied to `oi_threshold` during Exploration.
    #[serde(default = "default_exploration_oi_scale")]
    pub exploration_oi_scale: f64,

    /// Adjacent route changes at or above this trigger resonance
    /// (Integration phase).
    #[serde(default = "default_flip_threshold")]
    pub flip_threshold: usize,

    /// Added to `flip_threshold` during Exploration.
    #[serde(default = "default_exploration_flip_bonus")]
    pub exploration_flip_bonus: usize,

    /// Damper pull rate toward the current signals.
    #[serde(default = "default_kappa")]
    pub kappa: f64,

    /// Maximum per-step damper adjustment magnitude.
    #[serde(default = "default_delta_max")]
    pub delta_max: f64,

    /// Default coherence reference for a fresh session.
    #[serde(default = "default_tau")]
    pub tau_default: f64,

    /// Default risk reference for a fresh session.
    #[serde(default = "default_beta")]
    pub beta_default: f64,

    /// Lower bound on the coherence reference.
    #[serde(default = "default_tau_min")]
    pub tau_min: f64,

    /// Upper bound on the coherence reference.
    #[serde(default = "default_tau_max")]
    pub tau_max: f64,

    /// Lower bound on the risk reference.
    #[serde(default = "default_beta_min")]
    pub beta_min: f64,

    /// Upper bound on the risk reference.
    #[serde(default = "default_beta_max")]
    pub beta_max: f64,
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            window: default_osc_window(),
            ema_lambda: default_ema_lambda(),
            oi_threshold: default_oi_threshold(),
            exploration_oi_scale: default_exploration_oi_scale(),
            flip_threshold: default_flip_threshold(),
            exploration_flip_bonus: default_exploration_flip_bonus(),
            kappa: default_kappa(),
            delta_max: default_delta_max(),
            tau_default: default_tau(),
            beta_default: default_beta(),
            tau_min: default_tau_min(),
            tau_max: default_tau_max(),
            beta_min: default_beta_min(),
            beta_max: default_beta_max(),
        }
    }
}

/// Regime classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegimeConfig {
    /// Information floor for a STABLE-qualifying cycle.
    #[serde(default = "default_stable_i_min")]
    pub stable_i_min: f64,

    /// Entropy ceiling for a STABLE-qualifying cycle.
    #[serde(default = "default_stable_s_max")]
    pub stable_s_max: f64,

    /// Consecutive qualifying cycles required before STABLE is reported.
    #[serde(default = "default_stable_cycles")]
    pub stable_cycles: u32,

    /// Dead band for per-cycle trend deltas.
    #[serde(default = "default_trend_eps")]
    pub trend_eps: f64,

    /// Entropy at or above this counts as plateaued-high.
    #[serde(default = "default_s_high")]
    pub s_high: f64,

    /// Entropy at or below this counts as low (convergence candidate).
    #[serde(default = "default_s_low")]
    pub s_low: f64,

    /// Information at or above this counts as high (convergence candidate).
    #[serde(default = "default_i_high")]
    pub i_high: f64,

    /// `|v|` above this counts as elevated for divergence detection.
    #[serde(default = "default_v_elevated")]
    pub v_elevated: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            stable_i_min: default_stable_i_min(),
            stable_s_max: default_stable_s_max(),
            stable_cycles: default_stable_cycles(),
            trend_eps: default_trend_eps(),
            s_high: default_s_high(),
            s_low: default_s_low(),
            i_high: default_i_high(),
            v_elevated: default_v_elevated(),
        }
    }
}

/// Adaptive gain controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Accepted cycles between adaptation attempts.
    #[serde(default = "default_adapt_interval")]
    pub adapt_interval: u32,

    /// Confidence below this skips the adaptation (audited no-op).
    #[serde(default = "default_confidence_gate")]
    pub confidence_gate: f64,

    /// Target fraction of recent `|v|` samples above the void threshold.
    #[serde(default = "default_void_freq_target")]
    pub void_freq_target: f64,

    /// Target coherence.
    #[serde(default = "default_coherence_target")]
    pub coherence_target: f64,

    /// Standard-deviation multiplier for the adaptive void threshold.
    #[serde(default = "default_void_sigma_k")]
    pub void_sigma_k: f64,

    /// Trailing `|v|` samples consulted for void frequency.
    #[serde(default = "default_void_window")]
    pub void_window: usize,

    /// Proportional gain.
    #[serde(default = "default_kp")]
    pub kp: f64,

    /// Integral gain.
    #[serde(default = "default_ki")]
    pub ki: f64,

    /// Anti-windup bound on the integral term.
    #[serde(default = "default_integral_max")]
    pub integral_max: f64,

    /// Weight of the void-frequency error in the combined error.
    #[serde(default = "default_weight_void")]
    pub weight_void: f64,

    /// Weight of the coherence error in the combined error.
    #[serde(default = "default_weight_coherence")]
    pub weight_coherence: f64,

    /// Lower bound on the gain representation.
    #[serde(default = "default_eta1_min")]
    pub eta1_min: f64,

    /// Upper bound on the gain representation.
    #[serde(default = "default_eta1_max")]
    pub eta1_max: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            adapt_interval: default_adapt_interval(),
            confidence_gate: default_confidence_gate(),
            void_freq_target: default_void_freq_target(),
            coherence_target: default_coherence_target(),
            void_sigma_k: default_void_sigma_k(),
            void_window: default_void_window(),
            kp: default_kp(),
            ki: default_ki(),
            integral_max: default_integral_max(),
            weight_void: default_weight_void(),
            weight_coherence: default_weight_coherence(),
            eta1_min: default_eta1_min(),
            eta1_max: default_eta1_max(),
        }
    }
}

/// Risk estimation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    /// Physics objective at or below this is a Safe verdict.
    #[serde(default = "default_phi_safe")]
    pub phi_safe: f64,

    /// Physics objective at or below this (and above `phi_safe`) is Caution.
    #[serde(default = "default_phi_caution")]
    pub phi_caution: f64,

    /// Entropy weight in the physics objective.
    #[serde(default = "default_phi_w_entropy")]
    pub w_entropy: f64,

    /// Void-magnitude weight in the physics objective.
    #[serde(default = "default_phi_w_void")]
    pub w_void: f64,

    /// Drift-norm weight in the physics objective.
    #[serde(default = "default_phi_w_drift")]
    pub w_drift: f64,

    /// Information-deficit weight in the physics objective.
    #[serde(default = "default_phi_w_info")]
    pub w_info: f64,

    /// Blend weight of the physics-derived risk.
    #[serde(default = "default_phi_weight")]
    pub phi_weight: f64,

    /// Blend weight of the external heuristic risk.
    #[serde(default = "default_heuristic_weight")]
    pub heuristic_weight: f64,

    /// Blended risk above this counts as elevated for the convergent
    /// task-type relief.
    #[serde(default = "default_elevated_threshold")]
    pub elevated_threshold: f64,

    /// Maximum relative relief for convergent tasks at the entropy floor.
    #[serde(default = "default_convergent_relief")]
    pub convergent_relief: f64,

    /// Absolute floor under the convergent relief.
    #[serde(default = "default_convergent_floor")]
    pub convergent_floor: f64,

    /// Maximum relative uplift for divergent tasks at the entropy floor.
    #[serde(default = "default_divergent_uplift")]
    pub divergent_uplift: f64,

    /// Absolute cap over the divergent uplift.
    #[serde(default = "default_divergent_cap")]
    pub divergent_cap: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            phi_safe: default_phi_safe(),
            phi_caution: default_phi_caution(),
            w_entropy: default_phi_w_entropy(),
            w_void: default_phi_w_void(),
            w_drift: default_phi_w_drift(),
            w_info: default_phi_w_info(),
            phi_weight: default_phi_weight(),
            heuristic_weight: default_heuristic_weight(),
            elevated_threshold: default_elevated_threshold(),
            convergent_relief: default_convergent_relief(),
            convergent_floor: default_convergent_floor(),
            divergent_uplift: default_divergent_uplift(),
            divergent_cap: default_divergent_cap(),
        }
    }
}

/// Confidence derivation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceConfig {
    /// Information weight.
    #[serde(default = "default_conf_w_info")]
    pub w_info: f64,

    /// Coherence weight.
    #[serde(default = "default_conf_w_coherence")]
    pub w_coherence: f64,

    /// Inverse-entropy weight.
    #[serde(default = "default_conf_w_entropy")]
    pub w_entropy: f64,

    /// Void-magnitude penalty weight.
    #[serde(default = "default_conf_w_void")]
    pub w_void: f64,

    /// Observation count at which outcome reliability reaches one half.
    #[serde(default = "default_reliability_half_count")]
    pub reliability_half_count: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            w_info: default_conf_w_info(),
            w_coherence: default_conf_w_coherence(),
            w_entropy: default_conf_w_entropy(),
            w_void: default_conf_w_void(),
            reliability_half_count: default_reliability_half_count(),
        }
    }
}

/// Decision engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// `|v|` at or above this activates the void hard interlock.
    #[serde(default = "default_void_hard_limit")]
    pub void_hard_limit: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            void_hard_limit: default_void_hard_limit(),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

const fn default_history_window() -> usize {
    50
}

const fn default_s_floor() -> f64 {
    0.001
}

const fn default_c_max() -> f64 {
    1.0
}

const fn default_c1() -> f64 {
    0.8
}

const fn default_eta1() -> f64 {
    0.3
}

const fn default_energy_complexity_gain() -> f64 {
    0.5
}

const fn default_info_transfer_gain() -> f64 {
    0.3
}

const fn default_entropy_complexity_gain() -> f64 {
    0.2
}

const fn default_entropy_info_decay() -> f64 {
    0.15
}

const fn default_dt() -> f64 {
    1.0
}

const fn default_phase_window() -> usize {
    12
}

const fn default_phase_min_samples() -> usize {
    6
}

const fn default_i_growth_threshold() -> f64 {
    0.005
}

const fn default_s_decline_threshold() -> f64 {
    0.005
}

const fn default_complexity_threshold() -> f64 {
    0.6
}

const fn default_integration_thresholds() -> PhaseThresholds {
    PhaseThresholds {
        coherence_critical: 0.40,
        coherence_degraded: 0.55,
        coherence_healthy: 0.70,
        risk_approve: 0.35,
        risk_revise: 0.55,
        risk_reject: 0.75,
    }
}

const fn default_exploration_thresholds() -> PhaseThresholds {
    PhaseThresholds {
        coherence_critical: 0.35,
        coherence_degraded: 0.50,
        coherence_healthy: 0.65,
        risk_approve: 0.40,
        risk_revise: 0.60,
        risk_reject: 0.80,
    }
}

const fn default_osc_window() -> usize {
    10
}

const fn default_ema_lambda() -> f64 {
    0.35
}

const fn default_oi_threshold() -> f64 {
    0.7
}

const fn default_exploration_oi_scale() -> f64 {
    1.5
}

const fn default_flip_threshold() -> usize {
    4
}

const fn default_exploration_flip_bonus() -> usize {
    2
}

const fn default_kappa() -> f64 {
    0.3
}

const fn default_delta_max() -> f64 {
    0.05
}

const fn default_tau() -> f64 {
    0.5
}

const fn default_beta() -> f64 {
    0.4
}

const fn default_tau_min() -> f64 {
    0.25
}

const fn default_tau_max() -> f64 {
    0.75
}

const fn default_beta_min() -> f64 {
    0.2
}

const fn default_beta_max() -> f64 {
    0.6
}

const fn default_stable_i_min() -> f64 {
    0.999
}

const fn default_stable_s_max() -> f64 {
    0.001
}

const fn default_stable_cycles() -> u32 {
    3
}

const fn default_trend_eps() -> f64 {
    1e-4
}

const fn default_s_high() -> f64 {
    0.6
}

const fn default_s_low() -> f64 {
    0.3
}

const fn default_i_high() -> f64 {
    0.7
}

const fn default_v_elevated() -> f64 {
    1.0
}

const fn default_adapt_interval() -> u32 {
    5
}

const fn default_confidence_gate() -> f64 {
    0.6
}

const fn default_void_freq_target() -> f64 {
    0.02
}

const fn default_coherence_target() -> f64 {
    0.55
}

const fn default_void_sigma_k() -> f64 {
    2.0
}

const fn default_void_window() -> usize {
    20
}

const fn default_kp() -> f64 {
    0.15
}

const fn default_ki() -> f64 {
    0.02
}

const fn default_integral_max() -> f64 {
    2.0
}

const fn default_weight_void() -> f64 {
    0.5
}

const fn default_weight_coherence() -> f64 {
    0.5
}

const fn default_eta1_min() -> f64 {
    0.1
}

const fn default_eta1_max() -> f64 {
    0.5
}

const fn default_phi_safe() -> f64 {
    0.3
}

const fn default_phi_caution() -> f64 {
    0.6
}

const fn default_phi_w_entropy() -> f64 {
    0.4
}

const fn default_phi_w_void() -> f64 {
    0.3
}

const fn default_phi_w_drift() -> f64 {
    0.2
}

const fn default_phi_w_info() -> f64 {
    0.1
}

const fn default_phi_weight() -> f64 {
    0.7
}

const fn default_heuristic_weight() -> f64 {
    0.3
}

const fn default_elevated_threshold() -> f64 {
    0.5
}

const fn default_convergent_relief() -> f64 {
    0.2
}

const fn default_convergent_floor() -> f64 {
    0.2
}

const fn default_divergent_uplift() -> f64 {
    0.15
}

const fn default_divergent_cap() -> f64 {
    0.5
}

const fn default_conf_w_info() -> f64 {
    0.35
}

const fn default_conf_w_coherence() -> f64 {
    0.35
}

const fn default_conf_w_entropy() -> f64 {
    0.2
}

const fn default_conf_w_void() -> f64 {
    0.1
}

const fn default_reliability_half_count() -> f64 {
    10.0
}

const fn default_void_hard_limit() -> f64 {
    3.0
}
