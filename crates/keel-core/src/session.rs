// AGENT-AUTHORED
//! Per-agent governance sessions.
//!
//! A [`GovernanceSession`] owns everything the control loop needs for one
//! agent: the EISV state, theta, damper references, oscillation and
//! controller accumulators, regime state, and all bounded history windows.
//! Sessions are created on first contact or restored from a persisted
//! snapshot; the core never deletes them (lifecycle belongs to the
//! orchestrating service).
//!
//! # Atomicity
//!
//! `process` runs the whole pipeline against a working clone and commits
//! by swapping it in only when every stage succeeded. A fatal validation
//! error therefore cannot leave a half-updated live session; the same
//! mechanism gives `simulate` its restore guarantee for free: it runs the
//! identical pipeline on a clone it simply drops.
//!
//! # Pipeline order
//!
//! step → invariant check → coherence → phase → confidence → (gated)
//! adaptation → risk → oscillation update → resonance damping → regime →
//! decision → history append. The order is load-bearing: adaptation is
//! gated on the *current* cycle's confidence, the damper consumes the
//! *adjusted* risk, and the decision's route label is appended after the
//! oscillation update so flip counting always looks at completed cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::KernelConfig;
use crate::confidence::{self, ConfidenceMetadata, OutcomeSummary};
use crate::controller::{self, AdaptationOutcome, ControllerState};
use crate::decision::{self, DecisionResult};
use crate::error::KernelError;
use crate::history::HistoryWindow;
use crate::input::CycleInput;
use crate::oscillation::{self, DamperParams, OscillationAssessment, OscillationState};
use crate::phase::{self, PhaseLabel, PhaseSignals};
use crate::regime::{Regime, RegimeState};
use crate::risk::{self, RiskBreakdown};
use crate::snapshot::{SessionSnapshot, SnapshotHistories, SCHEMA_VERSION};
use crate::state::{self, EisvState, Theta};

/// Collaborator-resolved inputs for one cycle.
///
/// The orchestrating service resolves these (possibly over I/O) *before*
/// invoking the kernel, so the pure pipeline never blocks.
#[derive(Debug, Clone, Default)]
pub struct CycleContext {
    /// Heuristic risk from the external collaborator, already in `[0, 1]`.
    pub heuristic_risk: Option<f64>,
    /// Outcome-observation summary for this agent, if any.
    pub outcome: Option<OutcomeSummary>,
}

/// A regime change observed during a cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegimeTransition {
    /// Regime before the cycle.
    pub from: Regime,
    /// Regime after the cycle.
    pub to: Regime,
}

/// Everything one committed (or simulated) cycle reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSnapshot {
    /// Monotonic update count after this cycle.
    pub update_count: u64,
    /// Post-step state.
    pub state: EisvState,
    /// Coherence recomputed from the post-step void.
    pub coherence: f64,
    /// Control gain after any adaptation this cycle.
    pub lambda1: f64,
    /// Phase classification for this cycle.
    pub phase: PhaseLabel,
    /// The trend signals behind the phase classification.
    pub phase_signals: PhaseSignals,
    /// Full risk breakdown (φ, verdict, original vs adjusted).
    pub risk: RiskBreakdown,
    /// Final confidence after capping.
    pub confidence: f64,
    /// Confidence provenance.
    pub confidence_metadata: ConfidenceMetadata,
    /// Oscillation view for this cycle.
    pub oscillation: OscillationAssessment,
    /// Damper references after any damping this cycle.
    pub damper: DamperParams,
    /// Regime after this cycle.
    pub regime: Regime,
    /// Present when the regime changed this cycle.
    pub regime_transition: Option<RegimeTransition>,
    /// Adaptation outcome (applied, interval skip, or gated skip).
    pub adaptation: AdaptationOutcome,
    /// Whether the void hard interlock was active.
    pub void_active: bool,
    /// The governed decision.
    pub decision: DecisionResult,
    /// Whether input fields were clamped into range.
    pub input_clamped: bool,
    /// Whether post-step state variables were clipped.
    pub state_clipped: bool,
}

/// One agent's governance session.
///
/// Persistence goes through [`snapshot`](Self::snapshot) and
/// [`restore`](Self::restore), never through serializing the session
/// itself; the snapshot is the versioned storage image.
#[derive(Debug, Clone, PartialEq)]
pub struct GovernanceSession {
    agent_id: String,
    state: EisvState,
    theta: Theta,
    damper: DamperParams,
    oscillation: OscillationState,
    controller: ControllerState,
    regime: RegimeState,
    i_history: HistoryWindow<f64>,
    s_history: HistoryWindow<f64>,
    complexity_history: HistoryWindow<f64>,
    v_history: HistoryWindow<f64>,
    risk_history: HistoryWindow<f64>,
    route_history: HistoryWindow<String>,
    regime_history: HistoryWindow<Regime>,
    update_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GovernanceSession {
    /// Creates a fresh session for an agent seen for the first time.
    #[must_use]
    pub fn new(agent_id: impl Into<String>, config: &KernelConfig) -> Self {
        let now = Utc::now();
        let window = config.history_window;
        Self {
            agent_id: agent_id.into(),
            state: EisvState::initial(),
            theta: Theta::from_config(&config.state),
            damper: DamperParams::from_config(&config.oscillation),
            oscillation: OscillationState::new(&config.oscillation),
            controller: ControllerState::default(),
            regime: RegimeState::default(),
            i_history: HistoryWindow::new(window),
            s_history: HistoryWindow::new(window),
            complexity_history: HistoryWindow::new(window),
            v_history: HistoryWindow::new(window),
            risk_history: HistoryWindow::new(window),
            route_history: HistoryWindow::new(window),
            regime_history: HistoryWindow::new(window),
            update_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Restores a session from a persisted snapshot.
    ///
    /// The snapshot is upgraded through the single schema-compatibility
    /// point first; history windows are re-bounded to the current
    /// configuration. Coherence is never read from storage; it does not
    /// exist in the snapshot and is recomputed from `v` wherever needed.
    #[must_use]
    pub fn restore(snapshot: SessionSnapshot, config: &KernelConfig) -> Self {
        let snapshot = snapshot.upgrade(config.oscillation.window);
        let window = config.history_window;
        let h = snapshot.histories;
        Self {
            agent_id: snapshot.agent_id,
            state: snapshot.state,
            theta: snapshot.theta,
            damper: snapshot.damper,
            // upgrade() guarantees presence.
            oscillation: snapshot.oscillation.unwrap_or_else(|| {
                OscillationState::new(&config.oscillation)
            }),
            controller: snapshot.controller.unwrap_or_default(),
            regime: snapshot.regime,
            i_history: rebound(h.i, window),
            s_history: rebound(h.s, window),
            complexity_history: rebound(h.complexity, window),
            v_history: rebound(h.v, window),
            risk_history: rebound(h.risk, window),
            route_history: rebound(h.routes, window),
            regime_history: rebound(h.regimes, window),
            update_count: snapshot.update_count,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    /// Produces the persistable image of this session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            schema_version: SCHEMA_VERSION,
            agent_id: self.agent_id.clone(),
            state: self.state,
            theta: self.theta,
            damper: self.damper,
            oscillation: Some(self.oscillation.clone()),
            controller: Some(self.controller),
            regime: self.regime,
            histories: SnapshotHistories {
                i: self.i_history.clone(),
                s: self.s_history.clone(),
                complexity: self.complexity_history.clone(),
                v: self.v_history.clone(),
                risk: self.risk_history.clone(),
                routes: self.route_history.clone(),
                regimes: self.regime_history.clone(),
            },
            update_count: self.update_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The governed agent's identifier.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Monotonic count of committed cycles.
    #[must_use]
    pub const fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Current control gain.
    #[must_use]
    pub fn lambda1(&self) -> f64 {
        self.theta.lambda1()
    }

    /// Current theta.
    #[must_use]
    pub const fn theta(&self) -> Theta {
        self.theta
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> EisvState {
        self.state
    }

    /// Number of entries in the decision-route history.
    #[must_use]
    pub fn route_history_len(&self) -> usize {
        self.route_history.len()
    }

    /// Runs one governance cycle and commits it atomically.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ValidationFatal`] if the input or the
    /// post-step state is non-finite. The live session is unchanged on
    /// error.
    pub fn process(
        &mut self,
        input: &CycleInput,
        ctx: &CycleContext,
        config: &KernelConfig,
    ) -> Result<CycleSnapshot, KernelError> {
        let mut work = self.clone();
        let snapshot = work.run_cycle(input, ctx, config)?;
        // Commit: pointer-swap equivalent. Reached only on full success.
        *self = work;
        Ok(snapshot)
    }

    /// Runs one governance cycle against a private copy (dry run).
    ///
    /// The live session is never mutated and `update_count` does not
    /// advance, including when the simulated cycle fails validation.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`process`](Self::process); the error
    /// refers to the discarded copy.
    pub fn simulate(
        &self,
        input: &CycleInput,
        ctx: &CycleContext,
        config: &KernelConfig,
    ) -> Result<CycleSnapshot, KernelError> {
        let mut work = self.clone();
        work.run_cycle(input, ctx, config)
    }

    /// The full pipeline. Mutates `self`, which callers must treat as a
    /// working copy until this returns `Ok`.
    fn run_cycle(
        &mut self,
        input: &CycleInput,
        ctx: &CycleContext,
        config: &KernelConfig,
    ) -> Result<CycleSnapshot, KernelError> {
        input.validate(self.update_count)?;
        let mut input = input.clone();
        let input_clamped = input.clamp_ranges();

        // 1. State step + invariant check.
        let dt = input.dt.unwrap_or(config.state.default_dt);
        let step = state::step(
            &self.state,
            &self.theta,
            input.ethical_drift,
            dt,
            input.complexity,
            input.noise,
            &config.state,
            self.update_count,
        )?;
        self.state = step.state;

        // 2. Coherence is always recomputed from the post-step void.
        let coherence = state::coherence(self.state.v, self.theta.c1, config.state.c_max);

        // 3. Trend windows take the current sample before classification.
        self.i_history.push(self.state.i);
        self.s_history.push(self.state.s);
        self.complexity_history.push(input.complexity);
        self.v_history.push(self.state.v);

        let (phase, phase_signals) = phase::classify(
            &self.i_history,
            &self.s_history,
            &self.complexity_history,
            &config.phase,
        );

        // 4. Confidence, then the gated adaptation that consumes it.
        let (confidence, confidence_metadata) = confidence::derive(
            &self.state,
            coherence,
            input.confidence,
            ctx.outcome.as_ref(),
            &config.confidence,
        );
        let adaptation = controller::adapt(
            &mut self.controller,
            &mut self.theta,
            coherence,
            confidence,
            &self.v_history,
            &config.controller,
        );

        // 5. Risk: physics objective, blend, task adjustment.
        let risk = risk::estimate(
            &self.state,
            input.ethical_drift,
            ctx.heuristic_risk,
            input.task_type,
            config.state.s_floor,
            &config.risk,
        );
        self.risk_history.push(risk.adjusted);

        // 6. Oscillation update and resonance damping.
        let oscillation = self.oscillation.update(
            coherence,
            risk.adjusted,
            &self.damper,
            &self.route_history,
            phase,
            &config.oscillation,
        );
        if oscillation.resonant {
            self.damper = oscillation::damp(
                &self.damper,
                coherence,
                risk.adjusted,
                phase,
                &config.oscillation,
            );
        }

        // 7. Regime classification from state and per-cycle trends.
        let ds = last_delta(&self.s_history);
        let di = last_delta(&self.i_history);
        let previous_regime = self.regime.current;
        let regime = self.regime.classify(
            self.state.i,
            self.state.s,
            self.state.v.abs(),
            ds,
            di,
            &config.regime,
        );
        self.regime_history.push(regime);
        let regime_transition = (previous_regime != regime).then_some(RegimeTransition {
            from: previous_regime,
            to: regime,
        });

        // 8. Decision, then the route label joins the flip window.
        let void_active = self.state.v.abs() >= config.decision.void_hard_limit;
        let thresholds = phase::thresholds(phase, &config.phase);
        let decision = decision::decide(
            risk.adjusted,
            coherence,
            void_active,
            risk.verdict,
            thresholds,
        );
        self.route_history.push(decision.action.as_str().to_string());

        self.update_count += 1;
        self.updated_at = Utc::now();

        Ok(CycleSnapshot {
            update_count: self.update_count,
            state: self.state,
            coherence,
            lambda1: self.theta.lambda1(),
            phase,
            phase_signals,
            risk,
            confidence,
            confidence_metadata,
            oscillation,
            damper: self.damper,
            regime,
            regime_transition,
            adaptation,
            void_active,
            decision,
            input_clamped,
            state_clipped: step.clipped,
        })
    }
}

fn rebound<T: Clone>(window: HistoryWindow<T>, capacity: usize) -> HistoryWindow<T> {
    let mut out = HistoryWindow::new(capacity);
    for item in window.iter() {
        out.push(item.clone());
    }
    out
}

fn last_delta(history: &HistoryWindow<f64>) -> f64 {
    match (history.nth_back(0), history.nth_back(1)) {
        (Some(current), Some(previous)) => current - previous,
        _ => 0.0,
    }
}
