//! End-to-end pipeline tests for the governance kernel.
//!
//! These drive full `process` cycles through `GovernanceSession` the way
//! the orchestration layer does, and verify the externally observable
//! contract: decisions always come back with reasons, hard interlocks
//! fire, collaborator inputs shift outcomes, and old snapshots restore
//! through the logged compatibility path.

use keel_core::{
    CycleContext, CycleInput, DecisionAction, GovernanceSession, KernelConfig, SessionSnapshot,
    TaskType,
};

fn config() -> KernelConfig {
    KernelConfig::default()
}

#[test]
fn first_contact_benign_input_proceeds() {
    let config = config();
    let mut session = GovernanceSession::new("agent-alpha", &config);
    let snapshot = session
        .process(
            &CycleInput::new([0.0, 0.0, 0.0], 0.3),
            &CycleContext::default(),
            &config,
        )
        .unwrap();

    assert_eq!(snapshot.update_count, 1);
    assert_eq!(snapshot.decision.action, DecisionAction::Proceed);
    assert!(!snapshot.decision.critical);
    assert!((0.0..=1.0).contains(&snapshot.confidence));
    assert!((0.0..=1.0).contains(&snapshot.coherence));
    assert!(!snapshot.void_active);
}

#[test]
fn sustained_imbalance_trips_the_void_interlock() {
    let config = config();
    let mut session = GovernanceSession::new("agent-beta", &config);
    let input = CycleInput::new([1.0, -1.0, 0.0], 1.0);

    let mut tripped = None;
    for _ in 0..60 {
        let snapshot = session
            .process(&input, &CycleContext::default(), &config)
            .unwrap();
        if snapshot.void_active {
            tripped = Some(snapshot);
            break;
        }
    }

    let snapshot = tripped.expect("sustained energy-information imbalance must trip the interlock");
    assert_eq!(snapshot.decision.action, DecisionAction::Pause);
    assert!(snapshot.decision.critical);
    assert!(snapshot.decision.reason.contains("void"));
    assert!(snapshot.decision.guidance.is_some());
}

#[test]
fn heuristic_risk_raises_blended_risk_and_adds_guidance() {
    let config = config();
    let input = CycleInput::new([0.0, 0.0, 0.0], 0.3);

    let mut plain = GovernanceSession::new("agent-gamma", &config);
    let without = plain
        .process(&input, &CycleContext::default(), &config)
        .unwrap();

    let mut scored = GovernanceSession::new("agent-delta", &config);
    let with = scored
        .process(
            &input,
            &CycleContext {
                heuristic_risk: Some(0.95),
                outcome: None,
            },
            &config,
        )
        .unwrap();

    assert!(with.risk.original > without.risk.original);
    assert_eq!(with.risk.heuristic_risk, Some(0.95));
    assert_eq!(without.risk.heuristic_risk, None);
    // The extra risk lands this cycle in the revision band: still a
    // proceed, but with guidance attached.
    assert_eq!(with.decision.action, DecisionAction::Proceed);
    assert!(with.decision.guidance.is_some());
    assert!(without.decision.guidance.is_none());
}

#[test]
fn divergent_task_at_entropy_floor_gets_visible_uplift() {
    let config = config();
    let mut session = GovernanceSession::new("agent-epsilon", &config);
    let input = CycleInput::new([0.5, 0.0, -0.3], 0.5).with_task_type(TaskType::Divergent);

    let mut adjusted_seen = false;
    for _ in 0..8 {
        let snapshot = session
            .process(&input, &CycleContext::default(), &config)
            .unwrap();
        if snapshot.risk.adjustment_applied {
            assert!(
                snapshot.risk.adjusted > snapshot.risk.original,
                "divergent uplift must raise risk: {:?}",
                snapshot.risk
            );
            assert!(snapshot.risk.adjusted <= 0.5, "uplift is capped");
            adjusted_seen = true;
        }
    }
    assert!(adjusted_seen, "entropy reached the floor and the uplift fired");
}

#[test]
fn v1_snapshot_restores_through_the_logged_fallback() {
    let config = config();
    let mut session = GovernanceSession::new("agent-zeta", &config);
    for _ in 0..6 {
        session
            .process(
                &CycleInput::new([0.1, 0.05, -0.02], 0.6),
                &CycleContext::default(),
                &config,
            )
            .unwrap();
    }

    // Rewrite the snapshot the way a v1 deployment would have stored it:
    // no oscillation accumulators, no controller state.
    let mut raw = serde_json::to_value(session.snapshot()).unwrap();
    let object = raw.as_object_mut().unwrap();
    object.insert("schema_version".to_string(), serde_json::json!(1));
    object.remove("oscillation");
    object.remove("controller");

    let old: SessionSnapshot = serde_json::from_value(raw).unwrap();
    let mut restored = GovernanceSession::restore(old, &config);

    // Detection and adaptation state restarted; the session itself keeps
    // its trajectory and continues to produce decisions.
    assert_eq!(restored.update_count(), session.update_count());
    let snapshot = restored
        .process(
            &CycleInput::new([0.0, 0.0, 0.0], 0.3),
            &CycleContext::default(),
            &config,
        )
        .unwrap();
    assert_eq!(snapshot.update_count, session.update_count() + 1);
}

#[test]
fn simulate_then_process_diverge_only_in_the_live_copy() {
    let config = config();
    let mut session = GovernanceSession::new("agent-eta", &config);
    for _ in 0..4 {
        session
            .process(
                &CycleInput::new([0.1, 0.0, 0.0], 0.5),
                &CycleContext::default(),
                &config,
            )
            .unwrap();
    }

    let probe = CycleInput::new([0.3, -0.1, 0.2], 0.8);
    let simulated = session
        .simulate(&probe, &CycleContext::default(), &config)
        .unwrap();
    let committed = session
        .process(&probe, &CycleContext::default(), &config)
        .unwrap();

    // The dry run predicted exactly what the committed cycle then did.
    assert_eq!(simulated.decision.action, committed.decision.action);
    assert!((simulated.risk.adjusted - committed.risk.adjusted).abs() < 1e-12);
    assert!((simulated.coherence - committed.coherence).abs() < 1e-12);
    assert_eq!(session.update_count(), 5, "only the committed cycle counted");
}
