//! Integration tests for mediation
//!
//! Tests the full path: turn + snapshot → Mediator → Cognition → SessionUpdate

use marion::core::{FixedClock, Mediator, Weights};
use marion::mediate_value;
use marion::types::{
    Budget, Dominance, ErrorCode, Intent, LatentDesire, MarionState, MediationOptions, Mode,
    NormalizedTurn, RiskTier, SessionSnapshot,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn mediator() -> Mediator<FixedClock> {
    Mediator::new().with_clock(FixedClock(1_700_000_000_000))
}

fn run(turn: &NormalizedTurn, session: &SessionSnapshot) -> marion::types::Cognition {
    mediator().mediate(turn, session, &MediationOptions::default())
}

/// Chart action with a year delivers with authority
#[test]
fn test_chart_action_advances_with_authority() {
    let turn = NormalizedTurn::action("top10", Some(1988));
    let c = run(&turn, &SessionSnapshot::default());

    assert!(c.actionable);
    assert_eq!(c.intent, Intent::Advance);
    assert_eq!(c.latent_desire, LatentDesire::Authority);
    assert_eq!(c.marion_state, MarionState::Deliver);
    assert_eq!(c.dominance, Dominance::Firm);
    assert_eq!(c.budget, Budget::Short);
    assert_eq!(c.novelty_score, 0.0);
    assert!(!c.discovery_hint.enabled);
    assert_eq!(c.error_code, None);
}

/// Distress text stabilizes and asks for comfort
#[test]
fn test_distress_stabilizes() {
    let turn = NormalizedTurn::text("I'm so overwhelmed and stuck");
    let c = run(&turn, &SessionSnapshot::default());

    assert_eq!(c.intent, Intent::Stabilize);
    assert_eq!(c.latent_desire, LatentDesire::Comfort);
    assert_eq!(c.mode, Mode::User);
    assert_eq!(c.dominance, Dominance::Soft);
    assert_eq!(c.marion_state, MarionState::Stabilize);
    assert_eq!(c.grounding_max_lines, 0);
    assert_eq!(c.risk_tier, RiskTier::Medium);
}

#[test]
fn test_crisis_language_is_high_risk() {
    let c = run(&NormalizedTurn::text("I want to die"), &SessionSnapshot::default());
    assert_eq!(c.risk_tier, RiskTier::High);
}

/// Explicit action beats any text
#[test]
fn test_action_outranks_text() {
    let turn = NormalizedTurn::action("micro_moment", Some(1977))
        .with_text("I'm overwhelmed, why is this so hard?");
    let c = run(&turn, &SessionSnapshot::default());
    assert_eq!(c.intent, Intent::Advance);
}

#[test]
fn test_client_mode_override() {
    let mut turn = NormalizedTurn::text("I feel lost and sad");
    turn.mac_mode = Some("architect".into());
    assert_eq!(run(&turn, &SessionSnapshot::default()).mode, Mode::Architect);

    // Malformed override is ignored
    turn.mac_mode = Some("wizard".into());
    assert_eq!(run(&turn, &SessionSnapshot::default()).mode, Mode::User);
}

#[test]
fn test_ambiguous_mode_defaults_to_architect() {
    let c = run(&NormalizedTurn::text("hello there"), &SessionSnapshot::default());
    assert_eq!(c.mode, Mode::Architect);
}

/// The stored mode is carried for the host, never fed back into scoring
#[test]
fn test_session_mode_is_round_tripped_only() {
    let mut session = SessionSnapshot {
        mac_mode: Some("user".into()),
        ..SessionSnapshot::default()
    };
    let c = run(&NormalizedTurn::text("hello there"), &session);
    assert_eq!(c.mode, Mode::Architect);

    session.apply(c.session_update.as_ref().unwrap());
    assert_eq!(session.mac_mode.as_deref(), Some("architect"));
}

/// No field carries raw user text
#[test]
fn test_output_never_contains_text() {
    let turn = NormalizedTurn::text("my neighbour Zebediah owes me 400 pounds, tell me more?")
        .with_lane("music");
    let c = run(&turn, &SessionSnapshot::default());
    let json = serde_json::to_string(&c).unwrap();

    assert!(!json.contains("Zebediah"));
    assert!(!json.contains("neighbour"));
    assert!(!json.contains("pounds"));
    assert!(c.trace.len() <= 160);
}

/// The host folds each proposal back into its stored snapshot
#[test]
fn test_host_loop_counters() {
    let m = mediator();
    let mut session = SessionSnapshot::default();

    for (i, text) in ["hmm", "not sure", "whatever"].iter().enumerate() {
        let c = m.mediate(
            &NormalizedTurn::text(*text),
            &session,
            &MediationOptions::at(1_000 + i as i64),
        );
        session.apply(c.session_update.as_ref().unwrap());
    }
    assert_eq!(session.turn_count, 3);
    assert_eq!(session.turns_since_advance, 3);
    assert_eq!(session.last_advance_at, None);

    let c = m.mediate(
        &NormalizedTurn::action("top10", Some(1988)),
        &session,
        &MediationOptions::at(5_000),
    );
    assert!(c.stalled);
    assert_eq!(c.intent, Intent::Advance);
    session.apply(c.session_update.as_ref().unwrap());

    assert_eq!(session.turn_count, 4);
    assert_eq!(session.turns_since_advance, 0);
    assert_eq!(session.last_advance_at, Some(5_000));
    assert_eq!(session.last_action.as_deref(), Some("top10"));
}

/// The snapshot handed in is never mutated
#[test]
fn test_snapshot_untouched() {
    let session = SessionSnapshot {
        lane: Some("music".into()),
        turns_since_advance: 1,
        ..SessionSnapshot::default()
    };
    let before = session.clone();
    let _ = run(&NormalizedTurn::action("top10", Some(1988)), &session);
    assert_eq!(session, before);
}

#[test]
fn test_invalid_weights_fail_open() {
    let m = mediator().with_weights(Weights {
        conf_nyx_base: f64::NAN,
        ..Weights::default()
    });
    let c = m.mediate(
        &NormalizedTurn::text("anything"),
        &SessionSnapshot::default(),
        &MediationOptions::default(),
    );

    assert!(c.is_fail_open());
    assert_eq!(c.error_code, Some(ErrorCode::M101_INVALID_CONFIG));
    assert_eq!(c.mode, Mode::Architect);
    assert_eq!(c.intent, Intent::Clarify);
    assert_eq!(c.dominance, Dominance::Neutral);
    assert_eq!(c.budget, Budget::Short);
    assert!(!c.velvet);
    assert_eq!(c.novelty_score, 0.0);
    assert_eq!(c.marion_state, MarionState::Seek);
    assert_eq!(c.trace, "fail_open");
    assert!(c.telemetry.fail_open);
    assert_eq!(c.telemetry.ts_ms, 1_700_000_000_000);
    assert_eq!(c.session_update, None);
}

#[test]
fn test_try_mediate_surfaces_error() {
    let m = mediator().with_weights(Weights {
        stall_window_ms: 0,
        ..Weights::default()
    });
    let err = m
        .try_mediate(
            &NormalizedTurn::text("x"),
            &SessionSnapshot::default(),
            &MediationOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::M101_INVALID_CONFIG);
}

/// Lenient JSON entry point accepts anything
#[test]
fn test_mediate_value_malformed_inputs() {
    let inputs = [
        (json!(null), json!(null), json!(null)),
        (json!([1, 2, 3]), json!("session"), json!(42)),
        (
            json!({"text": 12, "action": {"nested": true}, "year": "nineteen", "turnSignals": []}),
            json!({"turnsSinceAdvance": "lots", "velvetMode": "maybe", "lastYear": 3000}),
            json!({"nowMs": "soon", "forceBudget": 7}),
        ),
    ];
    for (turn, session, opts) in inputs.iter() {
        let c = mediate_value(turn, session, opts);
        assert!(c.trace.len() <= 160);
        assert!(c.confidence.user >= 0.0 && c.confidence.user <= 1.0);
    }
}

#[test]
fn test_mediate_value_reads_camel_and_snake_case() {
    let c = mediate_value(
        &json!({"action": "TOP10", "year": "1988", "lane": "Music"}),
        &json!({"turns_since_advance": 2}),
        &json!({"now_ms": 10}),
    );
    assert_eq!(c.intent, Intent::Advance);
    assert!(c.stalled);
    assert_eq!(c.telemetry.ts_ms, 10);
    let update = c.session_update.unwrap();
    assert_eq!(update.lane.as_deref(), Some("music"));
    assert_eq!(update.last_action.as_deref(), Some("top10"));
}

/// Free-form actions still advance but never reach the session as text
#[test]
fn test_free_form_action_advances_without_leaking() {
    let turn = NormalizedTurn::action("Top 10 from That Year!", Some(1988))
        .with_text("I'm so overwhelmed and stuck");
    let c = mediator().mediate(&turn, &SessionSnapshot::default(), &MediationOptions::at(3));

    assert_eq!(c.intent, Intent::Advance);
    assert!(c.actionable);
    let update = c.session_update.unwrap();
    assert_eq!(update.turns_since_advance, 0);
    assert_eq!(update.last_action, None);
}

#[test]
fn test_overrides_after_computation() {
    let opts = MediationOptions {
        force_budget: Some("MEDIUM".into()),
        force_dominance: Some("soft".into()),
        force_velvet: Some(false),
        ..MediationOptions::at(1)
    };
    let session = SessionSnapshot {
        lane: Some("music".into()),
        velvet_mode: true,
        velvet_since: Some(1),
        ..SessionSnapshot::default()
    };
    let c = mediator().mediate(&NormalizedTurn::action("top10", Some(1988)), &session, &opts);
    assert_eq!(c.budget, Budget::Medium);
    assert_eq!(c.dominance, Dominance::Soft);
    assert!(!c.velvet);
    assert_eq!(c.velvet_since, None);
    assert_eq!(c.telemetry.overrides.len(), 3);
    assert!(!c.session_update.unwrap().velvet_mode);
}

#[test]
fn test_trace_hash_is_deterministic() {
    let turn = NormalizedTurn::text("explain how charts work");
    let a = run(&turn, &SessionSnapshot::default());
    let b = run(&turn, &SessionSnapshot::default());
    assert_eq!(a.trace, b.trace);
    assert_eq!(a.trace_hash, b.trace_hash);
    assert_eq!(a.telemetry.trace_hash, a.trace_hash);
}
