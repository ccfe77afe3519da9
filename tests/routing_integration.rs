//! Integration tests for domain routing
//!
//! Tests the full path: turn → mediate → route_domain → DomainRouting

use marion::core::{DomainRouter, FixedClock, Mediator, RouteContext};
use marion::types::{
    Domain, Intent, MediationOptions, Mode, NormalizedTurn, RiskTier, RouteOptions,
    SessionSnapshot,
};
use marion::{route_domain, route_value};
use pretty_assertions::assert_eq;
use serde_json::json;

const BREACH: &str = "we found a breach last night and ransomware is on two servers";

fn mediate(turn: &NormalizedTurn, session: &SessionSnapshot) -> marion::types::Cognition {
    Mediator::new()
        .with_clock(FixedClock(0))
        .mediate(turn, session, &MediationOptions::at(1))
}

#[test]
fn test_breach_on_cyber_lane_routes_to_cyber() {
    let turn = NormalizedTurn::text(BREACH).with_lane("cyber");
    let session = SessionSnapshot::default();
    let cog = mediate(&turn, &session);
    let routing = route_domain(&turn, &session, &cog, &RouteOptions::default());

    assert_eq!(routing.primary, Domain::Cyber);
    assert!(routing.reason.confidence > 0.5);
    assert!(routing.reason.signals.iter().any(|s| s == "kw:cyber"));
}

/// Host overwrites the risk tier before routing
#[test]
fn test_high_risk_shifts_primary_away_from_cyber() {
    let turn = NormalizedTurn::text(BREACH).with_lane("cyber");
    let session = SessionSnapshot::default();
    let mut cog = mediate(&turn, &session);
    cog.risk_tier = RiskTier::High;
    let routing = route_domain(&turn, &session, &cog, &RouteOptions::default());

    assert!(matches!(
        routing.primary,
        Domain::Psychology | Domain::English | Domain::Core
    ));
    assert!(!routing.secondary.contains(&Domain::Cyber));
    assert!(!routing.secondary.contains(&Domain::Law));

    let card = DomainRouter::new().score(&turn, &session, RouteContext::from_cognition(&cog));
    assert!(card.raw.get(Domain::Cyber) <= 1.0);
}

#[test]
fn test_stabilize_turn_routes_to_psychology() {
    let turn = NormalizedTurn::text("I'm so overwhelmed and stuck");
    let session = SessionSnapshot::default();
    let cog = mediate(&turn, &session);
    assert_eq!(cog.intent, Intent::Stabilize);

    let routing = route_domain(&turn, &session, &cog, &RouteOptions::default());
    assert_eq!(routing.primary, Domain::Psychology);
}

#[test]
fn test_chart_action_routes_to_music() {
    let turn = NormalizedTurn::action("top10", Some(1988)).with_lane("music");
    let session = SessionSnapshot::default();
    let cog = mediate(&turn, &session);
    let routing = route_domain(&turn, &session, &cog, &RouteOptions::default());

    assert_eq!(routing.primary, Domain::Music);
    assert_eq!(
        routing.reason.signals[..2].to_vec(),
        vec!["lane:music".to_string(), "action:music".to_string()]
    );
}

#[test]
fn test_nothing_to_go_on_falls_back_to_core() {
    let routing = DomainRouter::new().route_with(
        &NormalizedTurn::text(""),
        &SessionSnapshot::default(),
        RouteContext {
            mode: Mode::User,
            intent: Intent::Clarify,
            risk_tier: RiskTier::Low,
        },
        &RouteOptions::default(),
    );
    assert_eq!(routing.primary, Domain::Core);
    assert!(routing.secondary.is_empty());
}

#[test]
fn test_secondary_respects_options() {
    let turn = NormalizedTurn::text(
        "our ai startup needs a contract review after a breach and a pricing plan",
    );
    let session = SessionSnapshot::default();
    let cog = mediate(&turn, &session);

    let none = route_domain(
        &turn,
        &session,
        &cog,
        &RouteOptions {
            max_secondary: 0,
            min_secondary_score: 1.6,
        },
    );
    assert!(none.secondary.is_empty());

    let many = route_domain(
        &turn,
        &session,
        &cog,
        &RouteOptions {
            max_secondary: 8,
            min_secondary_score: 0.0,
        },
    );
    assert!(!many.secondary.contains(&many.primary));
    assert!(many.secondary.len() >= 2);
}

#[test]
fn test_signals_are_bounded_and_text_free() {
    let turn = NormalizedTurn::text(
        "ai and machine learning, stock portfolio, gdpr contract, phishing breach, anxiety, essay grammar, roadmap strategy, top 10 songs",
    )
    .with_lane("music");
    let session = SessionSnapshot {
        lane: Some("cyber".into()),
        ..SessionSnapshot::default()
    };
    let cog = mediate(&turn, &session);
    let routing = route_domain(&turn, &session, &cog, &RouteOptions::default());

    assert!(routing.reason.signals.len() <= 10);
    for tag in &routing.reason.signals {
        assert!(tag.chars().all(|c| c.is_ascii_lowercase() || c == ':' || c == '+'));
    }
}

#[test]
fn test_route_value_is_lenient() {
    let routing = route_value(
        &json!({"text": BREACH, "lane": "CYBER"}),
        &json!("not a session"),
        &json!({"riskTier": "HIGH", "intent": "clarify"}),
        &json!({"maxSecondary": "one"}),
    );
    assert_ne!(routing.primary, Domain::Cyber);

    let routing = route_value(&json!(null), &json!(null), &json!(null), &json!(null));
    assert_eq!(routing.primary, Domain::Core);
}

#[test]
fn test_normalized_scores() {
    let turn = NormalizedTurn::text(BREACH).with_lane("cyber");
    let card =
        DomainRouter::new().score(&turn, &SessionSnapshot::default(), RouteContext::default());
    assert_eq!(card.normalized.get(Domain::Cyber), 1.0);
    assert!(card.normalized.get(Domain::Strategy) < 1.0);
}
