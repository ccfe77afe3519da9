//! Mediator: one call per inbound turn
//!
//! Pipeline: mode → intent → stall → confidence → desire → velvet →
//! novelty → posture → overrides → session update → trace.
//!
//! `try_mediate` surfaces internal failures; `mediate` never fails and
//! never panics past its boundary.

use std::panic::{self, AssertUnwindSafe};

use lazy_static::lazy_static;
use serde_json::Value;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::confidence::score_confidence;
use super::desire::infer_desire;
use super::intent::classify_intent;
use super::lexicon::Lexicon;
use super::mode::classify_mode;
use super::novelty::{discovery_hint, score_novelty, NoveltyContext};
use super::posture::{derive_posture, risk_tier};
use super::stall::apply_stall;
use super::trace::{build_telemetry, build_trace, trace_hash, TraceFields, FAIL_OPEN_TRACE};
use super::velvet::{step_velvet, VelvetContext};
use super::weights::Weights;
use crate::error::MediationError;
use crate::types::{
    Budget, Cognition, Confidence, DiscoveryHint, Dominance, ErrorCode, Intent, LatentDesire,
    MarionState, MediationOptions, Mode, NormalizedTurn, OverrideKind, RiskTier, SessionSnapshot,
    SessionUpdate, VelvetReason,
};
use crate::{CONF_NYX_BASE, CONF_USER_BASE};

lazy_static! {
    static ref DEFAULT_MEDIATOR: Mediator = Mediator::new();
}

#[derive(Debug, Clone)]
pub struct Mediator<C: Clock = SystemClock> {
    lexicon: Lexicon,
    weights: Weights,
    clock: C,
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}

impl Mediator {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::standard(),
            weights: Weights::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Mediator<C> {
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Swap the time source
    pub fn with_clock<K: Clock>(self, clock: K) -> Mediator<K> {
        Mediator {
            lexicon: self.lexicon,
            weights: self.weights,
            clock,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn now_ms(&self, opts: &MediationOptions) -> i64 {
        opts.now_ms.unwrap_or_else(|| self.clock.now_ms())
    }

    /// Fail-open boundary
    pub fn mediate(
        &self,
        turn: &NormalizedTurn,
        session: &SessionSnapshot,
        opts: &MediationOptions,
    ) -> Cognition {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.try_mediate(turn, session, opts)));
        let err = match outcome {
            Ok(Ok(cognition)) => return cognition,
            Ok(Err(err)) => err,
            Err(_) => MediationError::Panic,
        };
        let code = err.code();
        warn!(error_code = code.code(), error = %err, "mediation failed open");
        let now = panic::catch_unwind(AssertUnwindSafe(|| self.now_ms(opts))).unwrap_or(0);
        fail_open_cognition(now, code)
    }

    pub fn try_mediate(
        &self,
        turn: &NormalizedTurn,
        session: &SessionSnapshot,
        opts: &MediationOptions,
    ) -> Result<Cognition, MediationError> {
        let w = &self.weights;
        let lex = &self.lexicon;
        w.validate()?;
        let now = self.now_ms(opts);

        let mode_decision = classify_mode(turn, lex, w);
        let mode = mode_decision.mode;
        let intent_decision = classify_intent(turn, lex);
        let stall = apply_stall(session, mode, intent_decision.intent, now, w);
        let intent = stall.intent;
        let actionable = intent_decision.actionable;

        let confidence =
            score_confidence(turn, session, &intent_decision, intent, mode, lex, w)?;
        let latent_desire = infer_desire(turn, session, mode, lex);

        let velvet = step_velvet(
            turn,
            session,
            VelvetContext {
                intent,
                nyx_confidence: confidence.nyx,
                desire: latent_desire,
                now_ms: now,
            },
            lex,
            w,
        );

        let novelty_ctx = NoveltyContext {
            mode,
            intent,
            actionable,
        };
        let novelty = score_novelty(turn, session, novelty_ctx, lex, w)?;
        let discovery = discovery_hint(&novelty, novelty_ctx, w);

        let posture = derive_posture(mode, intent, stall.stalled, velvet.active);
        let risk = risk_tier(turn, intent, lex);

        let mut fields = TraceFields {
            mode,
            intent,
            dominance: posture.dominance,
            budget: posture.budget,
            stalled: stall.stalled,
            actionable,
            text_empty: intent_decision.text_empty,
            grounding_max_lines: posture.grounding_max_lines,
            latent_desire,
            confidence,
            velvet: velvet.active,
            velvet_reason: velvet.reason,
            novelty_score: novelty.score,
            novelty_reasons: novelty.reasons,
            discovery: discovery.enabled,
            marion_state: posture.marion_state,
            risk_tier: risk,
            overrides: Vec::new(),
        };
        let mut velvet_since = velvet.since;

        // Overrides land after everything is computed
        if let Some(budget) = opts.budget() {
            fields.budget = budget;
            fields.overrides.push(OverrideKind::Budget);
        }
        if let Some(dominance) = opts.dominance() {
            fields.dominance = dominance;
            fields.overrides.push(OverrideKind::Dominance);
        }
        if let Some(forced) = opts.intent() {
            fields.intent = forced;
            fields.overrides.push(OverrideKind::Intent);
        }
        if let Some(forced) = opts.force_velvet {
            fields.velvet = forced;
            fields.velvet_reason = Some(VelvetReason::Forced);
            velvet_since = if forced {
                velvet_since.or(session.velvet_since).or(Some(now))
            } else {
                None
            };
            fields.overrides.push(OverrideKind::Velvet);
        }

        let session_update = propose_update(turn, session, &fields, velvet_since, now);

        let trace = build_trace(&fields)?;
        let hash = trace_hash(&trace);
        let telemetry = build_telemetry(&fields, now, &hash, None);

        debug!(
            mode = fields.mode.as_str(),
            mode_overridden = mode_decision.overridden,
            intent = fields.intent.as_str(),
            stalled = fields.stalled,
            stall_forced = stall.forced,
            velvet = fields.velvet,
            velvet_votes = velvet.signals.votes(),
            novelty_pct = telemetry.novelty_pct,
            risk = fields.risk_tier.as_str(),
            trace_hash = %hash,
            "mediated turn"
        );

        Ok(Cognition {
            mode: fields.mode,
            intent: fields.intent,
            dominance: fields.dominance,
            budget: fields.budget,
            stalled: fields.stalled,
            actionable: fields.actionable,
            text_empty: fields.text_empty,
            grounding_max_lines: fields.grounding_max_lines,
            latent_desire: fields.latent_desire,
            confidence: fields.confidence,
            velvet: fields.velvet,
            velvet_since,
            velvet_reason: fields.velvet_reason,
            novelty_score: fields.novelty_score,
            novelty_reasons: fields.novelty_reasons,
            discovery_hint: discovery,
            marion_state: fields.marion_state,
            risk_tier: fields.risk_tier,
            trace,
            trace_hash: hash,
            telemetry,
            session_update: Some(session_update),
            error_code: None,
        })
    }
}

/// Values the host should persist; the snapshot is left untouched
fn propose_update(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    fields: &TraceFields,
    velvet_since: Option<i64>,
    now: i64,
) -> SessionUpdate {
    let advanced = fields.intent == Intent::Advance;
    SessionUpdate {
        mac_mode: fields.mode,
        lane: turn.lane_token().or_else(|| session.lane_token()),
        last_action: turn
            .any_action_token()
            .or_else(|| session.last_action_token()),
        last_year: turn.effective_year().or(session.last_year),
        turn_count: session.turn_count.saturating_add(1),
        turns_since_advance: if advanced {
            0
        } else {
            session.turns_since_advance.saturating_add(1)
        },
        last_advance_at: if advanced {
            Some(now)
        } else {
            session.last_advance_at
        },
        velvet_mode: fields.velvet,
        velvet_since: if fields.velvet { velvet_since } else { None },
    }
}

/// Fixed, complete, safe Cognition returned when mediation fails
pub fn fail_open_cognition(now_ms: i64, code: ErrorCode) -> Cognition {
    let fields = TraceFields {
        mode: Mode::Architect,
        intent: Intent::Clarify,
        dominance: Dominance::Neutral,
        budget: Budget::Short,
        stalled: false,
        actionable: false,
        text_empty: true,
        grounding_max_lines: 0,
        latent_desire: LatentDesire::Curiosity,
        confidence: Confidence {
            user: CONF_USER_BASE,
            nyx: CONF_NYX_BASE,
        },
        velvet: false,
        velvet_reason: None,
        novelty_score: 0.0,
        novelty_reasons: Vec::new(),
        discovery: false,
        marion_state: MarionState::Seek,
        risk_tier: RiskTier::Low,
        overrides: Vec::new(),
    };
    let hash = trace_hash(FAIL_OPEN_TRACE);
    let telemetry = build_telemetry(&fields, now_ms, &hash, Some(code));

    Cognition {
        mode: fields.mode,
        intent: fields.intent,
        dominance: fields.dominance,
        budget: fields.budget,
        stalled: fields.stalled,
        actionable: fields.actionable,
        text_empty: fields.text_empty,
        grounding_max_lines: fields.grounding_max_lines,
        latent_desire: fields.latent_desire,
        confidence: fields.confidence,
        velvet: false,
        velvet_since: None,
        velvet_reason: None,
        novelty_score: 0.0,
        novelty_reasons: Vec::new(),
        discovery_hint: DiscoveryHint::disabled(),
        marion_state: fields.marion_state,
        risk_tier: fields.risk_tier,
        trace: FAIL_OPEN_TRACE.to_string(),
        trace_hash: hash,
        telemetry,
        session_update: None,
        error_code: Some(code),
    }
}

/// Mediate with the default lexicon, weights and system clock
pub fn mediate(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    opts: &MediationOptions,
) -> Cognition {
    DEFAULT_MEDIATOR.mediate(turn, session, opts)
}

/// JSON entry point: coerces all three inputs leniently, never fails
pub fn mediate_value(turn: &Value, session: &Value, opts: &Value) -> Cognition {
    mediate(
        &NormalizedTurn::from_value(turn),
        &SessionSnapshot::from_value(session),
        &MediationOptions::from_value(opts),
    )
}
