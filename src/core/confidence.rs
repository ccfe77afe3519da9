//! Per-turn confidence for the user and for the assistant (nyx)
//!
//! Stateless apart from the repeat check against the prior snapshot.

use super::intent::IntentDecision;
use super::lexicon::Lexicon;
use super::weights::Weights;
use crate::error::{ensure_finite, MediationError};
use crate::types::{Confidence, Intent, Mode, NormalizedTurn, SessionSnapshot};

pub fn score_confidence(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    decision: &IntentDecision,
    intent: Intent,
    mode: Mode,
    lex: &Lexicon,
    w: &Weights,
) -> Result<Confidence, MediationError> {
    Ok(Confidence {
        user: ensure_finite(user_confidence(turn, decision, lex, w), "confidence.user")?,
        nyx: ensure_finite(nyx_confidence(turn, session, intent, mode, w), "confidence.nyx")?,
    })
}

fn user_confidence(
    turn: &NormalizedTurn,
    decision: &IntentDecision,
    lex: &Lexicon,
    w: &Weights,
) -> f64 {
    let signals = &turn.turn_signals;
    let mut user = w.conf_user_base;

    if turn.has_action() || decision.actionable {
        user += w.conf_user_action;
    }
    if signals.payload_actionable && signals.has_payload && decision.text_empty {
        user += w.conf_user_silent_actionable;
    }
    if lex.uncertainty.is_match(&turn.text) {
        user += w.conf_user_uncertain;
    }
    if lex.rhetorical.is_match(&turn.text) {
        user += w.conf_user_rhetorical;
    }
    user.clamp(0.0, 1.0)
}

fn nyx_confidence(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    intent: Intent,
    mode: Mode,
    w: &Weights,
) -> f64 {
    let mut nyx = w.conf_nyx_base;

    match intent {
        Intent::Advance => nyx += w.conf_nyx_advance,
        Intent::Stabilize => nyx += w.conf_nyx_stabilize,
        Intent::Clarify => {}
    }
    if is_exact_repeat(turn, session) {
        nyx += w.conf_nyx_repeat;
    }
    match mode {
        Mode::Architect => nyx += w.conf_nyx_mode,
        Mode::User => nyx -= w.conf_nyx_mode,
        Mode::Transitional => {}
    }
    nyx.clamp(0.0, 1.0)
}

/// Same action and same year as the previous turn
pub fn is_exact_repeat(turn: &NormalizedTurn, session: &SessionSnapshot) -> bool {
    match (
        turn.any_action_token(),
        turn.effective_year(),
        session.last_action_token(),
        session.last_year,
    ) {
        (Some(action), Some(year), Some(last_action), Some(last_year)) => {
            action == last_action && year == last_year
        }
        _ => false,
    }
}
