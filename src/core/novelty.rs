//! Novelty (ambiguity) scoring and the discovery hint
//!
//! Additive and clamped to [0, 1]. All weights are non-negative, so adding a
//! trigger to an otherwise fixed turn never lowers the score.

use super::lexicon::Lexicon;
use super::weights::Weights;
use crate::error::{ensure_finite, MediationError};
use crate::types::{
    DiscoveryHint, HintStyle, Intent, Mode, NoveltyReason, NormalizedTurn, SessionSnapshot,
};
use crate::NOVELTY_MAX_REASONS;

#[derive(Debug, Clone, PartialEq)]
pub struct NoveltyScore {
    pub score: f64,
    pub reasons: Vec<NoveltyReason>,
}

/// Facts already decided upstream that the scorer reads
#[derive(Debug, Clone, Copy)]
pub struct NoveltyContext {
    pub mode: Mode,
    pub intent: Intent,
    pub actionable: bool,
}

pub fn score_novelty(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    ctx: NoveltyContext,
    lex: &Lexicon,
    w: &Weights,
) -> Result<NoveltyScore, MediationError> {
    let text = turn.text.as_str();
    let signals = &turn.turn_signals;
    let text_empty = turn.is_text_empty();

    let triggers = [
        (
            !text_empty && turn.word_count() <= w.novelty_short_words,
            w.novelty_short_text,
            NoveltyReason::ShortText,
        ),
        (
            lex.mixed_domain.is_match(text),
            w.novelty_mixed_domain,
            NoveltyReason::MixedDomain,
        ),
        (
            lex.pronoun.is_match(text) && lex.question.is_match(text),
            w.novelty_ambiguous_reference,
            NoveltyReason::AmbiguousReference,
        ),
        (
            signals.has_payload && text_empty && !ctx.actionable,
            w.novelty_silent_payload,
            NoveltyReason::SilentPayload,
        ),
        (
            !turn.has_action()
                && !turn.has_payload_action()
                && turn.effective_year().is_none()
                && !ctx.actionable,
            w.novelty_no_anchor,
            NoveltyReason::NoAnchor,
        ),
        (
            session.turns_since_advance >= w.stall_turn_limit && ctx.intent != Intent::Advance,
            w.novelty_stall_pressure,
            NoveltyReason::StallPressure,
        ),
        (
            ctx.mode == Mode::Architect && !ctx.actionable && !lex.digits.is_match(text),
            w.novelty_precision_gap,
            NoveltyReason::PrecisionGap,
        ),
    ];

    let mut score = 0.0;
    let mut reasons = Vec::with_capacity(NOVELTY_MAX_REASONS);
    for (fired, weight, reason) in triggers {
        if !fired {
            continue;
        }
        score += weight;
        if reasons.len() < NOVELTY_MAX_REASONS {
            reasons.push(reason);
        }
    }

    let score = ensure_finite(score, "novelty")?.clamp(0.0, 1.0);
    Ok(NoveltyScore { score, reasons })
}

/// Surface an exploratory question only for ambiguous, non-actionable CLARIFY turns
pub fn discovery_hint(novelty: &NoveltyScore, ctx: NoveltyContext, w: &Weights) -> DiscoveryHint {
    let enabled =
        novelty.score >= w.discovery_threshold && ctx.intent == Intent::Clarify && !ctx.actionable;
    if !enabled {
        return DiscoveryHint::disabled();
    }
    DiscoveryHint {
        enabled,
        style: if ctx.mode.is_directive() {
            HintStyle::Options
        } else {
            HintStyle::GentleProbe
        },
        reason_codes: novelty.reasons.clone(),
    }
}
