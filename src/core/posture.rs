//! Response posture: dominance, budget, grounding, conversational move, risk

use super::lexicon::Lexicon;
use crate::types::{Budget, Dominance, Intent, MarionState, Mode, NormalizedTurn, RiskTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posture {
    pub dominance: Dominance,
    pub budget: Budget,
    pub grounding_max_lines: u8,
    pub marion_state: MarionState,
}

pub fn derive_posture(mode: Mode, intent: Intent, stalled: bool, velvet: bool) -> Posture {
    Posture {
        dominance: dominance(mode, intent, stalled),
        budget: budget(intent, stalled),
        grounding_max_lines: grounding_lines(intent, velvet),
        marion_state: marion_state(intent, stalled, velvet),
    }
}

pub fn dominance(mode: Mode, intent: Intent, stalled: bool) -> Dominance {
    match (intent, mode) {
        (Intent::Stabilize, _) => Dominance::Soft,
        (Intent::Advance, _) => Dominance::Firm,
        (_, Mode::User) => Dominance::Soft,
        (_, Mode::Architect) if stalled => Dominance::Firm,
        _ => Dominance::Neutral,
    }
}

pub fn budget(intent: Intent, stalled: bool) -> Budget {
    if intent == Intent::Clarify && !stalled {
        Budget::Medium
    } else {
        Budget::Short
    }
}

pub fn grounding_lines(intent: Intent, velvet: bool) -> u8 {
    match intent {
        Intent::Advance => 3,
        Intent::Clarify if velvet => 2,
        Intent::Clarify => 1,
        Intent::Stabilize => 0,
    }
}

pub fn marion_state(intent: Intent, stalled: bool, velvet: bool) -> MarionState {
    match intent {
        Intent::Stabilize => MarionState::Stabilize,
        Intent::Advance => MarionState::Deliver,
        Intent::Clarify if velvet || stalled => MarionState::Bridge,
        Intent::Clarify => MarionState::Seek,
    }
}

/// Crisis language is high risk regardless of intent
pub fn risk_tier(turn: &NormalizedTurn, intent: Intent, lex: &Lexicon) -> RiskTier {
    if lex.crisis.is_match(&turn.text) {
        RiskTier::High
    } else if intent == Intent::Stabilize {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
