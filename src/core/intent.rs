//! Intent classification: ADVANCE / CLARIFY / STABILIZE
//!
//! Actionable turns advance unconditionally. Text heuristics only apply
//! when nothing structured was selected.

use super::lexicon::Lexicon;
use crate::types::{Intent, NormalizedTurn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentDecision {
    pub intent: Intent,
    pub actionable: bool,
    pub text_empty: bool,
    /// Text asked how/why/explain/help
    pub clarify_cue: bool,
}

/// Explicit action, or an actionable payload that carries an anchor or
/// stands in for empty text
pub fn is_actionable(turn: &NormalizedTurn) -> bool {
    let signals = &turn.turn_signals;
    let explicit = turn.has_action();
    let anchored_payload =
        signals.payload_actionable && (turn.has_payload_action() || signals.payload_year.is_some());
    let silent_payload = signals.payload_actionable && turn.is_text_empty() && signals.has_payload;
    explicit || anchored_payload || silent_payload
}

pub fn classify_intent(turn: &NormalizedTurn, lex: &Lexicon) -> IntentDecision {
    let actionable = is_actionable(turn);
    let text_empty = turn.is_text_empty();
    let clarify_cue = lex.clarify.is_match(&turn.text);

    // Clarify cue and no cue both land on CLARIFY
    let intent = if actionable {
        Intent::Advance
    } else if lex.stabilize.is_match(&turn.text) {
        Intent::Stabilize
    } else {
        Intent::Clarify
    };

    IntentDecision {
        intent,
        actionable,
        text_empty,
        clarify_cue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TurnSignals;

    fn lex() -> Lexicon {
        Lexicon::standard()
    }

    #[test]
    fn test_explicit_action_advances_regardless_of_text() {
        let turn = NormalizedTurn::action("top10", Some(1988)).with_text("I'm overwhelmed, why?");
        let d = classify_intent(&turn, &lex());
        assert!(d.actionable);
        assert_eq!(d.intent, Intent::Advance);
    }

    #[test]
    fn test_free_form_action_still_advances() {
        for action in ["top 10", "Top10!", "year_end_hot_100_singles_by_decade_x"] {
            let turn = NormalizedTurn::action(action, Some(1988))
                .with_text("I'm so overwhelmed and stuck");
            let d = classify_intent(&turn, &lex());
            assert!(d.actionable, "{}", action);
            assert_eq!(d.intent, Intent::Advance);
        }
        assert!(!is_actionable(&NormalizedTurn::action(" ", None)));
    }

    #[test]
    fn test_payload_with_year_is_actionable() {
        let mut turn = NormalizedTurn::text("that one");
        turn.turn_signals = TurnSignals {
            has_payload: true,
            payload_actionable: true,
            payload_year: Some(1977),
            ..TurnSignals::default()
        };
        assert!(is_actionable(&turn));
    }

    #[test]
    fn test_silent_payload_is_actionable() {
        let mut turn = NormalizedTurn::text("");
        turn.turn_signals = TurnSignals {
            has_payload: true,
            payload_actionable: true,
            ..TurnSignals::default()
        };
        assert!(is_actionable(&turn));

        // With text and no anchor the payload alone is not enough
        turn.text = "hmm".into();
        assert!(!is_actionable(&turn));
    }

    #[test]
    fn test_stabilize_trigger() {
        let d = classify_intent(&NormalizedTurn::text("I'm so overwhelmed and stuck"), &lex());
        assert_eq!(d.intent, Intent::Stabilize);
        assert!(!d.actionable);
    }

    #[test]
    fn test_clarify_trigger_and_default() {
        let d = classify_intent(&NormalizedTurn::text("explain how charts work"), &lex());
        assert_eq!(d.intent, Intent::Clarify);
        assert!(d.clarify_cue);
        let d = classify_intent(&NormalizedTurn::text("nice"), &lex());
        assert_eq!(d.intent, Intent::Clarify);
        assert!(!d.clarify_cue);
        assert!(!d.text_empty);
    }
}
