//! Latent desire inference
//!
//! Ordered priority: text cues first (mastery, validation, curiosity,
//! comfort), then lane/action tokens, then mode or the prior immersion flag.

use super::lexicon::Lexicon;
use crate::types::{LatentDesire, Mode, NormalizedTurn, SessionSnapshot};

pub fn infer_desire(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    mode: Mode,
    lex: &Lexicon,
) -> LatentDesire {
    let text = turn.text.as_str();

    let text_rules = [
        (&lex.mastery, LatentDesire::Mastery),
        (&lex.validation, LatentDesire::Validation),
        (&lex.curiosity, LatentDesire::Curiosity),
        (&lex.stabilize, LatentDesire::Comfort),
    ];
    if let Some((_, desire)) = text_rules.iter().find(|(re, _)| re.is_match(text)) {
        return *desire;
    }

    if let Some(desire) = token_fallback(turn, lex) {
        return desire;
    }

    if mode == Mode::Architect {
        LatentDesire::Authority
    } else if session.velvet_mode {
        LatentDesire::Comfort
    } else {
        LatentDesire::Curiosity
    }
}

/// Chart-ranking lanes/actions want authority; story lanes/actions want comfort
fn token_fallback(turn: &NormalizedTurn, lex: &Lexicon) -> Option<LatentDesire> {
    let tokens = [turn.any_action_token(), turn.lane_token()];
    for token in tokens.iter().flatten() {
        if lex.chart_token.is_match(token) {
            return Some(LatentDesire::Authority);
        }
        if lex.story_token.is_match(token) {
            return Some(LatentDesire::Comfort);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(turn: &NormalizedTurn, mode: Mode) -> LatentDesire {
        infer_desire(turn, &SessionSnapshot::default(), mode, &Lexicon::standard())
    }

    #[test]
    fn test_chart_action_is_authority() {
        let turn = NormalizedTurn::action("top10", Some(1988));
        assert_eq!(infer(&turn, Mode::User), LatentDesire::Authority);
    }

    #[test]
    fn test_story_action_is_comfort() {
        let turn = NormalizedTurn::action("micro_moment", Some(1988));
        assert_eq!(infer(&turn, Mode::Architect), LatentDesire::Comfort);
    }

    #[test]
    fn test_distress_is_comfort() {
        let turn = NormalizedTurn::text("I'm so overwhelmed and stuck");
        assert_eq!(infer(&turn, Mode::User), LatentDesire::Comfort);
    }

    #[test]
    fn test_priority_mastery_before_curiosity() {
        let turn = NormalizedTurn::text("why does this architecture scale");
        assert_eq!(infer(&turn, Mode::Architect), LatentDesire::Mastery);
    }

    #[test]
    fn test_validation() {
        let turn = NormalizedTurn::text("be honest with me, am I good enough at this");
        assert_eq!(infer(&turn, Mode::User), LatentDesire::Validation);
    }

    #[test]
    fn test_mode_and_velvet_fallbacks() {
        let turn = NormalizedTurn::text("ok");
        assert_eq!(infer(&turn, Mode::Architect), LatentDesire::Authority);
        assert_eq!(infer(&turn, Mode::User), LatentDesire::Curiosity);

        let session = SessionSnapshot {
            velvet_mode: true,
            ..SessionSnapshot::default()
        };
        assert_eq!(
            infer_desire(&turn, &session, Mode::User, &Lexicon::standard()),
            LatentDesire::Comfort
        );
    }
}
