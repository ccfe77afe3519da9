//! Mode classification: architect / user / transitional
//!
//! A well-formed client override wins. Otherwise two weighted signal
//! families are scored over the text and resolved through `TIE_BREAK`.
//! When no row fires the mode defaults to architect.

use serde::Serialize;

use super::lexicon::Lexicon;
use super::weights::Weights;
use crate::types::{Mode, NormalizedTurn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModeScores {
    pub architect: u32,
    pub user: u32,
    /// Fixed bonus when both families fire, else 0
    pub transitional: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: Mode,
    pub scores: ModeScores,
    pub overridden: bool,
}

type Rule = fn(&ModeScores, &Weights) -> bool;

fn transitional_rule(s: &ModeScores, w: &Weights) -> bool {
    s.transitional > 0 && s.transitional >= w.mode_transitional_bonus
}

fn architect_rule(s: &ModeScores, w: &Weights) -> bool {
    s.architect >= s.user.saturating_add(w.mode_margin)
}

fn user_rule(s: &ModeScores, w: &Weights) -> bool {
    s.user >= s.architect.saturating_add(w.mode_margin)
}

/// Evaluated top to bottom; first match wins
const TIE_BREAK: [(Rule, Mode); 3] = [
    (transitional_rule, Mode::Transitional),
    (architect_rule, Mode::Architect),
    (user_rule, Mode::User),
];

/// Mode when no tie-break row fires
pub const DEFAULT_MODE: Mode = Mode::Architect;

pub fn classify_mode(turn: &NormalizedTurn, lex: &Lexicon, w: &Weights) -> ModeDecision {
    if let Some(mode) = turn.mac_mode.as_deref().and_then(Mode::parse) {
        return ModeDecision {
            mode,
            scores: ModeScores::default(),
            overridden: true,
        };
    }

    let scores = score_text(&turn.text, lex, w);
    ModeDecision {
        mode: resolve(&scores, w),
        scores,
        overridden: false,
    }
}

pub fn score_text(text: &str, lex: &Lexicon, w: &Weights) -> ModeScores {
    let architect = family(lex.directive.is_match(text), w.mode_directive)
        + family(lex.constraint.is_match(text), w.mode_constraint)
        + family(lex.enumeration.is_match(text), w.mode_enumeration)
        + family(lex.technical.is_match(text), w.mode_technical);
    let user = family(lex.uncertainty.is_match(text), w.mode_uncertainty)
        + family(lex.emotion.is_match(text), w.mode_emotion);
    let transitional = if architect > 0 && user > 0 {
        w.mode_transitional_bonus
    } else {
        0
    };
    ModeScores {
        architect,
        user,
        transitional,
    }
}

pub fn resolve(scores: &ModeScores, w: &Weights) -> Mode {
    TIE_BREAK
        .iter()
        .find(|(rule, _)| rule(scores, w))
        .map(|(_, mode)| *mode)
        .unwrap_or(DEFAULT_MODE)
}

fn family(hit: bool, weight: u32) -> u32 {
    if hit {
        weight
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> ModeDecision {
        classify_mode(&NormalizedTurn::text(text), &Lexicon::standard(), &Weights::default())
    }

    #[test]
    fn test_directive_text_is_architect() {
        let d = classify("Build me a plan, it must ship by friday");
        assert_eq!(d.mode, Mode::Architect);
        assert!(d.scores.architect >= 4);
        assert_eq!(d.scores.user, 0);
    }

    #[test]
    fn test_emotional_text_is_user() {
        let d = classify("I feel lost and I'm not sure about anything");
        assert_eq!(d.mode, Mode::User);
    }

    #[test]
    fn test_both_families_is_transitional() {
        let d = classify("I feel anxious but I need to design the schema");
        assert_eq!(d.scores.transitional, crate::MODE_TRANSITIONAL_BONUS);
        assert_eq!(d.mode, Mode::Transitional);
    }

    #[test]
    fn test_ambiguous_defaults_to_architect() {
        assert_eq!(classify("hello there").mode, Mode::Architect);
        assert_eq!(classify("").mode, Mode::Architect);
        // one technical noun: architect 1, user 0, no margin
        assert_eq!(classify("the server").mode, Mode::Architect);
    }

    #[test]
    fn test_override_wins_when_well_formed() {
        let mut turn = NormalizedTurn::text("Build the pipeline now");
        turn.mac_mode = Some("user".into());
        let d = classify_mode(&turn, &Lexicon::standard(), &Weights::default());
        assert_eq!(d.mode, Mode::User);
        assert!(d.overridden);

        turn.mac_mode = Some("boss".into());
        let d = classify_mode(&turn, &Lexicon::standard(), &Weights::default());
        assert_eq!(d.mode, Mode::Architect);
        assert!(!d.overridden);
    }

    #[test]
    fn test_table_order() {
        let w = Weights::default();
        let tie = ModeScores { architect: 2, user: 2, transitional: 3 };
        assert_eq!(resolve(&tie, &w), Mode::Transitional);
        let near = ModeScores { architect: 1, user: 2, transitional: 0 };
        assert_eq!(resolve(&near, &w), Mode::Architect);
        let user = ModeScores { architect: 0, user: 2, transitional: 0 };
        assert_eq!(resolve(&user, &w), Mode::User);
    }
}
