//! Immersion ("velvet") state machine
//!
//! State transitions:
//! - INACTIVE → ACTIVE: eligible lane AND at least 2 of 5 entry signals
//! - ACTIVE → INACTIVE: the lane changed (reported first), or intent STABILIZE
//! - ACTIVE → ACTIVE: otherwise, keeping the prior `velvetSince`
//!
//! Ineligible lanes never start immersion; an active session there carries
//! its flag forward.

use super::lexicon::Lexicon;
use super::weights::Weights;
use crate::types::{Intent, LatentDesire, NormalizedTurn, SessionSnapshot, VelvetReason};

/// The five independent entry signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VelvetSignals {
    /// Depth-seeking action or text
    pub depth: bool,
    /// Same topic and year as last turn
    pub repeat_topic: bool,
    /// User accepted a suggestion
    pub accepted: bool,
    /// Nyx confidence at or above threshold
    pub confident: bool,
    /// Latent desire is comfort or curiosity
    pub desire: bool,
}

impl VelvetSignals {
    pub fn votes(&self) -> usize {
        [self.depth, self.repeat_topic, self.accepted, self.confident, self.desire]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelvetOutcome {
    pub active: bool,
    pub since: Option<i64>,
    pub reason: Option<VelvetReason>,
    pub eligible: bool,
    pub signals: VelvetSignals,
}

/// Inputs the machine reads beyond turn and snapshot
#[derive(Debug, Clone, Copy)]
pub struct VelvetContext {
    pub intent: Intent,
    pub nyx_confidence: f64,
    pub desire: LatentDesire,
    pub now_ms: i64,
}

pub fn step_velvet(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    ctx: VelvetContext,
    lex: &Lexicon,
    w: &Weights,
) -> VelvetOutcome {
    let turn_lane = turn.lane_token();
    let prior_lane = session.lane_token();
    let effective_lane = turn_lane.clone().or_else(|| prior_lane.clone());
    let eligible = effective_lane
        .as_deref()
        .map(|lane| lex.velvet_lane.is_match(lane))
        .unwrap_or(false);
    let lane_changed = matches!((&turn_lane, &prior_lane), (Some(a), Some(b)) if a != b);

    let signals = entry_signals(turn, session, effective_lane.as_deref(), ctx, lex, w);

    let (active, reason) = if session.velvet_mode {
        if lane_changed {
            (false, Some(VelvetReason::LaneShiftExit))
        } else if ctx.intent == Intent::Stabilize {
            (false, Some(VelvetReason::StabilizeExit))
        } else if eligible {
            (true, Some(VelvetReason::Hold))
        } else {
            (true, Some(VelvetReason::Carry))
        }
    } else if eligible && signals.votes() >= w.velvet_entry_votes {
        (true, Some(VelvetReason::Entry))
    } else {
        (false, None)
    };

    let since = match reason {
        Some(VelvetReason::Entry) => Some(ctx.now_ms),
        Some(VelvetReason::Hold) | Some(VelvetReason::Carry) => {
            session.velvet_since.or(Some(ctx.now_ms))
        }
        _ => None,
    };

    VelvetOutcome {
        active,
        since,
        reason,
        eligible,
        signals,
    }
}

fn entry_signals(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    effective_lane: Option<&str>,
    ctx: VelvetContext,
    lex: &Lexicon,
    w: &Weights,
) -> VelvetSignals {
    let action = turn.any_action_token();

    let depth = action
        .as_deref()
        .map(|a| lex.depth_action.is_match(a))
        .unwrap_or(false)
        || lex.depth_text.is_match(&turn.text);

    let same_year = matches!(
        (turn.effective_year(), session.last_year),
        (Some(y), Some(last)) if y == last
    );
    let same_lane = matches!(
        (effective_lane, session.lane_token()),
        (Some(l), Some(last)) if l == last
    );
    let same_action = matches!(
        (action.as_deref(), session.last_action_token()),
        (Some(a), Some(last)) if a == last
    );
    let repeat_topic = same_year && (same_lane || same_action);

    let accepted = lex.accept_text.is_match(&turn.text)
        || action
            .as_deref()
            .map(|a| lex.accept_action.is_match(a))
            .unwrap_or(false);

    VelvetSignals {
        depth,
        repeat_topic,
        accepted,
        confident: ctx.nyx_confidence >= w.velvet_nyx_confidence,
        desire: matches!(ctx.desire, LatentDesire::Comfort | LatentDesire::Curiosity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(intent: Intent, nyx: f64, desire: LatentDesire) -> VelvetContext {
        VelvetContext {
            intent,
            nyx_confidence: nyx,
            desire,
            now_ms: 50_000,
        }
    }

    fn step(turn: &NormalizedTurn, session: &SessionSnapshot, c: VelvetContext) -> VelvetOutcome {
        step_velvet(turn, session, c, &Lexicon::standard(), &Weights::default())
    }

    #[test]
    fn test_entry_needs_two_signals() {
        let session = SessionSnapshot {
            lane: Some("music".into()),
            ..SessionSnapshot::default()
        };
        // one signal: desire
        let turn = NormalizedTurn::text("hmm").with_lane("music");
        let out = step(&turn, &session, ctx(Intent::Clarify, 0.5, LatentDesire::Curiosity));
        assert_eq!(out.signals.votes(), 1);
        assert!(!out.active);
        assert_eq!(out.reason, None);

        // two signals: desire + depth
        let turn = NormalizedTurn::text("tell me more").with_lane("music");
        let out = step(&turn, &session, ctx(Intent::Clarify, 0.5, LatentDesire::Curiosity));
        assert!(out.active);
        assert_eq!(out.reason, Some(VelvetReason::Entry));
        assert_eq!(out.since, Some(50_000));
    }

    #[test]
    fn test_ineligible_lane_never_enters() {
        let turn = NormalizedTurn::text("yes, tell me more").with_lane("cyber");
        let out = step(
            &turn,
            &SessionSnapshot::default(),
            ctx(Intent::Clarify, 0.9, LatentDesire::Curiosity),
        );
        assert!(out.signals.votes() >= 2);
        assert!(!out.eligible);
        assert!(!out.active);
    }

    #[test]
    fn test_hold_preserves_since() {
        let session = SessionSnapshot {
            lane: Some("music".into()),
            velvet_mode: true,
            velvet_since: Some(10_000),
            ..SessionSnapshot::default()
        };
        let turn = NormalizedTurn::text("and then?").with_lane("music");
        let out = step(&turn, &session, ctx(Intent::Clarify, 0.2, LatentDesire::Authority));
        assert!(out.active);
        assert_eq!(out.reason, Some(VelvetReason::Hold));
        assert_eq!(out.since, Some(10_000));
    }

    #[test]
    fn test_stabilize_exit() {
        let session = SessionSnapshot {
            lane: Some("music".into()),
            velvet_mode: true,
            velvet_since: Some(10_000),
            ..SessionSnapshot::default()
        };
        let out = step(
            &NormalizedTurn::text("too much"),
            &session,
            ctx(Intent::Stabilize, 0.3, LatentDesire::Comfort),
        );
        assert!(!out.active);
        assert_eq!(out.reason, Some(VelvetReason::StabilizeExit));
        assert_eq!(out.since, None);
    }

    #[test]
    fn test_lane_shift_exit() {
        let session = SessionSnapshot {
            lane: Some("music".into()),
            velvet_mode: true,
            velvet_since: Some(10_000),
            ..SessionSnapshot::default()
        };
        let turn = NormalizedTurn::text("tell me more").with_lane("story");
        let out = step(&turn, &session, ctx(Intent::Clarify, 0.9, LatentDesire::Comfort));
        assert!(!out.active);
        assert_eq!(out.reason, Some(VelvetReason::LaneShiftExit));

        let out = step(&turn, &session, ctx(Intent::Stabilize, 0.3, LatentDesire::Comfort));
        assert_eq!(out.reason, Some(VelvetReason::LaneShiftExit));
        assert_eq!(out.since, None);
    }

    #[test]
    fn test_active_on_ineligible_lane_carries() {
        let session = SessionSnapshot {
            lane: Some("general".into()),
            velvet_mode: true,
            velvet_since: Some(7),
            ..SessionSnapshot::default()
        };
        let out = step(
            &NormalizedTurn::text("ok"),
            &session,
            ctx(Intent::Clarify, 0.5, LatentDesire::Authority),
        );
        assert!(out.active);
        assert_eq!(out.reason, Some(VelvetReason::Carry));
        assert_eq!(out.since, Some(7));
    }

    #[test]
    fn test_repeat_topic_signal() {
        let session = SessionSnapshot {
            lane: Some("music".into()),
            last_year: Some(1988),
            ..SessionSnapshot::default()
        };
        let turn = NormalizedTurn::action("top10", Some(1988)).with_lane("music");
        let out = step(&turn, &session, ctx(Intent::Advance, 0.8, LatentDesire::Authority));
        assert!(out.signals.repeat_topic);
        assert!(out.signals.confident);
        assert!(out.active);
    }
}
