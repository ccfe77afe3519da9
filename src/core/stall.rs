//! Stall detection and the anti-livelock safeguard
//!
//! A session is stalled after `stall_turn_limit` turns without an ADVANCE,
//! or once `stall_window_ms` has elapsed since the last one. A stalled
//! directive-mode session that is not advancing is pushed to CLARIFY.

use super::weights::Weights;
use crate::types::{Intent, Mode, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallDecision {
    pub stalled: bool,
    pub intent: Intent,
    /// Safeguard rewrote the intent
    pub forced: bool,
}

pub fn is_stalled(session: &SessionSnapshot, now_ms: i64, w: &Weights) -> bool {
    let by_turns = session.turns_since_advance >= w.stall_turn_limit;
    let by_clock = session
        .last_advance_at
        .map(|at| now_ms.saturating_sub(at) > w.stall_window_ms)
        .unwrap_or(false);
    by_turns || by_clock
}

pub fn apply_stall(
    session: &SessionSnapshot,
    mode: Mode,
    intent: Intent,
    now_ms: i64,
    w: &Weights,
) -> StallDecision {
    let stalled = is_stalled(session, now_ms, w);
    let forced =
        stalled && mode.is_directive() && intent != Intent::Advance && intent != Intent::Clarify;
    StallDecision {
        stalled,
        intent: if forced { Intent::Clarify } else { intent },
        forced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(turns: u32, last_advance_at: Option<i64>) -> SessionSnapshot {
        SessionSnapshot {
            turns_since_advance: turns,
            last_advance_at,
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn test_turn_counter_stalls() {
        let w = Weights::default();
        assert!(!is_stalled(&session(1, None), 0, &w));
        assert!(is_stalled(&session(2, None), 0, &w));
        assert!(is_stalled(&session(9, None), 0, &w));
    }

    #[test]
    fn test_clock_stalls_strictly_after_window() {
        let w = Weights::default();
        let s = session(0, Some(1_000));
        assert!(!is_stalled(&s, 1_000 + 90_000, &w));
        assert!(is_stalled(&s, 1_000 + 90_001, &w));
    }

    #[test]
    fn test_missing_advance_time_never_stalls_by_clock() {
        assert!(!is_stalled(&session(0, None), i64::MAX, &Weights::default()));
    }

    #[test]
    fn test_safeguard_forces_clarify_in_directive_modes() {
        let w = Weights::default();
        let s = session(3, None);
        for mode in [Mode::Architect, Mode::Transitional] {
            let d = apply_stall(&s, mode, Intent::Stabilize, 0, &w);
            assert!(d.stalled);
            assert!(d.forced);
            assert_eq!(d.intent, Intent::Clarify);
        }
    }

    #[test]
    fn test_safeguard_leaves_user_mode_and_advance_alone() {
        let w = Weights::default();
        let s = session(3, None);
        let d = apply_stall(&s, Mode::User, Intent::Stabilize, 0, &w);
        assert_eq!(d.intent, Intent::Stabilize);
        assert!(!d.forced);

        let d = apply_stall(&s, Mode::Architect, Intent::Advance, 0, &w);
        assert_eq!(d.intent, Intent::Advance);
        assert!(!d.forced);
    }
}
