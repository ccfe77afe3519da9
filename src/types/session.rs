//! Session state owned by the host
//!
//! Mediation reads a `SessionSnapshot` and proposes a `SessionUpdate`; it
//! never writes to the snapshot itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{as_bool, as_i64, as_token, as_u32, as_year, field, sanitize_token};
use super::Mode;

/// Prior turn state, read-only during mediation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    /// Last resolved mode, stored for the host; not read by mediation
    pub mac_mode: Option<String>,
    pub lane: Option<String>,
    pub last_action: Option<String>,
    pub last_year: Option<i32>,
    pub turn_count: u32,
    pub turns_since_advance: u32,
    pub last_advance_at: Option<i64>,
    pub velvet_mode: bool,
    pub velvet_since: Option<i64>,
}

/// Values the host should persist after a successful mediation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub mac_mode: Mode,
    pub lane: Option<String>,
    pub last_action: Option<String>,
    pub last_year: Option<i32>,
    pub turn_count: u32,
    pub turns_since_advance: u32,
    pub last_advance_at: Option<i64>,
    pub velvet_mode: bool,
    pub velvet_since: Option<i64>,
}

impl SessionSnapshot {
    /// Coerce an arbitrary JSON value into a snapshot. Never fails.
    pub fn from_value(value: &Value) -> Self {
        Self {
            mac_mode: as_token(field(value, &["macMode", "mac_mode"])),
            lane: as_token(field(value, &["lane"])),
            last_action: as_token(field(value, &["lastAction", "last_action"])),
            last_year: as_year(field(value, &["lastYear", "last_year"])),
            turn_count: as_u32(field(value, &["turnCount", "turn_count"])).unwrap_or(0),
            turns_since_advance: as_u32(field(value, &["turnsSinceAdvance", "turns_since_advance"]))
                .unwrap_or(0),
            last_advance_at: as_i64(field(value, &["lastAdvanceAt", "last_advance_at"]))
                .filter(|t| *t > 0),
            velvet_mode: as_bool(field(value, &["velvetMode", "velvet_mode"])).unwrap_or(false),
            velvet_since: as_i64(field(value, &["velvetSince", "velvet_since"])).filter(|t| *t > 0),
        }
    }

    pub fn lane_token(&self) -> Option<String> {
        self.lane.as_deref().and_then(sanitize_token)
    }

    pub fn last_action_token(&self) -> Option<String> {
        self.last_action.as_deref().and_then(sanitize_token)
    }

    /// Fold a proposal into this stored copy (host side)
    pub fn apply(&mut self, update: &SessionUpdate) {
        self.mac_mode = Some(update.mac_mode.as_str().to_string());
        self.lane = update.lane.clone();
        self.last_action = update.last_action.clone();
        self.last_year = update.last_year;
        self.turn_count = update.turn_count;
        self.turns_since_advance = update.turns_since_advance;
        self.last_advance_at = update.last_advance_at;
        self.velvet_mode = update.velvet_mode;
        self.velvet_since = update.velvet_since;
    }
}
