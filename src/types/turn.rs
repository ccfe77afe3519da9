//! Inbound turn as produced by the upstream normalizer
//!
//! An explicit action or actionable payload always outranks anything derived
//! from `text`; the accessors here expose those anchors in sanitized form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{
    as_bool, as_string, as_text, as_token, as_year, field, sanitize_token, valid_year,
};

/// Structural facts about the turn's payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TurnSignals {
    pub has_payload: bool,
    pub text_empty: bool,
    pub payload_actionable: bool,
    pub payload_action: Option<String>,
    pub payload_year: Option<i32>,
}

/// One user input plus its structured payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedTurn {
    pub text: String,
    pub action: Option<String>,
    pub lane: Option<String>,
    pub year: Option<i32>,
    /// Client-supplied mode override; honoured only when well-formed
    pub mac_mode: Option<String>,
    pub turn_signals: TurnSignals,
}

impl NormalizedTurn {
    /// Plain text turn with no payload
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Explicit action turn (chips, buttons)
    pub fn action(action: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            action: Some(action.into()),
            year,
            ..Self::default()
        }
    }

    pub fn with_lane(mut self, lane: impl Into<String>) -> Self {
        self.lane = Some(lane.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Coerce an arbitrary JSON value into a turn. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let signals = field(value, &["turnSignals", "turn_signals"])
            .map(TurnSignals::from_value)
            .unwrap_or_default();
        Self {
            text: as_string(field(value, &["text"])).unwrap_or_default(),
            action: as_text(field(value, &["action"])),
            lane: as_token(field(value, &["lane"])),
            year: as_year(field(value, &["year"])),
            mac_mode: as_token(field(value, &["macMode", "mac_mode", "mode"])),
            turn_signals: signals,
        }
    }

    /// An explicit action was selected, whatever its shape
    pub fn has_action(&self) -> bool {
        non_blank(self.action.as_deref())
    }

    pub fn has_payload_action(&self) -> bool {
        non_blank(self.turn_signals.payload_action.as_deref())
    }

    /// Explicit action, sanitized
    pub fn action_token(&self) -> Option<String> {
        self.action.as_deref().and_then(sanitize_token)
    }

    /// Payload action, sanitized
    pub fn payload_action_token(&self) -> Option<String> {
        self.turn_signals
            .payload_action
            .as_deref()
            .and_then(sanitize_token)
    }

    /// Explicit action, falling back to the payload's action
    pub fn any_action_token(&self) -> Option<String> {
        self.action_token().or_else(|| self.payload_action_token())
    }

    pub fn lane_token(&self) -> Option<String> {
        self.lane.as_deref().and_then(sanitize_token)
    }

    /// Turn year, falling back to the payload's year
    pub fn effective_year(&self) -> Option<i32> {
        self.year
            .and_then(|y| valid_year(y as i64))
            .or_else(|| self.turn_signals.payload_year.and_then(|y| valid_year(y as i64)))
    }

    pub fn is_text_empty(&self) -> bool {
        self.turn_signals.text_empty || self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl TurnSignals {
    pub fn from_value(value: &Value) -> Self {
        Self {
            has_payload: as_bool(field(value, &["hasPayload", "has_payload"])).unwrap_or(false),
            text_empty: as_bool(field(value, &["textEmpty", "text_empty"])).unwrap_or(false),
            payload_actionable: as_bool(field(value, &["payloadActionable", "payload_actionable"]))
                .unwrap_or(false),
            payload_action: as_text(field(value, &["payloadAction", "payload_action"])),
            payload_year: as_year(field(value, &["payloadYear", "payload_year"])),
        }
    }
}
