//! Per-call mediation options
//!
//! Overrides are applied after full computation. Malformed override values
//! are ignored in favour of the computed ones.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{as_bool, as_i64, as_string, field};
use super::{Budget, Dominance, Intent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediationOptions {
    /// Clock override in epoch milliseconds
    pub now_ms: Option<i64>,
    pub force_budget: Option<String>,
    pub force_dominance: Option<String>,
    pub force_intent: Option<String>,
    pub force_velvet: Option<bool>,
}

/// Which override took effect, for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Budget,
    Dominance,
    Intent,
    Velvet,
}

impl OverrideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Dominance => "dominance",
            Self::Intent => "intent",
            Self::Velvet => "velvet",
        }
    }

    /// Two-letter code used in the trace
    pub fn short(&self) -> &'static str {
        match self {
            Self::Budget => "bu",
            Self::Dominance => "dm",
            Self::Intent => "in",
            Self::Velvet => "vv",
        }
    }
}

impl MediationOptions {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: Some(now_ms),
            ..Self::default()
        }
    }

    /// Coerce an arbitrary JSON value into options. Never fails.
    pub fn from_value(value: &Value) -> Self {
        Self {
            now_ms: as_i64(field(value, &["nowMs", "now_ms"])).filter(|t| *t >= 0),
            force_budget: as_string(field(value, &["forceBudget", "force_budget"])),
            force_dominance: as_string(field(value, &["forceDominance", "force_dominance"])),
            force_intent: as_string(field(value, &["forceIntent", "force_intent"])),
            force_velvet: as_bool(field(value, &["forceVelvet", "force_velvet"])),
        }
    }

    pub fn budget(&self) -> Option<Budget> {
        self.force_budget.as_deref().and_then(Budget::parse)
    }

    pub fn dominance(&self) -> Option<Dominance> {
        self.force_dominance.as_deref().and_then(Dominance::parse)
    }

    pub fn intent(&self) -> Option<Intent> {
        self.force_intent.as_deref().and_then(Intent::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_overrides_are_ignored() {
        let opts = MediationOptions::from_value(&json!({
            "forceBudget": "enormous",
            "forceIntent": "advance",
            "forceVelvet": "maybe",
            "nowMs": -5
        }));
        assert_eq!(opts.budget(), None);
        assert_eq!(opts.intent(), Some(Intent::Advance));
        assert_eq!(opts.force_velvet, None);
        assert_eq!(opts.now_ms, None);
    }
}
