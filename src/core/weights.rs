//! Immutable weight tables injected into the mediator and router
//!
//! Defaults come from the crate-root constants. Every field is optional in
//! JSON so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::MediationError;
use crate::{
    CONF_NYX_ADVANCE, CONF_NYX_BASE, CONF_NYX_MODE, CONF_NYX_REPEAT, CONF_NYX_STABILIZE,
    CONF_USER_ACTION, CONF_USER_BASE, CONF_USER_RHETORICAL, CONF_USER_SILENT_ACTIONABLE,
    CONF_USER_UNCERTAIN, DISCOVERY_THRESHOLD, MODE_MARGIN, MODE_TRANSITIONAL_BONUS,
    MODE_WEIGHT_CONSTRAINT, MODE_WEIGHT_DIRECTIVE, MODE_WEIGHT_EMOTION, MODE_WEIGHT_ENUMERATION,
    MODE_WEIGHT_TECHNICAL, MODE_WEIGHT_UNCERTAINTY, NOVELTY_AMBIGUOUS_REFERENCE,
    NOVELTY_MIXED_DOMAIN, NOVELTY_NO_ANCHOR, NOVELTY_PRECISION_GAP, NOVELTY_SHORT_TEXT,
    NOVELTY_SHORT_WORDS, NOVELTY_SILENT_PAYLOAD, NOVELTY_STALL_PRESSURE, ROUTE_ACTION_STRONG,
    ROUTE_ACTION_WEAK, ROUTE_HIGH_RISK_CAP, ROUTE_KEYWORD_FAMILY, ROUTE_LANE_STICKINESS,
    ROUTE_LANE_WEIGHT, ROUTE_SCORE_CEILING, STALL_TURN_LIMIT, STALL_WINDOW_MS, VELVET_ENTRY_VOTES,
    VELVET_NYX_CONFIDENCE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weights {
    // Mode
    pub mode_directive: u32,
    pub mode_constraint: u32,
    pub mode_enumeration: u32,
    pub mode_technical: u32,
    pub mode_uncertainty: u32,
    pub mode_emotion: u32,
    pub mode_transitional_bonus: u32,
    pub mode_margin: u32,

    // Stall
    pub stall_turn_limit: u32,
    pub stall_window_ms: i64,

    // Confidence
    pub conf_user_base: f64,
    pub conf_user_action: f64,
    pub conf_user_silent_actionable: f64,
    pub conf_user_uncertain: f64,
    pub conf_user_rhetorical: f64,
    pub conf_nyx_base: f64,
    pub conf_nyx_advance: f64,
    pub conf_nyx_stabilize: f64,
    pub conf_nyx_repeat: f64,
    pub conf_nyx_mode: f64,

    // Immersion
    pub velvet_entry_votes: usize,
    pub velvet_nyx_confidence: f64,

    // Novelty
    pub novelty_short_text: f64,
    pub novelty_mixed_domain: f64,
    pub novelty_ambiguous_reference: f64,
    pub novelty_silent_payload: f64,
    pub novelty_no_anchor: f64,
    pub novelty_stall_pressure: f64,
    pub novelty_precision_gap: f64,
    pub novelty_short_words: usize,
    pub discovery_threshold: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            mode_directive: MODE_WEIGHT_DIRECTIVE,
            mode_constraint: MODE_WEIGHT_CONSTRAINT,
            mode_enumeration: MODE_WEIGHT_ENUMERATION,
            mode_technical: MODE_WEIGHT_TECHNICAL,
            mode_uncertainty: MODE_WEIGHT_UNCERTAINTY,
            mode_emotion: MODE_WEIGHT_EMOTION,
            mode_transitional_bonus: MODE_TRANSITIONAL_BONUS,
            mode_margin: MODE_MARGIN,
            stall_turn_limit: STALL_TURN_LIMIT,
            stall_window_ms: STALL_WINDOW_MS,
            conf_user_base: CONF_USER_BASE,
            conf_user_action: CONF_USER_ACTION,
            conf_user_silent_actionable: CONF_USER_SILENT_ACTIONABLE,
            conf_user_uncertain: CONF_USER_UNCERTAIN,
            conf_user_rhetorical: CONF_USER_RHETORICAL,
            conf_nyx_base: CONF_NYX_BASE,
            conf_nyx_advance: CONF_NYX_ADVANCE,
            conf_nyx_stabilize: CONF_NYX_STABILIZE,
            conf_nyx_repeat: CONF_NYX_REPEAT,
            conf_nyx_mode: CONF_NYX_MODE,
            velvet_entry_votes: VELVET_ENTRY_VOTES,
            velvet_nyx_confidence: VELVET_NYX_CONFIDENCE,
            novelty_short_text: NOVELTY_SHORT_TEXT,
            novelty_mixed_domain: NOVELTY_MIXED_DOMAIN,
            novelty_ambiguous_reference: NOVELTY_AMBIGUOUS_REFERENCE,
            novelty_silent_payload: NOVELTY_SILENT_PAYLOAD,
            novelty_no_anchor: NOVELTY_NO_ANCHOR,
            novelty_stall_pressure: NOVELTY_STALL_PRESSURE,
            novelty_precision_gap: NOVELTY_PRECISION_GAP,
            novelty_short_words: NOVELTY_SHORT_WORDS,
            discovery_threshold: DISCOVERY_THRESHOLD,
        }
    }
}

impl Weights {
    /// Reject tables that would make scoring meaningless
    pub fn validate(&self) -> Result<(), MediationError> {
        let floats = [
            self.conf_user_base,
            self.conf_user_action,
            self.conf_user_silent_actionable,
            self.conf_user_uncertain,
            self.conf_user_rhetorical,
            self.conf_nyx_base,
            self.conf_nyx_advance,
            self.conf_nyx_stabilize,
            self.conf_nyx_repeat,
            self.conf_nyx_mode,
            self.velvet_nyx_confidence,
            self.discovery_threshold,
        ];
        if floats.iter().any(|f| !f.is_finite()) {
            return Err(MediationError::InvalidConfig { reason: "non-finite weight" });
        }
        let novelty = [
            self.novelty_short_text,
            self.novelty_mixed_domain,
            self.novelty_ambiguous_reference,
            self.novelty_silent_payload,
            self.novelty_no_anchor,
            self.novelty_stall_pressure,
            self.novelty_precision_gap,
        ];
        // Negative novelty weights would break monotonicity
        if novelty.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(MediationError::InvalidConfig { reason: "novelty weights must be >= 0" });
        }
        if self.velvet_entry_votes == 0 || self.velvet_entry_votes > 5 {
            return Err(MediationError::InvalidConfig { reason: "velvet votes must be 1..=5" });
        }
        if self.stall_window_ms <= 0 {
            return Err(MediationError::InvalidConfig { reason: "stall window must be positive" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterWeights {
    pub lane: f64,
    pub action_strong: f64,
    pub action_weak: f64,
    pub keyword_family: f64,
    pub lane_stickiness: f64,

    /// Cross-domain coupling bonuses
    pub couple_cyber_law: f64,
    pub couple_ai_strategy: f64,
    pub couple_fin_law: f64,
    pub couple_ai_cyber: f64,
    pub couple_psychology_english: f64,

    pub stabilize_psychology: f64,
    pub stabilize_english: f64,
    pub stabilize_core: f64,
    pub stabilize_suppress: f64,
    pub architect_strategy: f64,
    pub transitional_strategy: f64,

    pub high_risk_psychology: f64,
    pub high_risk_english: f64,
    pub high_risk_core: f64,
    pub high_risk_cap: f64,
    pub medium_risk_cyber: f64,

    pub score_ceiling: f64,
}

impl Default for RouterWeights {
    fn default() -> Self {
        Self {
            lane: ROUTE_LANE_WEIGHT,
            action_strong: ROUTE_ACTION_STRONG,
            action_weak: ROUTE_ACTION_WEAK,
            keyword_family: ROUTE_KEYWORD_FAMILY,
            lane_stickiness: ROUTE_LANE_STICKINESS,
            couple_cyber_law: 0.6,
            couple_ai_strategy: 0.5,
            couple_fin_law: 0.5,
            couple_ai_cyber: 0.5,
            couple_psychology_english: 0.3,
            stabilize_psychology: 1.5,
            stabilize_english: 0.6,
            stabilize_core: 0.8,
            stabilize_suppress: 0.8,
            architect_strategy: 0.6,
            transitional_strategy: 0.4,
            high_risk_psychology: 2.5,
            high_risk_english: 1.2,
            high_risk_core: 1.5,
            high_risk_cap: ROUTE_HIGH_RISK_CAP,
            medium_risk_cyber: 0.4,
            score_ceiling: ROUTE_SCORE_CEILING,
        }
    }
}

impl RouterWeights {
    /// Router weights are only usable when finite and the ceiling is positive
    pub fn is_usable(&self) -> bool {
        let all = [
            self.lane,
            self.action_strong,
            self.action_weak,
            self.keyword_family,
            self.lane_stickiness,
            self.couple_cyber_law,
            self.couple_ai_strategy,
            self.couple_fin_law,
            self.couple_ai_cyber,
            self.couple_psychology_english,
            self.stabilize_psychology,
            self.stabilize_english,
            self.stabilize_core,
            self.stabilize_suppress,
            self.architect_strategy,
            self.transitional_strategy,
            self.high_risk_psychology,
            self.high_risk_english,
            self.high_risk_core,
            self.high_risk_cap,
            self.medium_risk_cyber,
            self.score_ceiling,
        ];
        all.iter().all(|f| f.is_finite()) && self.score_ceiling > 0.0
    }
}
