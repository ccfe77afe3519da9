//! Cognition: the per-turn mediation record
//!
//! Only enums, bounded numbers, booleans and hashes live here. No field ever
//! carries the user's text.

use serde::{Deserialize, Serialize};

use super::{ErrorCode, NoveltyReason, OverrideKind, SessionUpdate, VelvetReason};

/// Conversational posture of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Directive, planning, constraint-heavy
    Architect,
    /// Uncertain or emotional
    User,
    /// Both at once
    Transitional,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Architect => "architect",
            Mode::User => "user",
            Mode::Transitional => "transitional",
        }
    }

    /// Parse a client override; anything not exactly one of the three names is rejected
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "architect" => Some(Mode::Architect),
            "user" => Some(Mode::User),
            "transitional" => Some(Mode::Transitional),
            _ => None,
        }
    }

    /// Architect and transitional both lean directive
    pub fn is_directive(&self) -> bool {
        matches!(self, Mode::Architect | Mode::Transitional)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Advance,
    Clarify,
    Stabilize,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Advance => "ADVANCE",
            Intent::Clarify => "CLARIFY",
            Intent::Stabilize => "STABILIZE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADVANCE" => Some(Intent::Advance),
            "CLARIFY" => Some(Intent::Clarify),
            "STABILIZE" => Some(Intent::Stabilize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dominance {
    Firm,
    Neutral,
    Soft,
}

impl Dominance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dominance::Firm => "firm",
            Dominance::Neutral => "neutral",
            Dominance::Soft => "soft",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firm" => Some(Dominance::Firm),
            "neutral" => Some(Dominance::Neutral),
            "soft" => Some(Dominance::Soft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Short,
    Medium,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Short => "short",
            Budget::Medium => "medium",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Budget::Short),
            "medium" => Some(Budget::Medium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatentDesire {
    Authority,
    Comfort,
    Curiosity,
    Validation,
    Mastery,
}

impl LatentDesire {
    pub fn as_str(&self) -> &'static str {
        match self {
            LatentDesire::Authority => "authority",
            LatentDesire::Comfort => "comfort",
            LatentDesire::Curiosity => "curiosity",
            LatentDesire::Validation => "validation",
            LatentDesire::Mastery => "mastery",
        }
    }
}

/// Conversational move the responder should make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarionState {
    Seek,
    Deliver,
    Stabilize,
    Bridge,
}

impl MarionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarionState::Seek => "SEEK",
            MarionState::Deliver => "DELIVER",
            MarionState::Stabilize => "STABILIZE",
            MarionState::Bridge => "BRIDGE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskTier::Low),
            "medium" => Some(RiskTier::Medium),
            "high" => Some(RiskTier::High),
            _ => None,
        }
    }
}

/// How an exploratory question should be phrased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintStyle {
    None,
    /// Offer two or three concrete options
    Options,
    /// One soft open question
    GentleProbe,
}

impl HintStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintStyle::None => "none",
            HintStyle::Options => "options",
            HintStyle::GentleProbe => "gentle_probe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// How sure the user seems, 0.0-1.0
    pub user: f64,
    /// How sure the assistant should sound, 0.0-1.0
    pub nyx: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryHint {
    pub enabled: bool,
    pub style: HintStyle,
    pub reason_codes: Vec<NoveltyReason>,
}

impl DiscoveryHint {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            style: HintStyle::None,
            reason_codes: Vec::new(),
        }
    }
}

/// Structured event mirroring the trace scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub event: String,
    pub version: u32,
    pub ts_ms: i64,
    /// RFC 3339 rendering of `ts_ms`
    pub timestamp: String,
    pub mode: Mode,
    pub intent: Intent,
    pub dominance: Dominance,
    pub budget: Budget,
    pub stalled: bool,
    pub actionable: bool,
    pub text_empty: bool,
    pub grounding_max_lines: u8,
    pub latent_desire: LatentDesire,
    /// Confidence in whole percent
    pub confidence_user_pct: u8,
    pub confidence_nyx_pct: u8,
    pub velvet: bool,
    pub velvet_reason: Option<VelvetReason>,
    pub novelty_pct: u8,
    pub novelty_reasons: Vec<NoveltyReason>,
    pub discovery: bool,
    pub marion_state: MarionState,
    pub risk_tier: RiskTier,
    pub overrides: Vec<OverrideKind>,
    pub fail_open: bool,
    pub error_code: Option<ErrorCode>,
    pub trace_hash: String,
}

/// Output of one mediation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cognition {
    pub mode: Mode,
    pub intent: Intent,
    pub dominance: Dominance,
    pub budget: Budget,
    pub stalled: bool,
    pub actionable: bool,
    pub text_empty: bool,
    /// 0..=3
    pub grounding_max_lines: u8,
    pub latent_desire: LatentDesire,
    pub confidence: Confidence,
    pub velvet: bool,
    pub velvet_since: Option<i64>,
    pub velvet_reason: Option<VelvetReason>,
    pub novelty_score: f64,
    pub novelty_reasons: Vec<NoveltyReason>,
    pub discovery_hint: DiscoveryHint,
    pub marion_state: MarionState,
    #[serde(default)]
    pub risk_tier: RiskTier,
    pub trace: String,
    pub trace_hash: String,
    pub telemetry: Telemetry,
    /// Absent on fail-open: the host keeps its stored state
    pub session_update: Option<SessionUpdate>,
    pub error_code: Option<ErrorCode>,
}

impl Cognition {
    pub fn is_fail_open(&self) -> bool {
        self.error_code.is_some()
    }
}
