//! Marion: conversation mediation and domain routing core
//!
//! Host → NormalizedTurn + SessionSnapshot → mediate → Cognition
//!      → route_domain → DomainRouting
//!
//! Everything in `core` is pure and synchronous. The host owns session storage
//! and persists the `SessionUpdate` carried on each Cognition.

pub mod core;
pub mod error;
pub mod types;

pub use crate::core::{mediate, mediate_value, route_domain, route_value, DomainRouter, Mediator};
pub use crate::error::MediationError;

// =============================================================================
// STALL DETECTION
// =============================================================================

/// Turns without an ADVANCE before the session counts as stalled
pub const STALL_TURN_LIMIT: u32 = 2;

/// Milliseconds since the last ADVANCE before the session counts as stalled
pub const STALL_WINDOW_MS: i64 = 90_000;

// =============================================================================
// MODE SCORING
// =============================================================================

/// Directive / planning verbs
pub const MODE_WEIGHT_DIRECTIVE: u32 = 2;
/// Hard-constraint language (must, exactly, no more than)
pub const MODE_WEIGHT_CONSTRAINT: u32 = 2;
/// Enumerations and numbered lists
pub const MODE_WEIGHT_ENUMERATION: u32 = 1;
/// Technical nouns
pub const MODE_WEIGHT_TECHNICAL: u32 = 1;
/// Uncertainty phrasing
pub const MODE_WEIGHT_UNCERTAINTY: u32 = 2;
/// Emotional language
pub const MODE_WEIGHT_EMOTION: u32 = 2;
/// Bonus applied when both families score
pub const MODE_TRANSITIONAL_BONUS: u32 = 3;
/// Margin one family needs over the other to win outright
pub const MODE_MARGIN: u32 = 2;

// =============================================================================
// CONFIDENCE
// =============================================================================

pub const CONF_USER_BASE: f64 = 0.5;
pub const CONF_USER_ACTION: f64 = 0.15;
pub const CONF_USER_SILENT_ACTIONABLE: f64 = 0.05;
pub const CONF_USER_UNCERTAIN: f64 = -0.25;
pub const CONF_USER_RHETORICAL: f64 = -0.10;

pub const CONF_NYX_BASE: f64 = 0.55;
pub const CONF_NYX_ADVANCE: f64 = 0.15;
pub const CONF_NYX_STABILIZE: f64 = -0.25;
pub const CONF_NYX_REPEAT: f64 = 0.10;
/// Applied positively in architect mode, negatively in user mode
pub const CONF_NYX_MODE: f64 = 0.05;

// =============================================================================
// IMMERSION (VELVET)
// =============================================================================

/// Independent signals required to enter velvet
pub const VELVET_ENTRY_VOTES: usize = 2;

/// Nyx confidence that counts as an entry signal
pub const VELVET_NYX_CONFIDENCE: f64 = 0.6;

// =============================================================================
// NOVELTY
// =============================================================================

pub const NOVELTY_SHORT_TEXT: f64 = 0.18;
pub const NOVELTY_MIXED_DOMAIN: f64 = 0.22;
pub const NOVELTY_AMBIGUOUS_REFERENCE: f64 = 0.18;
pub const NOVELTY_SILENT_PAYLOAD: f64 = 0.25;
pub const NOVELTY_NO_ANCHOR: f64 = 0.25;
pub const NOVELTY_STALL_PRESSURE: f64 = 0.15;
pub const NOVELTY_PRECISION_GAP: f64 = 0.10;

/// Word count at or below which text counts as very short
pub const NOVELTY_SHORT_WORDS: usize = 3;

/// Maximum novelty reason tags carried on a Cognition
pub const NOVELTY_MAX_REASONS: usize = 6;

/// Novelty at which a discovery question may be surfaced
pub const DISCOVERY_THRESHOLD: f64 = 0.45;

// =============================================================================
// TRACE
// =============================================================================

/// Hard cap on trace length (bytes, ASCII only)
pub const TRACE_MAX_LEN: usize = 160;

/// Telemetry event name and schema version
pub const TELEMETRY_EVENT: &str = "marion.mediation";
pub const TELEMETRY_VERSION: u32 = 1;

// =============================================================================
// DOMAIN ROUTING
// =============================================================================

pub const ROUTE_LANE_WEIGHT: f64 = 2.4;
pub const ROUTE_ACTION_STRONG: f64 = 1.8;
pub const ROUTE_ACTION_WEAK: f64 = 1.1;
pub const ROUTE_KEYWORD_FAMILY: f64 = 2.0;
pub const ROUTE_LANE_STICKINESS: f64 = 0.2;

/// Score a single domain can be expected to reach; used for `ScoreCard::strength`
pub const ROUTE_SCORE_CEILING: f64 = 6.0;

/// Ceiling applied to cyber/fin/law/ai under high risk
pub const ROUTE_HIGH_RISK_CAP: f64 = 1.0;

pub const ROUTE_DEFAULT_MAX_SECONDARY: usize = 2;
pub const ROUTE_DEFAULT_MIN_SECONDARY_SCORE: f64 = 1.6;

/// Upper bound on routing signal tags
pub const ROUTE_MAX_SIGNALS: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
