//! Trace and telemetry builder
//!
//! Layout (fixed order, pipe-delimited, ASCII only):
//! `v1|m=<mode>|i=<intent>|d=<dom>|b=<budget>|st=<0/1>|ac=<0/1>|te=<0/1>|g=<lines>|ms=<state>|rk=<risk>|ov=<a.b>|vv=<0/1>|vr=<reason>|ld=<desire>|cu=<pct>|cn=<pct>|nv=<pct>|dh=<0/1>|nr=<a.b>`
//!
//! Hard cap of 160 chars; longer traces end in `...`. Fixed-width fields and
//! the override list come first so only the novelty reasons can be cut.

use super::clock::rfc3339;
use crate::error::MediationError;
use crate::types::{
    Budget, Confidence, Dominance, ErrorCode, Intent, LatentDesire, MarionState, Mode,
    NoveltyReason, OverrideKind, RiskTier, Telemetry, VelvetReason,
};
use crate::{TELEMETRY_EVENT, TELEMETRY_VERSION, TRACE_MAX_LEN};

/// Trace string emitted by the fail-open path
pub const FAIL_OPEN_TRACE: &str = "fail_open";

const ELLIPSIS: &str = "...";

/// Scalars shared by the trace and telemetry
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFields {
    pub mode: Mode,
    pub intent: Intent,
    pub dominance: Dominance,
    pub budget: Budget,
    pub stalled: bool,
    pub actionable: bool,
    pub text_empty: bool,
    pub grounding_max_lines: u8,
    pub latent_desire: LatentDesire,
    pub confidence: Confidence,
    pub velvet: bool,
    pub velvet_reason: Option<VelvetReason>,
    pub novelty_score: f64,
    pub novelty_reasons: Vec<NoveltyReason>,
    pub discovery: bool,
    pub marion_state: MarionState,
    pub risk_tier: RiskTier,
    pub overrides: Vec<OverrideKind>,
}

pub fn build_trace(f: &TraceFields) -> Result<String, MediationError> {
    let nr = f
        .novelty_reasons
        .iter()
        .map(|r| r.short())
        .collect::<Vec<_>>()
        .join(".");
    let ov = f
        .overrides
        .iter()
        .map(|o| o.short())
        .collect::<Vec<_>>()
        .join(".");

    let raw = format!(
        "v{}|m={}|i={}|d={}|b={}|st={}|ac={}|te={}|g={}|ms={}|rk={}|ov={}|vv={}|vr={}|ld={}|cu={}|cn={}|nv={}|dh={}|nr={}",
        TELEMETRY_VERSION,
        f.mode.as_str(),
        f.intent.as_str(),
        f.dominance.as_str(),
        f.budget.as_str(),
        bit(f.stalled),
        bit(f.actionable),
        bit(f.text_empty),
        f.grounding_max_lines,
        f.marion_state.as_str(),
        f.risk_tier.as_str(),
        if ov.is_empty() { "none" } else { ov.as_str() },
        bit(f.velvet),
        f.velvet_reason.map(|r| r.code()).unwrap_or("none"),
        f.latent_desire.as_str(),
        pct(f.confidence.user),
        pct(f.confidence.nyx),
        pct(f.novelty_score),
        bit(f.discovery),
        if nr.is_empty() { "none" } else { nr.as_str() },
    );

    if !is_trace_safe(&raw) {
        return Err(MediationError::TraceViolation);
    }
    Ok(truncate(raw))
}

/// Only the characters enum tags, integers and separators can produce
pub fn is_trace_safe(trace: &str) -> bool {
    trace
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'|' | b'=' | b'.' | b'_'))
}

fn truncate(mut trace: String) -> String {
    if trace.len() > TRACE_MAX_LEN {
        // ASCII only, so byte offsets are char boundaries
        trace.truncate(TRACE_MAX_LEN - ELLIPSIS.len());
        trace.push_str(ELLIPSIS);
    }
    trace
}

/// FNV-1a 32-bit, lowercase hex
pub fn trace_hash(trace: &str) -> String {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    let hash = trace
        .bytes()
        .fold(OFFSET, |h, b| (h ^ b as u32).wrapping_mul(PRIME));
    format!("{:08x}", hash)
}

pub fn build_telemetry(
    f: &TraceFields,
    ts_ms: i64,
    hash: &str,
    error_code: Option<ErrorCode>,
) -> Telemetry {
    Telemetry {
        event: TELEMETRY_EVENT.to_string(),
        version: TELEMETRY_VERSION,
        ts_ms,
        timestamp: rfc3339(ts_ms),
        mode: f.mode,
        intent: f.intent,
        dominance: f.dominance,
        budget: f.budget,
        stalled: f.stalled,
        actionable: f.actionable,
        text_empty: f.text_empty,
        grounding_max_lines: f.grounding_max_lines,
        latent_desire: f.latent_desire,
        confidence_user_pct: pct(f.confidence.user),
        confidence_nyx_pct: pct(f.confidence.nyx),
        velvet: f.velvet,
        velvet_reason: f.velvet_reason,
        novelty_pct: pct(f.novelty_score),
        novelty_reasons: f.novelty_reasons.clone(),
        discovery: f.discovery,
        marion_state: f.marion_state,
        risk_tier: f.risk_tier,
        overrides: f.overrides.clone(),
        fail_open: error_code.is_some(),
        error_code,
        trace_hash: hash.to_string(),
    }
}

fn bit(b: bool) -> u8 {
    u8::from(b)
}

/// Whole percent of a [0, 1] score; NaN maps to 0
pub(crate) fn pct(x: f64) -> u8 {
    if x.is_nan() {
        return 0;
    }
    (x.clamp(0.0, 1.0) * 100.0).round() as u8
}
