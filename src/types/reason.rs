//! Reason codes carried on a Cognition
//!
//! Every tag here is an enum so traces and telemetry never carry user text.

use serde::{Deserialize, Serialize};

/// Why the novelty score went up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyReason {
    /// Very short text
    ShortText,
    /// Conjunction joining two topics
    MixedDomain,
    /// Pronoun with no referent plus a question
    AmbiguousReference,
    /// Payload present, text empty, nothing actionable
    SilentPayload,
    /// No action, year or actionable payload
    NoAnchor,
    /// Stalled and not advancing
    StallPressure,
    /// Architect posture without a precise ask
    PrecisionGap,
}

impl NoveltyReason {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::MixedDomain => "mixed_domain",
            Self::AmbiguousReference => "ambiguous_reference",
            Self::SilentPayload => "silent_payload",
            Self::NoAnchor => "no_anchor",
            Self::StallPressure => "stall_pressure",
            Self::PrecisionGap => "precision_gap",
        }
    }

    /// Two-letter form used in the trace
    pub fn short(&self) -> &'static str {
        match self {
            Self::ShortText => "st",
            Self::MixedDomain => "md",
            Self::AmbiguousReference => "ar",
            Self::SilentPayload => "sp",
            Self::NoAnchor => "na",
            Self::StallPressure => "sl",
            Self::PrecisionGap => "pg",
        }
    }
}

impl std::fmt::Display for NoveltyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Why the immersion flag has its current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelvetReason {
    /// INACTIVE → ACTIVE on enough independent signals
    Entry,
    /// ACTIVE held
    Hold,
    /// ACTIVE → INACTIVE on a STABILIZE turn
    StabilizeExit,
    /// ACTIVE → INACTIVE on a lane change
    LaneShiftExit,
    /// Lane not eligible; prior flag carried forward
    Carry,
    /// Set by a `forceVelvet` override
    Forced,
}

impl VelvetReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Hold => "hold",
            Self::StabilizeExit => "stabilize_exit",
            Self::LaneShiftExit => "lane_shift_exit",
            Self::Carry => "carry",
            Self::Forced => "forced",
        }
    }
}

impl std::fmt::Display for VelvetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Codes reported on a fail-open Cognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// NaN or infinity produced by a scoring stage
    M100_NON_FINITE_SCORE,
    /// Injected weights rejected
    M101_INVALID_CONFIG,
    /// Trace failed the text-free check
    M102_TRACE_VIOLATION,
    /// Panic caught at the boundary
    M199_INTERNAL_PANIC,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::M100_NON_FINITE_SCORE => "M100_NON_FINITE_SCORE",
            Self::M101_INVALID_CONFIG => "M101_INVALID_CONFIG",
            Self::M102_TRACE_VIOLATION => "M102_TRACE_VIOLATION",
            Self::M199_INTERNAL_PANIC => "M199_INTERNAL_PANIC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::M100_NON_FINITE_SCORE => "Non-finite score",
            Self::M101_INVALID_CONFIG => "Invalid weights",
            Self::M102_TRACE_VIOLATION => "Trace rejected",
            Self::M199_INTERNAL_PANIC => "Internal panic",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
