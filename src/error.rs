//! Internal mediation failures
//!
//! These never cross `Mediator::mediate`; they are folded into the fail-open
//! Cognition as an `ErrorCode`.

use thiserror::Error;

use crate::types::ErrorCode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediationError {
    /// A score or weight produced NaN or infinity
    #[error("non-finite value produced in {stage}")]
    NonFinite { stage: &'static str },

    /// Injected weights are unusable
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// Trace carried something other than enum/int/bool tokens
    #[error("trace contains disallowed characters")]
    TraceViolation,

    /// A panic was caught at the mediation boundary
    #[error("internal panic during mediation")]
    Panic,
}

impl MediationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NonFinite { .. } => ErrorCode::M100_NON_FINITE_SCORE,
            Self::InvalidConfig { .. } => ErrorCode::M101_INVALID_CONFIG,
            Self::TraceViolation => ErrorCode::M102_TRACE_VIOLATION,
            Self::Panic => ErrorCode::M199_INTERNAL_PANIC,
        }
    }
}

/// Reject NaN / infinity coming out of a scoring stage
pub(crate) fn ensure_finite(value: f64, stage: &'static str) -> Result<f64, MediationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MediationError::NonFinite { stage })
    }
}
