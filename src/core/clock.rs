//! Injectable wall clock
//!
//! Mediation never reads global time directly; `MediationOptions::now_ms`
//! beats the clock when supplied.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    /// Epoch milliseconds
    fn now_ms(&self) -> i64;
}

/// Real time via chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Frozen time for tests and replays
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// RFC 3339 rendering for telemetry; empty when out of chrono's range
pub fn rfc3339(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
