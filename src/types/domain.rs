//! Knowledge domains and routing output

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{as_f64, as_i64, field};
use crate::{ROUTE_DEFAULT_MAX_SECONDARY, ROUTE_DEFAULT_MIN_SECONDARY_SCORE};

/// Fixed domain set. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Domain {
    Ai,
    Fin,
    Law,
    Cyber,
    Psychology,
    English,
    Strategy,
    Music,
    Core,
}

impl Domain {
    pub const COUNT: usize = 9;

    pub const ALL: [Domain; Domain::COUNT] = [
        Domain::Ai,
        Domain::Fin,
        Domain::Law,
        Domain::Cyber,
        Domain::Psychology,
        Domain::English,
        Domain::Strategy,
        Domain::Music,
        Domain::Core,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Ai => "ai",
            Domain::Fin => "fin",
            Domain::Law => "law",
            Domain::Cyber => "cyber",
            Domain::Psychology => "psychology",
            Domain::English => "english",
            Domain::Strategy => "strategy",
            Domain::Music => "music",
            Domain::Core => "core",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One score per domain, indexed by `Domain::index`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomainScores([f64; Domain::COUNT]);

impl DomainScores {
    pub fn get(&self, domain: Domain) -> f64 {
        self.0[domain.index()]
    }

    pub fn add(&mut self, domain: Domain, delta: f64) {
        self.0[domain.index()] += delta;
    }

    pub fn set(&mut self, domain: Domain, value: f64) {
        self.0[domain.index()] = value;
    }

    /// Floor every score at zero
    pub fn floor_zero(&mut self) {
        for s in self.0.iter_mut() {
            if !s.is_finite() || *s < 0.0 {
                *s = 0.0;
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    /// Domains by descending score; ties keep declaration order
    pub fn ranked(&self) -> Vec<(Domain, f64)> {
        let mut ranked: Vec<(Domain, f64)> =
            Domain::ALL.iter().map(|d| (*d, self.get(*d))).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Each score divided by the maximum
    pub fn normalized(&self) -> DomainScores {
        let max = self.max();
        let mut out = DomainScores::default();
        if max > 0.0 {
            for d in Domain::ALL {
                out.set(d, self.get(d) / max);
            }
        }
        out
    }
}

/// Text-free explanation tags for a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSignal {
    Lane(Domain),
    Action(Domain),
    Keyword(Domain),
    Coupling(Domain, Domain),
    Sticky(Domain),
    StabilizeBias,
    DirectiveBias,
    RiskHigh,
    RiskMedium,
    CoreFallback,
}

impl RouteSignal {
    pub fn tag(&self) -> String {
        match self {
            Self::Lane(d) => format!("lane:{}", d),
            Self::Action(d) => format!("action:{}", d),
            Self::Keyword(d) => format!("kw:{}", d),
            Self::Coupling(a, b) => format!("couple:{}+{}", a, b),
            Self::Sticky(d) => format!("sticky:{}", d),
            Self::StabilizeBias => "bias:stabilize".to_string(),
            Self::DirectiveBias => "bias:directive".to_string(),
            Self::RiskHigh => "risk:high".to_string(),
            Self::RiskMedium => "risk:medium".to_string(),
            Self::CoreFallback => "fallback:core".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingReason {
    /// Primary score against the routing ceiling, 0.0-1.0
    pub confidence: f64,
    /// At most ten tags
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRouting {
    pub primary: Domain,
    /// At most `max_secondary`, never containing `primary`
    pub secondary: Vec<Domain>,
    pub reason: RoutingReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteOptions {
    pub max_secondary: usize,
    pub min_secondary_score: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_secondary: ROUTE_DEFAULT_MAX_SECONDARY,
            min_secondary_score: ROUTE_DEFAULT_MIN_SECONDARY_SCORE,
        }
    }
}

impl RouteOptions {
    /// Coerce an arbitrary JSON value into options. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            max_secondary: as_i64(field(value, &["maxSecondary", "max_secondary"]))
                .filter(|n| *n >= 0)
                .map(|n| (n as usize).min(Domain::COUNT - 1))
                .unwrap_or(defaults.max_secondary),
            min_secondary_score: as_f64(field(value, &["minSecondaryScore", "min_secondary_score"]))
                .filter(|f| *f >= 0.0)
                .unwrap_or(defaults.min_secondary_score),
        }
    }
}
