//! Core types for Marion

pub(crate) mod coerce;
mod cognition;
mod domain;
mod options;
mod reason;
mod session;
mod turn;

pub use cognition::{
    Budget, Cognition, Confidence, DiscoveryHint, Dominance, HintStyle, Intent, LatentDesire,
    MarionState, Mode, RiskTier, Telemetry,
};
pub use domain::{Domain, DomainRouting, DomainScores, RouteOptions, RouteSignal, RoutingReason};
pub use options::{MediationOptions, OverrideKind};
pub use reason::{ErrorCode, NoveltyReason, VelvetReason};
pub use session::{SessionSnapshot, SessionUpdate};
pub use turn::{NormalizedTurn, TurnSignals};
