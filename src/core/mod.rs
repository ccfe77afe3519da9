//! Core modules for Marion

pub mod api;
pub mod clock;
pub mod confidence;
pub mod desire;
pub mod intent;
pub mod lexicon;
pub mod mediator;
pub mod mode;
pub mod novelty;
pub mod posture;
pub mod router;
pub mod stall;
pub mod trace;
pub mod velvet;
pub mod weights;

pub use api::{create_router, run_server};
pub use clock::{Clock, FixedClock, SystemClock};
pub use lexicon::Lexicon;
pub use mediator::{fail_open_cognition, mediate, mediate_value, Mediator};
pub use router::{lane_domain, route_domain, route_value, DomainRouter, RouteContext, ScoreCard};
pub use weights::{RouterWeights, Weights};
