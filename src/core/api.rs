//! Stateless HTTP adapter
//!
//! Endpoints:
//! - GET  /health  - Health check
//! - POST /mediate - `{turn, session, options}` → Cognition
//! - POST /route   - `{turn, session, cognition, options}` → DomainRouting
//! - POST /turn    - `{turn, session, options, routeOptions, riskTier?}` → both
//!
//! Bodies are coerced leniently and every response is 200: the core fails
//! open, so there is nothing to reject. No session is stored here.

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::clock::{Clock, SystemClock};
use super::mediator::Mediator;
use super::router::{DomainRouter, RouteContext};
use crate::types::coerce::{as_token, field};
use crate::types::{
    Cognition, DomainRouting, MediationOptions, NormalizedTurn, RiskTier, RouteOptions,
    SessionSnapshot,
};

/// App state
pub struct AppState<C: Clock = SystemClock> {
    pub mediator: Mediator<C>,
    pub router: DomainRouter,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Combined mediate + route response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub cognition: Cognition,
    pub routing: DomainRouting,
}

/// Create the API router
pub fn create_router<C: Clock + 'static>(mediator: Mediator<C>, router: DomainRouter) -> Router {
    let state = Arc::new(AppState { mediator, router });

    Router::new()
        .route("/health", get(health))
        .route("/mediate", post(mediate_handler::<C>))
        .route("/route", post(route_handler::<C>))
        .route("/turn", post(turn_handler::<C>))
        .with_state(state)
}

/// Malformed bodies read as `null`
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn part<'a>(body: &'a Value, keys: &[&str]) -> &'a Value {
    field(body, keys).unwrap_or(&Value::Null)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn mediate_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Json<Cognition> {
    let body = parse_body(&body);
    let cognition = state.mediator.mediate(
        &NormalizedTurn::from_value(part(&body, &["turn"])),
        &SessionSnapshot::from_value(part(&body, &["session"])),
        &MediationOptions::from_value(part(&body, &["options"])),
    );
    Json(cognition)
}

async fn route_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Json<DomainRouting> {
    let body = parse_body(&body);
    let routing = state.router.route_with(
        &NormalizedTurn::from_value(part(&body, &["turn"])),
        &SessionSnapshot::from_value(part(&body, &["session"])),
        RouteContext::from_value(part(&body, &["cognition", "cog"])),
        &RouteOptions::from_value(part(&body, &["options"])),
    );
    Json(routing)
}

async fn turn_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Json<TurnResponse> {
    let body = parse_body(&body);
    let turn = NormalizedTurn::from_value(part(&body, &["turn"]));
    let session = SessionSnapshot::from_value(part(&body, &["session"]));

    let mut cognition = state.mediator.mediate(
        &turn,
        &session,
        &MediationOptions::from_value(part(&body, &["options"])),
    );
    // Host-side risk assessment replaces the derived tier
    if let Some(risk) = as_token(field(&body, &["riskTier", "risk_tier"]))
        .as_deref()
        .and_then(RiskTier::parse)
    {
        cognition.risk_tier = risk;
    }

    let routing = state.router.route(
        &turn,
        &session,
        &cognition,
        &RouteOptions::from_value(part(&body, &["routeOptions", "route_options"])),
    );
    Json(TurnResponse { cognition, routing })
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    mediator: Mediator,
    router: DomainRouter,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(mediator, router);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("marion API running on {}", addr);
    info!("  GET  /health  - Health check");
    info!("  POST /mediate - Turn → Cognition");
    info!("  POST /route   - Turn + Cognition → DomainRouting");
    info!("  POST /turn    - Mediate and route in one call");
    axum::serve(listener, app).await?;
    Ok(())
}
