//! REST API Endpoints
//!
//! Health, root, membership and proof endpoints for the front-end.

use crate::state::{AppState, CheckCounts};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use council_whitelist::MembershipProofBundle;
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Run the API server
pub async fn run_server(listen: String, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!(address = %listen, "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/root", get(root))
        .route("/members/{identity}", get(check_member))
        .route("/proofs/{identity}", get(get_proof))
        .route("/verify", post(verify_bundle))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    members: usize,
}

/// Health check endpoint. The roster is validated before the server starts,
/// so a running service is always healthy.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "healthy",
        members: state.prover().member_count(),
    };

    (StatusCode::OK, Json(response))
}

/// Status response
#[derive(Serialize)]
struct StatusResponse {
    root: String,
    members: usize,
    uptime_secs: u64,
    checks: CheckCounts,
}

/// Status endpoint
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        root: state.prover().root_hex(),
        members: state.prover().member_count(),
        uptime_secs: state.uptime_secs(),
        checks: state.check_counts(),
    })
}

/// Root response
#[derive(Serialize)]
struct RootResponse {
    root: String,
    members: usize,
    depth: usize,
}

/// Published whitelist root
async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let prover = state.prover();
    Json(RootResponse {
        root: prover.root_hex(),
        members: prover.member_count(),
        depth: prover.tree().depth(),
    })
}

/// Membership response
#[derive(Serialize)]
struct MembershipResponse {
    identity: String,
    is_member: bool,
}

/// Membership check. A non-member is a normal 200 with `is_member: false`.
async fn check_member(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Json<MembershipResponse> {
    let is_member = state.check(&identity);
    Json(MembershipResponse {
        identity,
        is_member,
    })
}

/// Inclusion proof for a member
async fn get_proof(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<MembershipProofBundle>, StatusCode> {
    state
        .prover()
        .prove(&identity)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Verification response
#[derive(Serialize)]
struct VerifyResponse {
    valid: bool,
}

/// Verify a bundle against this service's root, ignoring the root it carries
async fn verify_bundle(
    State(state): State<AppState>,
    Json(bundle): Json<MembershipProofBundle>,
) -> Json<VerifyResponse> {
    let valid = state.prover().verify_bundle(&bundle);
    tracing::debug!(identity = %bundle.identity, valid, "Verified submitted bundle");
    Json(VerifyResponse { valid })
}
