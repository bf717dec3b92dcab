//! HTTP transport: binds the listener and serves the challenge API.
//!
//! | Method | Path       | Auth  |
//! |--------|------------|-------|
//! | POST   | `/present` | Basic |
//! | POST   | `/cleanup` | Basic |
//! | GET    | `/healthz` | none  |

mod auth;

use acmeproxy_core::ChallengeRequest;
use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use auth::AuthenticatedUser;

use crate::challenge::ChallengeCoordinator;
use crate::error::{ChallengeError, SrvError};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    coordinator: ChallengeCoordinator,
}

impl AppState {
    pub const fn new(coordinator: ChallengeCoordinator) -> Self {
        Self { coordinator }
    }
}

/// Build the axum router.
pub fn router(state: AppState) -> Router {
    let challenges = Router::new()
        .route("/present", post(present))
        .route("/cleanup", post(cleanup))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .merge(challenges)
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `addr` until `shutdown` resolves.
pub async fn run<F>(addr: &str, coordinator: ChallengeCoordinator, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| SrvError::Server(format!("bind {addr}: {e}")))?;
    info!(addr = %listener.local_addr()?, "acmeproxy listening");

    axum::serve(listener, router(AppState::new(coordinator)))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SrvError::Server(e.to_string()))?;

    info!("acmeproxy stopped");
    Ok(())
}

async fn healthz() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn present(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    body: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<Value>, ChallengeError> {
    let request = validate(body)?;
    let records = state.coordinator.present(&user, &request).await?;
    Ok(Json(json!({ "records": records, "success": true })))
}

async fn cleanup(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    body: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<Value>, ChallengeError> {
    let request = validate(body)?;
    let records = state.coordinator.cleanup(&user, &request).await?;
    Ok(Json(json!({ "records": records, "success": true })))
}

fn validate(
    body: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<ChallengeRequest, ChallengeError> {
    let Json(request) = body.map_err(|e| {
        ChallengeError::Validation(format!("unable to bind json: {}", e.body_text()))
    })?;
    let request = request.normalized();
    if let Some(field) = request.missing_field() {
        return Err(ChallengeError::Validation(format!("{field} is required")));
    }
    Ok(request)
}
