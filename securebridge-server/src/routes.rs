//! Route table and handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use securebridge_crypto::SubmissionPayload;
use securebridge_service::{
    PublicKeyResponse, SearchMatches, SearchQuery, ServiceResult, SubmitReceipt,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Submissions and queries are a few hundred bytes; anything near this is
/// not a legitimate client.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub records: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/public-key", get(public_key))
        .route("/submit", post(submit))
        .route("/search", post(search))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let bridge = state.bridge.clone();
    let records = run_blocking(move || bridge.record_count()).await?;
    Ok(Json(HealthResponse {
        message: "SecureBridge backend running".to_string(),
        records,
    }))
}

async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.bridge.public_key_pem().to_string(),
    })
}

async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionPayload>, JsonRejection>,
) -> ApiResult<Json<SubmitReceipt>> {
    let Json(payload) = payload?;
    let bridge = state.bridge.clone();
    let receipt = run_blocking(move || bridge.submit(&payload)).await?;
    Ok(Json(receipt))
}

async fn search(
    State(state): State<AppState>,
    query: Result<Json<SearchQuery>, JsonRejection>,
) -> ApiResult<Json<SearchMatches>> {
    let Json(query) = query?;
    let bridge = state.bridge.clone();
    let matches = run_blocking(move || bridge.search(&query.identifier)).await?;

    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(matches))
}

/// Runs CPU-bound or blocking protocol work off the async executor.
async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {e}")))?
        .map_err(ApiError::from)
}
