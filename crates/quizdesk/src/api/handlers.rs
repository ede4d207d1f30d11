//! JSON API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizdesk_protocol::Session;

use crate::session::options::{OptionCatalog, catalog};
use crate::session::{ListScope, MutationOutcome, PageRequest, TableParams};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query for `GET /api/sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct SessionListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
    #[serde(default)]
    pub scope: ListScope,
}

/// One page of sessions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPageResponse {
    pub data: Vec<Session>,
    pub has_more: bool,
    pub page_count: u32,
}

/// List sessions. Upstream failures produce an empty page, not an error.
#[instrument(skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Json<SessionPageResponse> {
    let params = TableParams {
        page: query.page,
        per_page: query.per_page,
    };
    let request = PageRequest::from_params(&params, state.table.default_per_page);
    let page = state.sessions.list_page(query.scope, request).await;
    let page_count = page.page_count();
    Json(SessionPageResponse {
        data: page.items,
        has_more: page.has_more,
        page_count,
    })
}

/// Session id from the path. Anything but a whole number is a 400 with the
/// usual JSON error body.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid session id {raw}")))
}

/// Get one session.
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Session>> {
    let id = parse_id(&id)?;
    match state.sessions.get_session(id).await {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::not_found(format!("Session {} not found", id))),
    }
}

/// A session prepared for duplication.
#[instrument(skip(state))]
pub async fn duplicate_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Session>> {
    let id = parse_id(&id)?;
    match state.sessions.duplicate_template(id).await {
        Some(template) => Ok(Json(template)),
        None => Err(ApiError::not_found(format!("Session {} not found", id))),
    }
}

fn outcome_status(outcome: &MutationOutcome, success: StatusCode) -> StatusCode {
    if outcome.is_success {
        success
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Create a session.
#[instrument(skip(state, session))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(session): Json<Session>,
) -> (StatusCode, Json<MutationOutcome>) {
    let outcome = state.sessions.create_session(session).await;
    (outcome_status(&outcome, StatusCode::CREATED), Json(outcome))
}

/// Patch a session through the queue.
#[instrument(skip(state, session))]
pub async fn patch_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(session): Json<Session>,
) -> ApiResult<(StatusCode, Json<MutationOutcome>)> {
    let id = parse_id(&id)?;
    if id <= 0 {
        return Err(ApiError::bad_request(format!("Invalid session id {}", id)));
    }
    let outcome = state.sessions.patch_session(id, &session).await;
    Ok((outcome_status(&outcome, StatusCode::OK), Json(outcome)))
}

/// Every option list the forms use.
pub async fn options() -> Json<OptionCatalog> {
    Json(catalog())
}
