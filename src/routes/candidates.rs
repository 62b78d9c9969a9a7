use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{Candidate, CandidateInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CandidateFilter {
    pub party: Option<String>,
    pub constituency: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CandidateFilter>,
) -> ApiResult<Json<Vec<Candidate>>> {
    let candidates = state
        .db
        .get_candidates(filter.party.as_deref(), filter.constituency.as_deref())
        .await?;
    Ok(Json(candidates))
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Candidate>> {
    let candidate = state
        .db
        .get_candidate(&id)
        .await
        .map_err(|e| ApiError::from_lookup(e, "candidate"))?;
    Ok(Json(candidate))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<CandidateInput>,
) -> ApiResult<Json<Candidate>> {
    let candidate = Candidate::from_input(input);
    state.db.insert_candidate(&candidate).await?;
    Ok(Json(candidate))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<CandidateInput>,
) -> ApiResult<Json<Candidate>> {
    let existing = state
        .db
        .get_candidate(&id)
        .await
        .map_err(|e| ApiError::from_lookup(e, "candidate"))?;

    let mut candidate = Candidate::from_input(input);
    candidate.id = existing.id;
    candidate.created_at = existing.created_at;

    state
        .db
        .update_candidate(&candidate)
        .await
        .map_err(|e| ApiError::from_lookup(e, "candidate"))?;
    Ok(Json(candidate))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_candidate(&id).await? {
        return Err(ApiError::NotFound("candidate".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
