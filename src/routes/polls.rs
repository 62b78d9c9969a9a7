use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::DatabaseError;
use crate::error::{ApiError, ApiResult};
use crate::models::{Poll, PollInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Poll>>> {
    Ok(Json(state.db.get_polls().await?))
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Poll>> {
    let poll = state
        .db
        .get_poll(&id)
        .await
        .map_err(|e| ApiError::from_lookup(e, "poll"))?;
    Ok(Json(poll))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<PollInput>,
) -> ApiResult<Json<Poll>> {
    if input.options.len() < 2 {
        return Err(ApiError::BadRequest(
            "a poll needs at least two options".to_string(),
        ));
    }
    let poll = Poll::from_input(input);
    state.db.insert_poll(&poll).await?;
    Ok(Json(poll))
}

/// Replace the poll's question and options. Option vote counts come from
/// the request body as-is, so an edit that echoes the stored options keeps
/// the tallies.
pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<PollInput>,
) -> ApiResult<Json<Poll>> {
    if input.options.len() < 2 {
        return Err(ApiError::BadRequest(
            "a poll needs at least two options".to_string(),
        ));
    }

    let existing = state
        .db
        .get_poll(&id)
        .await
        .map_err(|e| ApiError::from_lookup(e, "poll"))?;

    let poll = Poll {
        id: existing.id,
        question_en: input.question_en,
        question_bn: input.question_bn,
        options: input.options,
        open: existing.open,
        created_at: existing.created_at,
    };

    state
        .db
        .update_poll(&poll)
        .await
        .map_err(|e| ApiError::from_lookup(e, "poll"))?;
    Ok(Json(poll))
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub option: usize,
}

/// Public endpoint: one vote bumps one option counter.
pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> ApiResult<Json<Poll>> {
    let poll = state.db.vote_poll(&id, body.option).await.map_err(|e| match e {
        DatabaseError::Integrity(msg) => ApiError::BadRequest(msg),
        other => ApiError::from_lookup(other, "poll"),
    })?;
    Ok(Json(poll))
}

pub async fn close(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .close_poll(&id)
        .await
        .map_err(|e| ApiError::from_lookup(e, "poll"))?;
    Ok(Json(json!({ "closed": true })))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_poll(&id).await? {
        return Err(ApiError::NotFound("poll".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
