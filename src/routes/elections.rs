use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{Election, ElectionInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Election>>> {
    Ok(Json(state.db.get_elections().await?))
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(parliament): Path<i64>,
) -> ApiResult<Json<Election>> {
    let election = state
        .db
        .get_election(parliament)
        .await
        .map_err(|e| ApiError::from_lookup(e, "election"))?;
    Ok(Json(election))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ElectionInput>,
) -> ApiResult<Json<Election>> {
    let election = Election::from_input(input);
    state.db.insert_election(&election).await?;
    Ok(Json(election))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(parliament): Path<i64>,
    Json(input): Json<ElectionInput>,
) -> ApiResult<Json<Election>> {
    let existing = state
        .db
        .get_election(parliament)
        .await
        .map_err(|e| ApiError::from_lookup(e, "election"))?;

    let mut election = Election::from_input(input);
    election.id = existing.id;
    // The path, not the body, names the election being replaced.
    election.parliament = parliament;

    state
        .db
        .update_election(&election)
        .await
        .map_err(|e| ApiError::from_lookup(e, "election"))?;
    Ok(Json(election))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(parliament): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_election(parliament).await? {
        return Err(ApiError::NotFound("election".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
