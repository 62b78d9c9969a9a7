use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{PartyAlliance, PartyAllianceInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AllianceFilter {
    pub parliament: Option<i64>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<AllianceFilter>,
) -> ApiResult<Json<Vec<PartyAlliance>>> {
    Ok(Json(state.db.get_alliances(filter.parliament).await?))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<PartyAllianceInput>,
) -> ApiResult<Json<PartyAlliance>> {
    let alliance = PartyAlliance::from_input(input);
    state.db.insert_alliance(&alliance).await?;
    Ok(Json(alliance))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<PartyAllianceInput>,
) -> ApiResult<Json<PartyAlliance>> {
    let mut alliance = PartyAlliance::from_input(input);
    alliance.id = id;

    state
        .db
        .update_alliance(&alliance)
        .await
        .map_err(|e| ApiError::from_lookup(e, "alliance"))?;
    Ok(Json(alliance))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_alliance(&id).await? {
        return Err(ApiError::NotFound("alliance".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
