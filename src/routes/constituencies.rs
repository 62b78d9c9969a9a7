use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{Constituency, ConstituencyInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ConstituencyFilter {
    pub division: Option<String>,
    pub district: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ConstituencyFilter>,
) -> ApiResult<Json<Vec<Constituency>>> {
    let constituencies = state
        .db
        .get_constituencies(filter.division.as_deref(), filter.district.as_deref())
        .await?;
    Ok(Json(constituencies))
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(seat): Path<i64>,
) -> ApiResult<Json<Constituency>> {
    let constituency = state
        .db
        .get_constituency(seat)
        .await
        .map_err(|e| ApiError::from_lookup(e, "constituency"))?;
    Ok(Json(constituency))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ConstituencyInput>,
) -> ApiResult<Json<Constituency>> {
    let constituency = Constituency::from_input(input);
    state.db.insert_constituency(&constituency).await?;
    Ok(Json(constituency))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(seat): Path<i64>,
    Json(input): Json<ConstituencyInput>,
) -> ApiResult<Json<Constituency>> {
    let existing = state
        .db
        .get_constituency(seat)
        .await
        .map_err(|e| ApiError::from_lookup(e, "constituency"))?;

    let mut constituency = Constituency::from_input(input);
    constituency.id = existing.id;
    constituency.seat = seat;

    state
        .db
        .update_constituency(&constituency)
        .await
        .map_err(|e| ApiError::from_lookup(e, "constituency"))?;
    Ok(Json(constituency))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(seat): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_constituency(seat).await? {
        return Err(ApiError::NotFound("constituency".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
