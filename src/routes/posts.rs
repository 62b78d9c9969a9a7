use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{Post, PostInput};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

/// Drafts are visible only with an admin token.
pub async fn list(
    admin: Option<AdminUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Post>>> {
    let published_only = admin.is_none();
    Ok(Json(state.db.get_posts(published_only).await?))
}

pub async fn fetch(
    admin: Option<AdminUser>,
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Post>> {
    let post = state
        .db
        .get_post(&slug)
        .await
        .map_err(|e| ApiError::from_lookup(e, "post"))?;

    if !post.published && admin.is_none() {
        return Err(ApiError::NotFound("post".to_string()));
    }
    Ok(Json(post))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<PostInput>,
) -> ApiResult<Json<Post>> {
    let post = Post::from_input(input);
    state.db.insert_post(&post).await?;
    Ok(Json(post))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(input): Json<PostInput>,
) -> ApiResult<Json<Post>> {
    let existing = state
        .db
        .get_post(&slug)
        .await
        .map_err(|e| ApiError::from_lookup(e, "post"))?;

    let mut post = Post::from_input(input);
    post.id = existing.id;
    post.slug = existing.slug;
    // First publication stamps the timestamp; republishing keeps it.
    post.published_at = match (post.published, existing.published_at) {
        (true, Some(at)) => Some(at),
        (true, None) => Some(Utc::now()),
        (false, _) => None,
    };

    state
        .db
        .update_post(&post)
        .await
        .map_err(|e| ApiError::from_lookup(e, "post"))?;
    Ok(Json(post))
}

pub async fn remove(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_post(&slug).await? {
        return Err(ApiError::NotFound("post".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
