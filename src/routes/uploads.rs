//! Multipart photo uploads. Files land in the public uploads directory with
//! a UUID name; the response carries the path the frontend should store on
//! the candidate or post record.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::routes::admin::AdminUser;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub async fn upload(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .ok_or_else(|| ApiError::BadRequest("empty upload".to_string()))?;

    let original_name = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::BadRequest("missing file name".to_string()))?;
    let extension = extension_of(&original_name)
        .ok_or_else(|| ApiError::BadRequest("unsupported file type".to_string()))?;

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("empty upload".to_string()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(ApiError::BadRequest("file too large".to_string()));
    }

    let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
    let dest = FsPath::new(&state.config.uploads_dir).join(&stored_name);

    tokio::fs::create_dir_all(&state.config.uploads_dir)
        .await
        .map_err(|e| ApiError::Internal(Box::new(e)))?;
    tokio::fs::write(&dest, &data)
        .await
        .map_err(|e| ApiError::Internal(Box::new(e)))?;

    tracing::info!("stored upload {} ({} bytes)", stored_name, data.len());

    Ok(Json(json!({ "url": format!("/uploads/{}", stored_name) })))
}

fn extension_of(file_name: &str) -> Option<String> {
    let extension = FsPath::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_pass() {
        assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("photo.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn other_extensions_are_refused() {
        assert_eq!(extension_of("script.sh"), None);
        assert_eq!(extension_of("no_extension"), None);
        assert_eq!(extension_of("double.tar.gz"), None);
    }
}
