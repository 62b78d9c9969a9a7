//! Two-step admin login and the bearer-token request guard.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, State},
    http::{header, request::Parts},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::models::Admin;
use crate::state::AppState;

/// Extractor for routes that require a valid admin bearer token.
pub struct AdminUser(pub Admin);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
        let admin_id = auth::verify_token(token, state.config.token_ttl_secs)
            .map_err(|_| ApiError::Unauthorized)?;

        let admin = state
            .db
            .get_admin_by_id(&admin_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AdminUser(admin))
    }
}

impl OptionalFromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        Ok(
            <Self as FromRequestParts<Arc<AppState>>>::from_request_parts(parts, state)
                .await
                .ok(),
        )
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Step one: store a short-lived verification code for the admin. The
/// response does not reveal whether the email is registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    if !auth::is_valid_email(&body.email) {
        return Err(ApiError::BadRequest("invalid email address".to_string()));
    }

    if state.db.get_admin_by_email(&body.email).await?.is_some() {
        let code = auth::generate_verification_code();
        let expires_at = Utc::now() + Duration::minutes(10);
        state
            .db
            .set_verification_code(&body.email, &code, expires_at)
            .await?;
        // Delivery is out of band; surfaced in the server log for now.
        tracing::info!("verification code for {}: {}", body.email, code);
    }

    Ok(Json(json!({ "sent": true })))
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Step two: exchange a matching, unexpired code for a bearer token.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Json<Value>> {
    let admin = state
        .db
        .get_admin_by_email(&body.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let code_matches = admin
        .verification_code
        .as_deref()
        .map(|stored| stored == body.code)
        .unwrap_or(false);
    let unexpired = admin
        .code_expires_at
        .map(|expiry| expiry > Utc::now())
        .unwrap_or(false);

    if !code_matches || !unexpired {
        return Err(ApiError::Unauthorized);
    }

    state.db.clear_verification_code(&body.email).await?;
    let token = auth::issue_token(&admin.id);

    Ok(Json(json!({ "token": token, "admin": admin })))
}

pub async fn me(AdminUser(admin): AdminUser) -> Json<Admin> {
    Json(admin)
}
