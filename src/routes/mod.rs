use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::state::AppState;

pub mod admin;
pub mod alliances;
pub mod analysis;
pub mod candidates;
pub mod constituencies;
pub mod elections;
pub mod polls;
pub mod posts;
pub mod uploads;

pub fn router(state: Arc<AppState>) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/api/candidates",
            get(candidates::list).post(candidates::create),
        )
        .route(
            "/api/candidates/{id}",
            get(candidates::fetch)
                .put(candidates::update)
                .delete(candidates::remove),
        )
        .route("/api/elections", get(elections::list).post(elections::create))
        .route(
            "/api/elections/{parliament}",
            get(elections::fetch)
                .put(elections::update)
                .delete(elections::remove),
        )
        .route(
            "/api/constituencies",
            get(constituencies::list).post(constituencies::create),
        )
        .route(
            "/api/constituencies/{seat}",
            get(constituencies::fetch)
                .put(constituencies::update)
                .delete(constituencies::remove),
        )
        .route("/api/alliances", get(alliances::list).post(alliances::create))
        .route(
            "/api/alliances/{id}",
            put(alliances::update).delete(alliances::remove),
        )
        .route("/api/polls", get(polls::list).post(polls::create))
        .route(
            "/api/polls/{id}",
            get(polls::fetch).put(polls::update).delete(polls::remove),
        )
        .route("/api/polls/{id}/vote", post(polls::vote))
        .route("/api/polls/{id}/close", post(polls::close))
        .route("/api/posts", get(posts::list).post(posts::create))
        .route(
            "/api/posts/{slug}",
            get(posts::fetch).put(posts::update).delete(posts::remove),
        )
        .route("/api/analysis/swing-states", get(analysis::swing_states))
        .route("/api/analysis/margins", get(analysis::margins))
        .route("/api/admin/auth/login", post(admin::login))
        .route("/api/admin/auth/verify", post(admin::verify))
        .route("/api/admin/me", get(admin::me))
        .route(
            "/api/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
