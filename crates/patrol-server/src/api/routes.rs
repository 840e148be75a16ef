//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{estates, request_id};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/estate", post(estates::create_estate))
        .route("/estate/:estate_id/tree", post(estates::create_tree))
        .route("/estate/:estate_id/stats", get(estates::get_stats))
        .route("/estate/:estate_id/drone-plan", get(estates::get_drone_plan))
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
