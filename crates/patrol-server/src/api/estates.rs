//! Estate, tree and drone-plan endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use patrol_core::{
    calculate_patrol_distance, load_layout, CreateEstateRequest, CreateTreeRequest, EstateStats,
    PatrolError, PlanningResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::state::{AppState, PlantTreeOutcome};

const INVALID_REQUEST: &str = "Invalid request";
const ESTATE_NOT_FOUND: &str = "Estate not found";
const INTERNAL_ERROR: &str = "Something happens in our end. Let us check.";

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn invalid_request() -> Response {
    error_response(StatusCode::BAD_REQUEST, INVALID_REQUEST)
}

fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
}

/// Estate ids are UUIDs; anything else is rejected before touching storage.
fn parse_estate_id(raw: &str) -> Option<String> {
    Uuid::parse_str(raw).ok().map(|id| id.to_string())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DronePlanQuery {
    pub max_distance: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestPoint {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DronePlanResponse {
    pub distance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<RestPoint>,
}

impl DronePlanResponse {
    /// Render a plan for the wire.
    ///
    /// With a budget, `distance` echoes the budget back and `rest` carries the
    /// last reachable cell. Without one, `distance` is the full sweep.
    pub fn from_plan(result: &PlanningResult, max_distance: Option<u64>) -> Self {
        match max_distance {
            Some(budget) => Self {
                distance: budget,
                rest: Some(RestPoint {
                    x: result.last_x,
                    y: result.last_y,
                }),
            },
            None => Self {
                distance: result.total_distance,
                rest: None,
            },
        }
    }
}

/// Create a new estate.
pub async fn create_estate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEstateRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::debug!("Rejected estate body: {}", e);
            return invalid_request();
        }
    };
    if let Err(reason) = req.validate() {
        tracing::debug!("Rejected estate: {}", reason);
        return invalid_request();
    }

    match state.create_estate(req.length, req.width).await {
        Ok(id) => {
            tracing::info!("Created estate {} ({}x{})", id, req.length, req.width);
            (StatusCode::OK, Json(IdResponse { id })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create estate: {:#}", e);
            internal_error()
        }
    }
}

/// Plant a tree on an estate.
pub async fn create_tree(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
    payload: Result<Json<CreateTreeRequest>, JsonRejection>,
) -> Response {
    let Some(estate_id) = parse_estate_id(&estate_id) else {
        return invalid_request();
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::debug!("Rejected tree body: {}", e);
            return invalid_request();
        }
    };
    if let Err(reason) = req.validate() {
        tracing::debug!("Rejected tree: {}", reason);
        return invalid_request();
    }

    match state.plant_tree(&estate_id, &req).await {
        Ok(PlantTreeOutcome::Planted(tree)) => {
            tracing::info!(
                "Planted tree {} at ({}, {}) on estate {}",
                tree.id,
                tree.x,
                tree.y,
                estate_id
            );
            (StatusCode::OK, Json(IdResponse { id: tree.id })).into_response()
        }
        Ok(PlantTreeOutcome::EstateNotFound) => {
            error_response(StatusCode::NOT_FOUND, ESTATE_NOT_FOUND)
        }
        Ok(PlantTreeOutcome::OutOfBounds) | Ok(PlantTreeOutcome::Occupied) => invalid_request(),
        Err(e) => {
            tracing::error!("Failed to plant tree on estate {}: {:#}", estate_id, e);
            internal_error()
        }
    }
}

/// Tree height statistics for an estate.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Response {
    let Some(estate_id) = parse_estate_id(&estate_id) else {
        return invalid_request();
    };

    match load_layout(state.as_ref(), &estate_id).await {
        Ok(layout) => {
            let heights: Vec<u32> = layout.trees.iter().map(|t| t.height).collect();
            (StatusCode::OK, Json(EstateStats::from_heights(&heights))).into_response()
        }
        Err(e) => plan_error_response(&estate_id, e),
    }
}

/// Patrol distance for an estate, optionally capped by `max_distance`.
pub async fn get_drone_plan(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
    query: Result<Query<DronePlanQuery>, QueryRejection>,
) -> Response {
    let Some(estate_id) = parse_estate_id(&estate_id) else {
        return invalid_request();
    };
    let max_distance = match query {
        Ok(Query(q)) => q.max_distance,
        Err(e) => {
            tracing::debug!("Rejected drone-plan query: {}", e);
            return invalid_request();
        }
    };

    let layout = match load_layout(state.as_ref(), &estate_id).await {
        Ok(layout) => layout,
        Err(e) => return plan_error_response(&estate_id, e),
    };

    let config = state.config();
    if layout.estate.area() > config.max_plan_cells {
        tracing::warn!(
            "Refusing to plan estate {}: {} cells exceeds limit {}",
            estate_id,
            layout.estate.area(),
            config.max_plan_cells
        );
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Estate too large to plan");
    }

    let scale_factor = config.scale_factor;
    let planned = tokio::task::spawn_blocking(move || {
        calculate_patrol_distance(Some(&layout), scale_factor, max_distance)
    })
    .await;

    match planned {
        Ok(Ok(result)) => {
            tracing::info!(
                "Planned estate {}: total={} reach=({}, {}) complete={}",
                estate_id,
                result.total_distance,
                result.last_x,
                result.last_y,
                result.is_complete()
            );
            let body = DronePlanResponse::from_plan(&result, max_distance);
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => plan_error_response(&estate_id, e),
        Err(e) => {
            tracing::error!("Planner task for estate {} failed: {}", estate_id, e);
            internal_error()
        }
    }
}

fn plan_error_response(estate_id: &str, err: PatrolError) -> Response {
    match err {
        PatrolError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, ESTATE_NOT_FOUND),
        e if e.is_client_error() => {
            tracing::warn!("Invalid planning input for estate {}: {}", estate_id, e);
            invalid_request()
        }
        e => {
            tracing::error!("Failed to load estate {}: {}", estate_id, e);
            internal_error()
        }
    }
}
