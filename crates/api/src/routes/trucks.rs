//! Truck delivery routes.
//!
//! Truck records live under the entries surface, matching the client's
//! expectations: creation at /entries/truck-new, listing at
//! /entries/all-trucks.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::entries::ListQuery;
use crate::{AppState, middleware::AuthUser};
use forecourt_core::entry::Branch;
use forecourt_db::entities::trucks;
use forecourt_db::repositories::{CreateTruckInput, TruckRepository};
use forecourt_shared::AppError;

/// Creates the truck routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries/truck-new", post(create_truck))
        .route("/entries/all-trucks", get(list_trucks))
        .route("/entries/trucks/{truck_id}", put(update_truck))
        .route("/entries/trucks/{truck_id}", delete(delete_truck))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or rewriting a truck delivery record.
#[derive(Debug, Deserialize)]
pub struct TruckRequest {
    /// Destination branch.
    pub branch: String,
    /// AGO volume carried.
    #[serde(default)]
    pub ago: f64,
    /// PMS volume carried.
    #[serde(default)]
    pub pms: f64,
    /// Delivery date.
    pub date: DateTime<Utc>,
    /// Driver name.
    pub driver: String,
    /// Destination description.
    pub destination: String,
    /// Truck registration number.
    pub truck_number: String,
}

/// Response for a truck delivery record.
#[derive(Debug, Serialize)]
pub struct TruckResponse {
    /// Record ID.
    pub id: Uuid,
    /// Destination branch.
    pub branch: String,
    /// AGO volume carried.
    pub ago: Decimal,
    /// PMS volume carried.
    pub pms: Decimal,
    /// Delivery date.
    pub date: String,
    /// Driver name.
    pub driver: String,
    /// Destination description.
    pub destination: String,
    /// Truck registration number.
    pub truck_number: String,
    /// Owner of the record.
    pub user_id: Uuid,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<trucks::Model> for TruckResponse {
    fn from(m: trucks::Model) -> Self {
        Self {
            id: m.id,
            branch: m.branch,
            ago: m.ago,
            pms: m.pms,
            date: m.date.to_rfc3339(),
            driver: m.driver,
            destination: m.destination,
            truck_number: m.truck_number,
            user_id: m.user_id,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /entries/truck-new - Record a truck delivery.
async fn create_truck(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TruckRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = to_input(payload)?;
    let branch = input.branch;

    let repo = TruckRepository::new((*state.db).clone());
    let truck = repo.create(input, auth.user_id()).await.map_err(|e| {
        error!(error = %e, branch = %branch, "Failed to create truck entry");
        ApiError::from(e)
    })?;

    info!(truck_id = %truck.id, branch = %branch, "Created new truck entry");

    Ok((StatusCode::CREATED, Json(TruckResponse::from(truck))))
}

/// GET /entries/all-trucks - List truck deliveries with pagination.
async fn list_trucks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TruckRepository::new((*state.db).clone());
    let entries = repo
        .list(query.skip, query.effective_limit())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list truck entries");
            ApiError::from(e)
        })?;

    let items: Vec<TruckResponse> = entries.into_iter().map(TruckResponse::from).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// PUT /entries/trucks/{truck_id} - Rewrite a delivery record. Owner only.
async fn update_truck(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(truck_id): Path<Uuid>,
    Json(payload): Json<TruckRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = to_input(payload)?;

    let repo = TruckRepository::new((*state.db).clone());
    let truck = repo
        .update(truck_id, input, auth.user_id())
        .await
        .map_err(|e| {
            error!(error = %e, truck_id = %truck_id, "Failed to update truck entry");
            ApiError::from(e)
        })?;

    info!(truck_id = %truck_id, "Updated truck entry");

    Ok((StatusCode::OK, Json(TruckResponse::from(truck))))
}

/// DELETE /entries/trucks/{truck_id} - Remove a delivery record. Owner only.
async fn delete_truck(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(truck_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TruckRepository::new((*state.db).clone());
    repo.delete(truck_id, auth.user_id()).await.map_err(|e| {
        error!(error = %e, truck_id = %truck_id, "Failed to delete truck entry");
        ApiError::from(e)
    })?;

    info!(truck_id = %truck_id, "Deleted truck entry");

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_input(payload: TruckRequest) -> Result<CreateTruckInput, ApiError> {
    let branch: Branch = payload
        .branch
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid branch: {}", payload.branch)))?;

    let ago = Decimal::from_f64_retain(payload.ago)
        .ok_or_else(|| AppError::Validation("ago is not a valid number".to_string()))?;
    let pms = Decimal::from_f64_retain(payload.pms)
        .ok_or_else(|| AppError::Validation("pms is not a valid number".to_string()))?;

    Ok(CreateTruckInput {
        branch,
        ago,
        pms,
        date: payload.date,
        driver: payload.driver,
        destination: payload.destination,
        truck_number: payload.truck_number,
    })
}
