//! Vehicle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson};
use fleetbook_db::{
    VehicleRepository,
    entities::vehicles,
    repositories::{CreateVehicleInput, UpdateVehicleInput, VehicleFilter},
};

/// Creates the vehicle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/{id}",
            get(get_vehicle).patch(update_vehicle).delete(delete_vehicle),
        )
}

/// Query parameters for listing vehicles.
#[derive(Debug, Default, Deserialize)]
pub struct ListVehiclesQuery {
    /// Only vehicles of this branch.
    pub branch_id: Option<Uuid>,
    /// Filter by active flag.
    pub active: Option<bool>,
}

/// Request body for registering a vehicle.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    /// Registration number, unique.
    #[validate(length(min = 1, max = 50))]
    pub vehicle_number: String,
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Truck, tanker, pickup...
    #[validate(length(max = 50))]
    pub vehicle_type: Option<String>,
    /// Home branch.
    pub branch_id: Option<Uuid>,
    /// Defaults to true.
    pub is_active: Option<bool>,
}

/// Request body for updating a vehicle.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    /// New registration number.
    #[validate(length(min = 1, max = 50))]
    pub vehicle_number: Option<String>,
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New type; `null` clears it.
    #[serde(default, with = "double_option")]
    pub vehicle_type: Option<Option<String>>,
    /// New branch; `null` detaches the vehicle.
    #[serde(default, with = "double_option")]
    pub branch_id: Option<Option<Uuid>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<ListVehiclesQuery>,
) -> ApiResult<Json<Vec<vehicles::Model>>> {
    let filter = VehicleFilter {
        branch_id: query.branch_id,
        is_active: query.active,
    };
    Ok(Json(VehicleRepository::new(state.conn()).list(filter).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<vehicles::Model>> {
    Ok(Json(VehicleRepository::new(state.conn()).find_by_id(id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<vehicles::Model>)> {
    let vehicle = VehicleRepository::new(state.conn())
        .create(CreateVehicleInput {
            vehicle_number: payload.vehicle_number,
            name: payload.name,
            vehicle_type: payload.vehicle_type,
            branch_id: payload.branch_id,
            is_active: payload.is_active.unwrap_or(true),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<Json<vehicles::Model>> {
    let vehicle = VehicleRepository::new(state.conn())
        .update(
            id,
            UpdateVehicleInput {
                vehicle_number: payload.vehicle_number,
                name: payload.name,
                vehicle_type: payload.vehicle_type,
                branch_id: payload.branch_id,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(vehicle))
}

/// DELETE /vehicles/{id} - Refused with 409 while trips or ledgers reference it.
async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    VehicleRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
