//! Trip routes, including the purchase lines of a trip.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson};
use fleetbook_core::trip::TripStatus;
use fleetbook_db::{
    PurchaseRepository, TripRepository,
    entities::{purchases, trips},
    repositories::{CreatePurchaseInput, CreateTripInput, TripDetails, TripFilter, UpdateTripInput},
};
use fleetbook_shared::types::{PageRequest, PageResponse};

/// Creates the trip routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/{id}",
            get(get_trip).patch(update_trip).delete(delete_trip),
        )
        .route("/trips/{id}/complete", post(complete_trip))
        .route(
            "/trips/{id}/purchases",
            get(list_purchases).post(create_purchase),
        )
}

/// Query parameters for listing trips.
#[derive(Debug, Default, Deserialize)]
pub struct ListTripsQuery {
    /// Filter by vehicle.
    pub vehicle_id: Option<Uuid>,
    /// ongoing or completed.
    pub status: Option<TripStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size, capped.
    pub per_page: Option<u32>,
}

/// Request body for starting a trip.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    /// Vehicle running the trip.
    pub vehicle_id: Uuid,
    /// Short description.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    /// Optional planned end.
    pub end_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
}

/// Request body for editing a trip header.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTripRequest {
    /// Move the trip to another vehicle.
    pub vehicle_id: Option<Uuid>,
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New end date; `null` clears it.
    #[serde(default, with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    /// Set `ongoing` to reopen a completed trip.
    pub status: Option<TripStatus>,
    /// New notes.
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request body for adding a purchase line.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    /// Defaults to today.
    pub purchase_date: Option<NaiveDate>,
    /// Seller.
    #[validate(length(max = 200))]
    pub supplier: Option<String>,
    /// Quantity bought, positive.
    pub quantity: Decimal,
    /// Price per unit bought.
    pub rate: Decimal,
    /// Buyer of the resold part.
    #[validate(length(max = 200))]
    pub customer: Option<String>,
    /// Quantity resold; defaults to zero.
    pub sale_quantity: Option<Decimal>,
    /// Price per unit resold; defaults to zero.
    pub sale_rate: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListTripsQuery>,
) -> ApiResult<Json<PageResponse<trips::Model>>> {
    let filter = TripFilter {
        vehicle_id: query.vehicle_id,
        status: query.status,
    };
    let page = PageRequest::from_query(query.page, query.per_page);

    Ok(Json(TripRepository::new(state.conn()).list(filter, &page).await?))
}

/// GET /trips/{id} - Trip with its purchase lines and expenses.
async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TripDetails>> {
    Ok(Json(TripRepository::new(state.conn()).find_details(id).await?))
}

async fn create_trip(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTripRequest>,
) -> ApiResult<(StatusCode, Json<trips::Model>)> {
    let trip = TripRepository::new(state.conn())
        .create(CreateTripInput {
            vehicle_id: payload.vehicle_id,
            title: payload.title,
            start_date: payload
                .start_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            end_date: payload.end_date,
            notes: payload.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTripRequest>,
) -> ApiResult<Json<trips::Model>> {
    let trip = TripRepository::new(state.conn())
        .update(
            id,
            UpdateTripInput {
                vehicle_id: payload.vehicle_id,
                title: payload.title,
                start_date: payload.start_date,
                end_date: payload.end_date,
                status: payload.status,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(trip))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TripRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<trips::Model>> {
    Ok(Json(TripRepository::new(state.conn()).complete(id).await?))
}

async fn list_purchases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<purchases::Model>>> {
    Ok(Json(PurchaseRepository::new(state.conn()).list_for_trip(id).await?))
}

/// POST /trips/{id}/purchases - Adds a line; the trip totals follow.
async fn create_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreatePurchaseRequest>,
) -> ApiResult<(StatusCode, Json<purchases::Model>)> {
    let purchase = PurchaseRepository::new(state.conn())
        .create(
            id,
            CreatePurchaseInput {
                purchase_date: payload
                    .purchase_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
                supplier: payload.supplier,
                quantity: payload.quantity,
                rate: payload.rate,
                customer: payload.customer,
                sale_quantity: payload.sale_quantity.unwrap_or_default(),
                sale_rate: payload.sale_rate.unwrap_or_default(),
                notes: payload.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}
