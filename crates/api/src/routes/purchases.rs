//! Purchase line routes addressed by line ID.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::patch,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson};
use fleetbook_db::{PurchaseRepository, entities::purchases, repositories::UpdatePurchaseInput};

/// Creates the purchase line routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/purchases/{id}", patch(update_purchase).delete(delete_purchase))
}

/// Request body for editing a purchase line.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePurchaseRequest {
    /// New date.
    pub purchase_date: Option<NaiveDate>,
    /// New supplier; `null` clears it.
    #[serde(default, with = "double_option")]
    pub supplier: Option<Option<String>>,
    /// New quantity bought.
    pub quantity: Option<Decimal>,
    /// New purchase rate.
    pub rate: Option<Decimal>,
    /// New customer; `null` clears it.
    #[serde(default, with = "double_option")]
    pub customer: Option<Option<String>>,
    /// New quantity resold.
    pub sale_quantity: Option<Decimal>,
    /// New sale rate.
    pub sale_rate: Option<Decimal>,
    /// New notes.
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

async fn update_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePurchaseRequest>,
) -> ApiResult<Json<purchases::Model>> {
    let purchase = PurchaseRepository::new(state.conn())
        .update(
            id,
            UpdatePurchaseInput {
                purchase_date: payload.purchase_date,
                supplier: payload.supplier,
                quantity: payload.quantity,
                rate: payload.rate,
                customer: payload.customer,
                sale_quantity: payload.sale_quantity,
                sale_rate: payload.sale_rate,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(purchase))
}

async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    PurchaseRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
