//! Expense routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson, middleware::AuthUser};
use fleetbook_core::{expense::ExpenseType, reports::DateRange};
use fleetbook_db::{
    ExpenseRepository,
    entities::expenses,
    repositories::{CreateExpenseInput, ExpenseFilter, UpdateExpenseInput},
};
use fleetbook_shared::types::{PageRequest, PageResponse};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
}

/// Query parameters for listing expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    /// Filter by expense type.
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Filter by trip.
    pub trip_id: Option<Uuid>,
    /// First expense date included.
    pub from: Option<NaiveDate>,
    /// Last expense date included.
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size, capped.
    pub per_page: Option<u32>,
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Short description.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Positive amount.
    pub amount: Decimal,
    /// investment, revenue or other.
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Optional trip; the trip's totals are refreshed.
    pub trip_id: Option<Uuid>,
    /// Defaults to today.
    pub expense_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
}

/// Request body for editing an expense. `null` clears references.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New type.
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
    /// New category.
    #[serde(default, with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
    /// New vehicle.
    #[serde(default, with = "double_option")]
    pub vehicle_id: Option<Option<Uuid>>,
    /// New trip.
    #[serde(default, with = "double_option")]
    pub trip_id: Option<Option<Uuid>>,
    /// New date.
    pub expense_date: Option<NaiveDate>,
    /// New notes.
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
) -> ApiResult<Json<PageResponse<expenses::Model>>> {
    let range = DateRange::new(query.from, query.to)?;
    let filter = ExpenseFilter {
        expense_type: query.expense_type,
        category_id: query.category_id,
        vehicle_id: query.vehicle_id,
        trip_id: query.trip_id,
        from: range.from,
        to: range.to,
    };
    let page = PageRequest::from_query(query.page, query.per_page);

    let expenses = ExpenseRepository::new(state.conn())
        .list(filter, &page)
        .await?;
    Ok(Json(expenses))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<expenses::Model>> {
    Ok(Json(ExpenseRepository::new(state.conn()).find_by_id(id).await?))
}

async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<expenses::Model>)> {
    let expense = ExpenseRepository::new(state.conn())
        .create(CreateExpenseInput {
            title: payload.title,
            amount: payload.amount,
            expense_type: payload.expense_type,
            category_id: payload.category_id,
            vehicle_id: payload.vehicle_id,
            trip_id: payload.trip_id,
            expense_date: payload
                .expense_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            notes: payload.notes,
            created_by: Some(auth.user_id()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PATCH /expenses/{id} - Completion expenses of a ledger answer 409.
async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateExpenseRequest>,
) -> ApiResult<Json<expenses::Model>> {
    let expense = ExpenseRepository::new(state.conn())
        .update(
            id,
            UpdateExpenseInput {
                title: payload.title,
                amount: payload.amount,
                expense_type: payload.expense_type,
                category_id: payload.category_id,
                vehicle_id: payload.vehicle_id,
                trip_id: payload.trip_id,
                expense_date: payload.expense_date,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ExpenseRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
