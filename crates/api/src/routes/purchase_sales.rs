//! Purchase & Sale ledger routes.
//!
//! Every write goes through `PurchaseSaleRepository`, which re-checks the
//! running balance and tin count in the same database transaction as the
//! write. Rule violations come back as 422 with a specific error code
//! (`insufficient_balance`, `insufficient_tins`, `ledger_completed`, ...).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson, middleware::AuthUser};
use fleetbook_core::ledger::{LedgerStatus, LedgerVerification, TransactionKind};
use fleetbook_db::{
    PurchaseSaleRepository,
    entities::{purchase_sale_transactions, purchase_sales},
    repositories::{
        CreateLedgerInput, CreateLedgerTransactionInput, LedgerCompletion, LedgerFilter,
        LedgerWithTransactions, PostedTransaction, UpdateLedgerInput,
        UpdateLedgerTransactionInput,
    },
};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-sales", get(list_ledgers).post(create_ledger))
        .route(
            "/purchase-sales/{id}",
            get(get_ledger).patch(update_ledger).delete(delete_ledger),
        )
        .route(
            "/purchase-sales/{id}/transactions",
            get(list_transactions).post(add_transaction),
        )
        .route(
            "/purchase-sales/{id}/transactions/{txn_id}",
            patch(update_transaction).delete(delete_transaction),
        )
        .route("/purchase-sales/{id}/complete", post(complete_ledger))
        .route("/purchase-sales/{id}/undo-complete", post(undo_complete))
        .route("/purchase-sales/{id}/verify", get(verify_ledger))
}

/// Query parameters for listing ledgers.
#[derive(Debug, Default, Deserialize)]
pub struct ListLedgersQuery {
    /// Filter by vehicle.
    pub vehicle_id: Option<Uuid>,
    /// active or completed.
    pub status: Option<LedgerStatus>,
}

/// Request body for opening a ledger.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLedgerRequest {
    /// Vehicle the ledger belongs to.
    pub vehicle_id: Uuid,
    /// Short description.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    /// Cash the ledger starts with; defaults to zero.
    pub opening_balance: Option<Decimal>,
    /// Free text.
    pub notes: Option<String>,
}

/// Request body for editing a ledger header.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLedgerRequest {
    /// Move the ledger to another vehicle.
    pub vehicle_id: Option<Uuid>,
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New opening balance; rejected on a completed ledger.
    pub opening_balance: Option<Decimal>,
    /// New notes; `null` clears them.
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request body for posting a ledger transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    /// purchase, sale or expense.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Tins moved; must be zero for expenses.
    #[serde(default)]
    pub tins: i64,
    /// Informational price per tin.
    pub rate: Option<Decimal>,
    /// Free text.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Defaults to today.
    pub transaction_date: Option<NaiveDate>,
}

/// Request body for editing a ledger transaction.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New tin count.
    pub tins: Option<i64>,
    /// New rate; `null` clears it.
    #[serde(default, with = "double_option")]
    pub rate: Option<Option<Decimal>>,
    /// New description; `null` clears it.
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
}

fn repo(state: &AppState) -> PurchaseSaleRepository {
    PurchaseSaleRepository::new(state.conn())
}

async fn list_ledgers(
    State(state): State<AppState>,
    Query(query): Query<ListLedgersQuery>,
) -> ApiResult<Json<Vec<purchase_sales::Model>>> {
    let filter = LedgerFilter {
        vehicle_id: query.vehicle_id,
        status: query.status,
    };
    Ok(Json(repo(&state).list(filter).await?))
}

/// GET /purchase-sales/{id} - Ledger with its transactions.
async fn get_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LedgerWithTransactions>> {
    Ok(Json(repo(&state).find_with_transactions(id).await?))
}

async fn create_ledger(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateLedgerRequest>,
) -> ApiResult<(StatusCode, Json<purchase_sales::Model>)> {
    let ledger = repo(&state)
        .create(CreateLedgerInput {
            vehicle_id: payload.vehicle_id,
            title: payload.title,
            start_date: payload
                .start_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            opening_balance: payload.opening_balance.unwrap_or_default(),
            notes: payload.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ledger)))
}

async fn update_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLedgerRequest>,
) -> ApiResult<Json<purchase_sales::Model>> {
    let ledger = repo(&state)
        .update(
            id,
            UpdateLedgerInput {
                vehicle_id: payload.vehicle_id,
                title: payload.title,
                start_date: payload.start_date,
                opening_balance: payload.opening_balance,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(ledger))
}

async fn delete_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<purchase_sale_transactions::Model>>> {
    Ok(Json(repo(&state).list_transactions(id).await?))
}

async fn add_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<PostedTransaction>)> {
    let posted = repo(&state)
        .add_transaction(
            id,
            CreateLedgerTransactionInput {
                kind: payload.kind,
                amount: payload.amount,
                tins: payload.tins,
                rate: payload.rate,
                description: payload.description,
                transaction_date: payload
                    .transaction_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

async fn update_transaction(
    State(state): State<AppState>,
    Path((id, txn_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResult<Json<PostedTransaction>> {
    let posted = repo(&state)
        .update_transaction(
            id,
            txn_id,
            UpdateLedgerTransactionInput {
                kind: payload.kind,
                amount: payload.amount,
                tins: payload.tins,
                rate: payload.rate,
                description: payload.description,
                transaction_date: payload.transaction_date,
            },
        )
        .await?;
    Ok(Json(posted))
}

/// DELETE /purchase-sales/{id}/transactions/{txn_id} - Returns the ledger
/// with its position after the row is gone.
async fn delete_transaction(
    State(state): State<AppState>,
    Path((id, txn_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<purchase_sales::Model>> {
    Ok(Json(repo(&state).delete_transaction(id, txn_id).await?))
}

/// POST /purchase-sales/{id}/complete - Books the balance as revenue.
async fn complete_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LedgerCompletion>> {
    let completion = repo(&state).complete(id, Some(auth.user_id())).await?;
    Ok(Json(completion))
}

async fn undo_complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<purchase_sales::Model>> {
    Ok(Json(repo(&state).undo_complete(id).await?))
}

async fn verify_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LedgerVerification>> {
    Ok(Json(repo(&state).verify(id).await?))
}
