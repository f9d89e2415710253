//! Purchase & Sale ledger repository.
//!
//! Every operation that moves a ledger loads it inside a database
//! transaction, computes the new position with `fleetbook_core::ledger`, and
//! writes the transaction row together with the new position. A rejected
//! position drops the transaction, so nothing is written.

use chrono::NaiveDate;
use fleetbook_core::ledger::{
    self as rules, LedgerError, LedgerPosition, LedgerVerification, TransactionEffect,
    TransactionKind,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::clean;
use crate::entities::{
    expenses, purchase_sale_transactions as ledger_txns, purchase_sales,
    sea_orm_active_enums::{self, LedgerStatus},
    vehicles,
};

/// Error types for purchase & sale ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseSaleError {
    /// Ledger not found.
    #[error("Purchase & sale ledger not found: {0}")]
    NotFound(Uuid),

    /// Transaction row not found on this ledger.
    #[error("Ledger transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Referenced vehicle not found.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(Uuid),

    /// Title is empty.
    #[error("Ledger title is required")]
    BlankTitle,

    /// Bookkeeping rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for opening a ledger.
#[derive(Debug, Clone)]
pub struct CreateLedgerInput {
    /// Vehicle the ledger belongs to.
    pub vehicle_id: Uuid,
    /// Title.
    pub title: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// Opening balance (>= 0).
    pub opening_balance: Decimal,
    /// Notes.
    pub notes: Option<String>,
}

/// Input for editing a ledger header.
#[derive(Debug, Clone, Default)]
pub struct UpdateLedgerInput {
    /// Vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Title.
    pub title: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// New opening balance; shifts the current balance by the difference.
    pub opening_balance: Option<Decimal>,
    /// Notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

/// Filter options for listing ledgers.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Only ledgers of this vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Only ledgers with this status.
    pub status: Option<rules::LedgerStatus>,
}

/// Input for adding a transaction row.
#[derive(Debug, Clone)]
pub struct CreateLedgerTransactionInput {
    /// Purchase, sale or expense.
    pub kind: TransactionKind,
    /// Amount (> 0).
    pub amount: Decimal,
    /// Tins moved (0 for expenses).
    pub tins: i64,
    /// Informational rate per tin.
    pub rate: Option<Decimal>,
    /// Description.
    pub description: Option<String>,
    /// Date.
    pub transaction_date: NaiveDate,
}

/// Input for editing a transaction row.
#[derive(Debug, Clone, Default)]
pub struct UpdateLedgerTransactionInput {
    /// Kind.
    pub kind: Option<TransactionKind>,
    /// Amount.
    pub amount: Option<Decimal>,
    /// Tins.
    pub tins: Option<i64>,
    /// Rate; `Some(None)` clears it.
    pub rate: Option<Option<Decimal>>,
    /// Description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Date.
    pub transaction_date: Option<NaiveDate>,
}

/// A ledger with its transaction rows.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerWithTransactions {
    /// The ledger.
    #[serde(flatten)]
    pub ledger: purchase_sales::Model,
    /// Rows in date order.
    pub transactions: Vec<ledger_txns::Model>,
}

/// A written transaction row and the ledger after it.
#[derive(Debug, Clone, Serialize)]
pub struct PostedTransaction {
    /// The row.
    pub transaction: ledger_txns::Model,
    /// The ledger with its new position.
    pub ledger: purchase_sales::Model,
}

/// Result of completing a ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerCompletion {
    /// The completed ledger.
    pub ledger: purchase_sales::Model,
    /// The revenue expense holding the collected balance.
    pub expense: expenses::Model,
}

/// Purchase & sale ledger repository.
#[derive(Debug, Clone)]
pub struct PurchaseSaleRepository {
    db: DatabaseConnection,
}

impl PurchaseSaleRepository {
    /// Creates a new purchase & sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists ledgers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: LedgerFilter,
    ) -> Result<Vec<purchase_sales::Model>, PurchaseSaleError> {
        let mut query = purchase_sales::Entity::find()
            .order_by_desc(purchase_sales::Column::StartDate)
            .order_by_desc(purchase_sales::Column::CreatedAt);

        if let Some(vehicle_id) = filter.vehicle_id {
            query = query.filter(purchase_sales::Column::VehicleId.eq(vehicle_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(purchase_sales::Column::Status.eq(LedgerStatus::from(status)));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a ledger by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<purchase_sales::Model, PurchaseSaleError> {
        load_ledger(&self.db, id).await
    }

    /// Loads a ledger with its rows.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_with_transactions(
        &self,
        id: Uuid,
    ) -> Result<LedgerWithTransactions, PurchaseSaleError> {
        let ledger = load_ledger(&self.db, id).await?;
        let transactions = load_rows(&self.db, id).await?;
        Ok(LedgerWithTransactions {
            ledger,
            transactions,
        })
    }

    /// Lists the rows of a ledger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn list_transactions(
        &self,
        id: Uuid,
    ) -> Result<Vec<ledger_txns::Model>, PurchaseSaleError> {
        load_ledger(&self.db, id).await?;
        Ok(load_rows(&self.db, id).await?)
    }

    /// Opens a ledger at its opening balance with no tins.
    ///
    /// # Errors
    ///
    /// Returns `BlankTitle`, `Ledger(NegativeOpeningBalance)`,
    /// `VehicleNotFound` or a database error.
    pub async fn create(
        &self,
        input: CreateLedgerInput,
    ) -> Result<purchase_sales::Model, PurchaseSaleError> {
        let title = non_blank(&input.title)?;
        let position = LedgerPosition::opening(input.opening_balance)?;
        self.ensure_vehicle(input.vehicle_id).await?;

        let now = chrono::Utc::now().into();
        let ledger = purchase_sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            vehicle_id: Set(input.vehicle_id),
            title: Set(title),
            start_date: Set(input.start_date),
            opening_balance: Set(input.opening_balance),
            current_balance: Set(position.balance),
            current_tins: Set(position.tins),
            status: Set(LedgerStatus::Active),
            completed_at: Set(None),
            completion_expense_id: Set(None),
            notes: Set(clean(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let ledger = ledger.insert(&self.db).await?;
        tracing::info!(
            ledger_id = %ledger.id,
            vehicle_id = %ledger.vehicle_id,
            opening_balance = %ledger.opening_balance,
            "Purchase & sale ledger opened"
        );
        Ok(ledger)
    }

    /// Edits a ledger header. Changing the opening balance rebases the
    /// current balance and is refused on completed ledgers.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `BlankTitle`, `VehicleNotFound`, `Ledger` or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateLedgerInput,
    ) -> Result<purchase_sales::Model, PurchaseSaleError> {
        let title = input.title.as_deref().map(non_blank).transpose()?;
        if let Some(vehicle_id) = input.vehicle_id {
            self.ensure_vehicle(vehicle_id).await?;
        }

        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;

        let rebased = match input.opening_balance {
            Some(opening) if opening != ledger.opening_balance => {
                rules::ensure_active(ledger.status.into())?;
                let position = ledger
                    .position()
                    .rebase_opening(ledger.opening_balance, opening)
                    .inspect_err(|e| warn_rejected(id, e))?;
                Some((opening, position))
            }
            _ => None,
        };

        let mut active: purchase_sales::ActiveModel = ledger.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(vehicle_id) = input.vehicle_id {
            active.vehicle_id = Set(vehicle_id);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        if let Some((opening, position)) = rebased {
            active.opening_balance = Set(opening);
            active.current_balance = Set(position.balance);
            active.current_tins = Set(position.tins);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let ledger = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(ledger_id = %id, balance = %ledger.current_balance, "Purchase & sale ledger updated");
        Ok(ledger)
    }

    /// Deletes an active ledger and its rows.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Ledger(LedgerCompleted)` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), PurchaseSaleError> {
        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        rules::ensure_active(ledger.status.into()).inspect_err(|e| warn_rejected(id, e))?;

        ledger_txns::Entity::delete_many()
            .filter(ledger_txns::Column::PurchaseSaleId.eq(id))
            .exec(&txn)
            .await?;
        purchase_sales::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(ledger_id = %id, "Purchase & sale ledger deleted");
        Ok(())
    }

    /// Adds a purchase, sale or expense row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Ledger` (invalid row, completed ledger, or a
    /// balance/tin count that would go negative) or a database error.
    pub async fn add_transaction(
        &self,
        id: Uuid,
        input: CreateLedgerTransactionInput,
    ) -> Result<PostedTransaction, PurchaseSaleError> {
        rules::validate_transaction(input.kind, input.amount, input.tins)?;
        rules::validate_rate(input.rate)?;

        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        rules::ensure_active(ledger.status.into())?;

        let effect = TransactionEffect::of(input.kind, input.amount, input.tins);
        let position = ledger
            .position()
            .apply(effect)
            .inspect_err(|e| warn_rejected(id, e))?;

        let now = chrono::Utc::now().into();
        let row = ledger_txns::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_sale_id: Set(id),
            kind: Set(input.kind.into()),
            amount: Set(input.amount),
            tins: Set(input.tins),
            rate: Set(input.rate),
            description: Set(clean(input.description)),
            transaction_date: Set(input.transaction_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let row = row.insert(&txn).await?;
        let ledger = store_position(&txn, ledger, position).await?;
        txn.commit().await?;

        tracing::info!(
            ledger_id = %id,
            transaction_id = %row.id,
            kind = %input.kind,
            amount = %row.amount,
            tins = row.tins,
            balance = %ledger.current_balance,
            "Ledger transaction added"
        );
        Ok(PostedTransaction {
            transaction: row,
            ledger,
        })
    }

    /// Edits a row: its old effect is swapped for the new one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `TransactionNotFound`, `Ledger` or a database error.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        transaction_id: Uuid,
        input: UpdateLedgerTransactionInput,
    ) -> Result<PostedTransaction, PurchaseSaleError> {
        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        rules::ensure_active(ledger.status.into())?;
        let row = load_row(&txn, id, transaction_id).await?;

        let kind = input.kind.unwrap_or_else(|| row.kind.into());
        let amount = input.amount.unwrap_or(row.amount);
        let tins = input.tins.unwrap_or(row.tins);
        rules::validate_transaction(kind, amount, tins)?;
        rules::validate_rate(input.rate.flatten())?;

        let position = ledger
            .position()
            .replace(row.effect(), TransactionEffect::of(kind, amount, tins))
            .inspect_err(|e| warn_rejected(id, e))?;

        let mut active: ledger_txns::ActiveModel = row.into();
        active.kind = Set(sea_orm_active_enums::LedgerTransactionKind::from(kind));
        active.amount = Set(amount);
        active.tins = Set(tins);
        if let Some(rate) = input.rate {
            active.rate = Set(rate);
        }
        if let Some(description) = input.description {
            active.description = Set(clean(description));
        }
        if let Some(date) = input.transaction_date {
            active.transaction_date = Set(date);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let row = active.update(&txn).await?;
        let ledger = store_position(&txn, ledger, position).await?;
        txn.commit().await?;

        tracing::info!(
            ledger_id = %id,
            transaction_id = %transaction_id,
            balance = %ledger.current_balance,
            tins = ledger.current_tins,
            "Ledger transaction updated"
        );
        Ok(PostedTransaction {
            transaction: row,
            ledger,
        })
    }

    /// Deletes a row and reverts its effect.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `TransactionNotFound`, `Ledger` or a database error.
    pub async fn delete_transaction(
        &self,
        id: Uuid,
        transaction_id: Uuid,
    ) -> Result<purchase_sales::Model, PurchaseSaleError> {
        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        rules::ensure_active(ledger.status.into())?;
        let row = load_row(&txn, id, transaction_id).await?;

        let position = ledger
            .position()
            .revert(row.effect())
            .inspect_err(|e| warn_rejected(id, e))?;

        ledger_txns::Entity::delete_by_id(transaction_id)
            .exec(&txn)
            .await?;
        let ledger = store_position(&txn, ledger, position).await?;
        txn.commit().await?;

        tracing::info!(
            ledger_id = %id,
            transaction_id = %transaction_id,
            balance = %ledger.current_balance,
            "Ledger transaction deleted"
        );
        Ok(ledger)
    }

    /// Complete collection: books the current balance as a revenue expense
    /// and freezes the ledger. Balance and tins stay as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Ledger(AlreadyCompleted | NothingToCollect)` or a
    /// database error.
    pub async fn complete(
        &self,
        id: Uuid,
        completed_by: Option<Uuid>,
    ) -> Result<LedgerCompletion, PurchaseSaleError> {
        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        let plan = rules::plan_completion(ledger.status.into(), ledger.position(), &ledger.title)
            .inspect_err(|e| warn_rejected(id, e))?;

        let now = chrono::Utc::now();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(plan.title.clone()),
            amount: Set(plan.amount),
            expense_type: Set(plan.expense_type.into()),
            category_id: Set(None),
            vehicle_id: Set(Some(ledger.vehicle_id)),
            trip_id: Set(None),
            purchase_sale_id: Set(Some(id)),
            expense_date: Set(now.date_naive()),
            notes: Set(Some(plan.notes())),
            created_by: Set(completed_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let expense = expense.insert(&txn).await?;

        let mut active: purchase_sales::ActiveModel = ledger.into();
        active.status = Set(LedgerStatus::Completed);
        active.completed_at = Set(Some(now.into()));
        active.completion_expense_id = Set(Some(expense.id));
        active.updated_at = Set(now.into());
        let ledger = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            ledger_id = %id,
            expense_id = %expense.id,
            amount = %expense.amount,
            "Purchase & sale ledger completed"
        );
        Ok(LedgerCompletion { ledger, expense })
    }

    /// Undoes a completion: removes the revenue expense and reopens the ledger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Ledger(NotCompleted)` or a database error.
    pub async fn undo_complete(
        &self,
        id: Uuid,
    ) -> Result<purchase_sales::Model, PurchaseSaleError> {
        let txn = self.db.begin().await?;
        let ledger = load_ledger(&txn, id).await?;
        rules::plan_undo(ledger.status.into()).inspect_err(|e| warn_rejected(id, e))?;

        let mut active: purchase_sales::ActiveModel = ledger.into();
        active.status = Set(LedgerStatus::Active);
        active.completed_at = Set(None);
        active.completion_expense_id = Set(None);
        active.updated_at = Set(chrono::Utc::now().into());
        let ledger = active.update(&txn).await?;

        let removed = expenses::Entity::delete_many()
            .filter(expenses::Column::PurchaseSaleId.eq(id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(
            ledger_id = %id,
            expenses_removed = removed.rows_affected,
            "Purchase & sale ledger completion undone"
        );
        Ok(ledger)
    }

    /// Recomputes the position from the rows and compares it with the stored one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn verify(&self, id: Uuid) -> Result<LedgerVerification, PurchaseSaleError> {
        let ledger = load_ledger(&self.db, id).await?;
        let rows = load_rows(&self.db, id).await?;

        let verification = rules::verify(
            ledger.opening_balance,
            ledger.position(),
            rows.iter().map(ledger_txns::Model::effect),
        );
        if !verification.consistent {
            tracing::warn!(
                ledger_id = %id,
                stored = ?verification.stored,
                recomputed = ?verification.recomputed,
                "Ledger position does not match its transactions"
            );
        }
        Ok(verification)
    }

    async fn ensure_vehicle(&self, vehicle_id: Uuid) -> Result<(), PurchaseSaleError> {
        vehicles::Entity::find_by_id(vehicle_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(PurchaseSaleError::VehicleNotFound(vehicle_id))
    }
}

fn non_blank(title: &str) -> Result<String, PurchaseSaleError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PurchaseSaleError::BlankTitle);
    }
    Ok(title.to_string())
}

fn warn_rejected(ledger_id: Uuid, error: &LedgerError) {
    tracing::warn!(ledger_id = %ledger_id, error = %error, "Ledger operation rejected");
}

async fn load_ledger<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<purchase_sales::Model, PurchaseSaleError> {
    purchase_sales::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(PurchaseSaleError::NotFound(id))
}

async fn load_row<C: ConnectionTrait>(
    conn: &C,
    ledger_id: Uuid,
    transaction_id: Uuid,
) -> Result<ledger_txns::Model, PurchaseSaleError> {
    ledger_txns::Entity::find_by_id(transaction_id)
        .filter(ledger_txns::Column::PurchaseSaleId.eq(ledger_id))
        .one(conn)
        .await?
        .ok_or(PurchaseSaleError::TransactionNotFound(transaction_id))
}

async fn load_rows<C: ConnectionTrait>(
    conn: &C,
    ledger_id: Uuid,
) -> Result<Vec<ledger_txns::Model>, DbErr> {
    ledger_txns::Entity::find()
        .filter(ledger_txns::Column::PurchaseSaleId.eq(ledger_id))
        .order_by_asc(ledger_txns::Column::TransactionDate)
        .order_by_asc(ledger_txns::Column::CreatedAt)
        .all(conn)
        .await
}

async fn store_position<C: ConnectionTrait>(
    conn: &C,
    ledger: purchase_sales::Model,
    position: LedgerPosition,
) -> Result<purchase_sales::Model, DbErr> {
    let mut active: purchase_sales::ActiveModel = ledger.into();
    active.current_balance = Set(position.balance);
    active.current_tins = Set(position.tins);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await
}
