//! Expense repository.

use chrono::NaiveDate;
use fleetbook_core::expense::{self as rules, ExpenseType};
use fleetbook_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::clean;
use super::trip::refresh_trip_totals;
use crate::entities::{categories, expenses, sea_orm_active_enums, trips, vehicles};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Referenced category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Referenced vehicle not found.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(Uuid),

    /// Referenced trip not found.
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    /// The expense was generated by completing a purchase & sale ledger.
    #[error("Expense belongs to purchase & sale ledger {0}; undo the completion instead")]
    OwnedByLedger(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] rules::ExpenseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Title.
    pub title: String,
    /// Amount (> 0).
    pub amount: Decimal,
    /// Classification.
    pub expense_type: ExpenseType,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Trip; its totals are refreshed.
    pub trip_id: Option<Uuid>,
    /// Date of the expense.
    pub expense_date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
    /// Creating user.
    pub created_by: Option<Uuid>,
}

/// Input for updating an expense.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// Title.
    pub title: Option<String>,
    /// Amount.
    pub amount: Option<Decimal>,
    /// Classification.
    pub expense_type: Option<ExpenseType>,
    /// Category; `Some(None)` clears it.
    pub category_id: Option<Option<Uuid>>,
    /// Vehicle; `Some(None)` clears it.
    pub vehicle_id: Option<Option<Uuid>>,
    /// Trip; `Some(None)` detaches it.
    pub trip_id: Option<Option<Uuid>>,
    /// Date.
    pub expense_date: Option<NaiveDate>,
    /// Notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

/// Filter options for listing expenses.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Classification.
    pub expense_type: Option<ExpenseType>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Trip.
    pub trip_id: Option<Uuid>,
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ExpenseFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<expenses::Model>, ExpenseError> {
        let mut query = expenses::Entity::find();

        if let Some(expense_type) = filter.expense_type {
            query = query.filter(
                expenses::Column::ExpenseType
                    .eq(sea_orm_active_enums::ExpenseType::from(expense_type)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }
        if let Some(vehicle_id) = filter.vehicle_id {
            query = query.filter(expenses::Column::VehicleId.eq(vehicle_id));
        }
        if let Some(trip_id) = filter.trip_id {
            query = query.filter(expenses::Column::TripId.eq(trip_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(expenses::Column::ExpenseDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(expenses::Column::ExpenseDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Finds an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<expenses::Model, ExpenseError> {
        expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// Creates an expense and refreshes the totals of its trip.
    ///
    /// # Errors
    ///
    /// Returns `Rule`, a `...NotFound` for a missing reference, or a database error.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<expenses::Model, ExpenseError> {
        rules::validate_expense(&input.title, input.amount)?;
        self.ensure_references(input.category_id, input.vehicle_id, input.trip_id)
            .await?;

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title.trim().to_string()),
            amount: Set(input.amount),
            expense_type: Set(input.expense_type.into()),
            category_id: Set(input.category_id),
            vehicle_id: Set(input.vehicle_id),
            trip_id: Set(input.trip_id),
            purchase_sale_id: Set(None),
            expense_date: Set(input.expense_date),
            notes: Set(clean(input.notes)),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let expense = expense.insert(&txn).await?;

        if let Some(trip_id) = expense.trip_id {
            refresh_trip_totals(&txn, trip_id).await?;
        }
        txn.commit().await?;

        tracing::info!(
            expense_id = %expense.id,
            expense_type = ?expense.expense_type,
            amount = %expense.amount,
            "Expense created"
        );
        Ok(expense)
    }

    /// Updates an expense. Ledger completion expenses are read-only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `OwnedByLedger`, `Rule`, a missing reference, or a
    /// database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        let expense = self.find_by_id(id).await?;
        if let Some(ledger_id) = expense.purchase_sale_id {
            tracing::warn!(expense_id = %id, ledger_id = %ledger_id, "Refusing to edit ledger completion expense");
            return Err(ExpenseError::OwnedByLedger(ledger_id));
        }

        let title = input.title.unwrap_or_else(|| expense.title.clone());
        let amount = input.amount.unwrap_or(expense.amount);
        rules::validate_expense(&title, amount)?;

        let category_id = input.category_id.unwrap_or(expense.category_id);
        let vehicle_id = input.vehicle_id.unwrap_or(expense.vehicle_id);
        let trip_id = input.trip_id.unwrap_or(expense.trip_id);
        self.ensure_references(
            input.category_id.flatten(),
            input.vehicle_id.flatten(),
            input.trip_id.flatten(),
        )
        .await?;

        let old_trip_id = expense.trip_id;
        let mut active: expenses::ActiveModel = expense.into();
        active.title = Set(title.trim().to_string());
        active.amount = Set(amount);
        if let Some(expense_type) = input.expense_type {
            active.expense_type = Set(expense_type.into());
        }
        active.category_id = Set(category_id);
        active.vehicle_id = Set(vehicle_id);
        active.trip_id = Set(trip_id);
        if let Some(expense_date) = input.expense_date {
            active.expense_date = Set(expense_date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let txn = self.db.begin().await?;
        let expense = active.update(&txn).await?;

        if let Some(old) = old_trip_id
            && old_trip_id != trip_id
        {
            refresh_trip_totals(&txn, old).await?;
        }
        if let Some(trip_id) = trip_id {
            refresh_trip_totals(&txn, trip_id).await?;
        }
        txn.commit().await?;

        tracing::info!(expense_id = %id, "Expense updated");
        Ok(expense)
    }

    /// Deletes an expense. Ledger completion expenses are refused.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `OwnedByLedger` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), ExpenseError> {
        let expense = self.find_by_id(id).await?;
        if let Some(ledger_id) = expense.purchase_sale_id {
            tracing::warn!(expense_id = %id, ledger_id = %ledger_id, "Refusing to delete ledger completion expense");
            return Err(ExpenseError::OwnedByLedger(ledger_id));
        }

        let txn = self.db.begin().await?;
        expenses::Entity::delete_by_id(id).exec(&txn).await?;
        if let Some(trip_id) = expense.trip_id {
            refresh_trip_totals(&txn, trip_id).await?;
        }
        txn.commit().await?;

        tracing::info!(expense_id = %id, "Expense deleted");
        Ok(())
    }

    async fn ensure_references(
        &self,
        category_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        trip_id: Option<Uuid>,
    ) -> Result<(), ExpenseError> {
        if let Some(id) = category_id
            && categories::Entity::find_by_id(id).one(&self.db).await?.is_none()
        {
            return Err(ExpenseError::CategoryNotFound(id));
        }
        if let Some(id) = vehicle_id
            && vehicles::Entity::find_by_id(id).one(&self.db).await?.is_none()
        {
            return Err(ExpenseError::VehicleNotFound(id));
        }
        if let Some(id) = trip_id
            && trips::Entity::find_by_id(id).one(&self.db).await?.is_none()
        {
            return Err(ExpenseError::TripNotFound(id));
        }
        Ok(())
    }
}
