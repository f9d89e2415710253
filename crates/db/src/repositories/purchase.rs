//! Purchase line repository.
//!
//! A purchase line records fuel bought on a trip and the part of it sold on.
//! Each write refreshes the owning trip's totals in the same transaction.

use chrono::NaiveDate;
use fleetbook_core::trip::{self as rules, PurchaseLine};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::clean;
use super::trip::refresh_trip_totals;
use crate::entities::{purchases, trips};

/// Error types for purchase line operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// Purchase line not found.
    #[error("Purchase not found: {0}")]
    NotFound(Uuid),

    /// Owning trip not found.
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] rules::TripError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for adding a purchase line.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Supplier.
    pub supplier: Option<String>,
    /// Quantity bought.
    pub quantity: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
    /// Customer the fuel was sold to.
    pub customer: Option<String>,
    /// Quantity sold.
    pub sale_quantity: Decimal,
    /// Sale rate per unit.
    pub sale_rate: Decimal,
    /// Notes.
    pub notes: Option<String>,
}

/// Input for editing a purchase line.
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseInput {
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Supplier; `Some(None)` clears it.
    pub supplier: Option<Option<String>>,
    /// Quantity bought.
    pub quantity: Option<Decimal>,
    /// Rate per unit.
    pub rate: Option<Decimal>,
    /// Customer; `Some(None)` clears it.
    pub customer: Option<Option<String>>,
    /// Quantity sold.
    pub sale_quantity: Option<Decimal>,
    /// Sale rate per unit.
    pub sale_rate: Option<Decimal>,
    /// Notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

/// Purchase line repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the lines of a trip in date order.
    ///
    /// # Errors
    ///
    /// Returns `TripNotFound` or a database error.
    pub async fn list_for_trip(&self, trip_id: Uuid) -> Result<Vec<purchases::Model>, PurchaseError> {
        trips::Entity::find_by_id(trip_id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseError::TripNotFound(trip_id))?;

        Ok(purchases::Entity::find()
            .filter(purchases::Column::TripId.eq(trip_id))
            .order_by_asc(purchases::Column::PurchaseDate)
            .order_by_asc(purchases::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Adds a line to an ongoing trip.
    ///
    /// # Errors
    ///
    /// Returns `TripNotFound`, `Rule` (invalid amounts or completed trip),
    /// or a database error.
    pub async fn create(
        &self,
        trip_id: Uuid,
        input: CreatePurchaseInput,
    ) -> Result<purchases::Model, PurchaseError> {
        let line = PurchaseLine::new(
            input.quantity,
            input.rate,
            input.sale_quantity,
            input.sale_rate,
        )?;

        let txn = self.db.begin().await?;

        let trip = trips::Entity::find_by_id(trip_id)
            .one(&txn)
            .await?
            .ok_or(PurchaseError::TripNotFound(trip_id))?;
        rules::ensure_open(trip.status.into())?;

        let now = chrono::Utc::now().into();
        let purchase = purchases::ActiveModel {
            id: Set(Uuid::new_v4()),
            trip_id: Set(trip_id),
            purchase_date: Set(input.purchase_date),
            supplier: Set(clean(input.supplier)),
            quantity: Set(line.quantity),
            rate: Set(line.rate),
            amount: Set(line.amount),
            customer: Set(clean(input.customer)),
            sale_quantity: Set(line.sale_quantity),
            sale_rate: Set(line.sale_rate),
            sale_amount: Set(line.sale_amount),
            notes: Set(clean(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let purchase = purchase.insert(&txn).await?;

        refresh_trip_totals(&txn, trip_id).await?;
        txn.commit().await?;

        tracing::info!(purchase_id = %purchase.id, trip_id = %trip_id, amount = %purchase.amount, "Purchase line added");
        Ok(purchase)
    }

    /// Edits a line and re-derives its amounts.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule` or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePurchaseInput,
    ) -> Result<purchases::Model, PurchaseError> {
        let txn = self.db.begin().await?;

        let purchase = purchases::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;
        let trip_id = purchase.trip_id;

        let line = PurchaseLine::new(
            input.quantity.unwrap_or(purchase.quantity),
            input.rate.unwrap_or(purchase.rate),
            input.sale_quantity.unwrap_or(purchase.sale_quantity),
            input.sale_rate.unwrap_or(purchase.sale_rate),
        )?;

        let mut active: purchases::ActiveModel = purchase.into();
        if let Some(purchase_date) = input.purchase_date {
            active.purchase_date = Set(purchase_date);
        }
        if let Some(supplier) = input.supplier {
            active.supplier = Set(clean(supplier));
        }
        if let Some(customer) = input.customer {
            active.customer = Set(clean(customer));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        active.quantity = Set(line.quantity);
        active.rate = Set(line.rate);
        active.amount = Set(line.amount);
        active.sale_quantity = Set(line.sale_quantity);
        active.sale_rate = Set(line.sale_rate);
        active.sale_amount = Set(line.sale_amount);
        active.updated_at = Set(chrono::Utc::now().into());
        let purchase = active.update(&txn).await?;

        refresh_trip_totals(&txn, trip_id).await?;
        txn.commit().await?;

        tracing::info!(purchase_id = %id, trip_id = %trip_id, "Purchase line updated");
        Ok(purchase)
    }

    /// Deletes a line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), PurchaseError> {
        let txn = self.db.begin().await?;

        let purchase = purchases::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;
        let trip_id = purchase.trip_id;

        purchases::Entity::delete_by_id(id).exec(&txn).await?;
        refresh_trip_totals(&txn, trip_id).await?;
        txn.commit().await?;

        tracing::info!(purchase_id = %id, trip_id = %trip_id, "Purchase line deleted");
        Ok(())
    }
}
