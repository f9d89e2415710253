//! Trip repository.
//!
//! Trips store the totals of their purchase lines and expenses. Every write
//! that touches either goes through [`refresh_trip_totals`] in the same
//! database transaction.

use chrono::NaiveDate;
use fleetbook_core::trip::{self as rules, TripTotals};
use fleetbook_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::clean;
use crate::entities::{
    expenses, purchases, sea_orm_active_enums::TripStatus, trips, vehicles,
};

/// Error types for trip operations.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    /// Trip not found.
    #[error("Trip not found: {0}")]
    NotFound(Uuid),

    /// Referenced vehicle not found.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] rules::TripError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a trip.
#[derive(Debug, Clone)]
pub struct CreateTripInput {
    /// Vehicle running the trip.
    pub vehicle_id: Uuid,
    /// Title.
    pub title: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date, if already known.
    pub end_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
}

/// Input for updating a trip.
#[derive(Debug, Clone, Default)]
pub struct UpdateTripInput {
    /// Vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Title.
    pub title: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date; `Some(None)` clears it.
    pub end_date: Option<Option<NaiveDate>>,
    /// Status (allows reopening a completed trip).
    pub status: Option<rules::TripStatus>,
    /// Notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

/// Filter options for listing trips.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    /// Only trips of this vehicle.
    pub vehicle_id: Option<Uuid>,
    /// Only trips with this status.
    pub status: Option<rules::TripStatus>,
}

/// A trip with its lines and expenses.
#[derive(Debug, Clone, Serialize)]
pub struct TripDetails {
    /// The trip.
    #[serde(flatten)]
    pub trip: trips::Model,
    /// Purchase/sale lines in date order.
    pub purchases: Vec<purchases::Model>,
    /// Expenses booked on the trip.
    pub expenses: Vec<expenses::Model>,
}

/// Recomputes and stores the totals of a trip.
///
/// Returns `None` if the trip does not exist.
pub(crate) async fn refresh_trip_totals<C: ConnectionTrait>(
    conn: &C,
    trip_id: Uuid,
) -> Result<Option<trips::Model>, DbErr> {
    let Some(trip) = trips::Entity::find_by_id(trip_id).one(conn).await? else {
        return Ok(None);
    };

    let lines: Vec<_> = purchases::Entity::find()
        .filter(purchases::Column::TripId.eq(trip_id))
        .all(conn)
        .await?
        .iter()
        .map(purchases::Model::line)
        .collect();

    let expense_amounts: Vec<Decimal> = expenses::Entity::find()
        .filter(expenses::Column::TripId.eq(trip_id))
        .select_only()
        .column(expenses::Column::Amount)
        .into_tuple()
        .all(conn)
        .await?;

    let totals = TripTotals::compute(&lines, expense_amounts);

    let mut active: trips::ActiveModel = trip.into();
    active.total_purchase_quantity = Set(totals.total_purchase_quantity);
    active.total_purchase_amount = Set(totals.total_purchase_amount);
    active.total_sale_quantity = Set(totals.total_sale_quantity);
    active.total_sale_amount = Set(totals.total_sale_amount);
    active.total_expense_amount = Set(totals.total_expense_amount);
    active.profit_loss = Set(totals.profit_loss);
    active.updated_at = Set(chrono::Utc::now().into());

    let trip = active.update(conn).await?;
    tracing::debug!(trip_id = %trip_id, profit_loss = %trip.profit_loss, "Trip totals refreshed");
    Ok(Some(trip))
}

/// Trip repository.
#[derive(Debug, Clone)]
pub struct TripRepository {
    db: DatabaseConnection,
}

impl TripRepository {
    /// Creates a new trip repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists trips, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: TripFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<trips::Model>, TripError> {
        let mut query = trips::Entity::find();
        if let Some(vehicle_id) = filter.vehicle_id {
            query = query.filter(trips::Column::VehicleId.eq(vehicle_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(trips::Column::Status.eq(TripStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(trips::Column::StartDate)
            .order_by_desc(trips::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Finds a trip by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<trips::Model, TripError> {
        trips::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TripError::NotFound(id))
    }

    /// Loads a trip with its purchase lines and expenses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_details(&self, id: Uuid) -> Result<TripDetails, TripError> {
        let trip = self.find_by_id(id).await?;

        let purchases = purchases::Entity::find()
            .filter(purchases::Column::TripId.eq(id))
            .order_by_asc(purchases::Column::PurchaseDate)
            .order_by_asc(purchases::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::TripId.eq(id))
            .order_by_asc(expenses::Column::ExpenseDate)
            .all(&self.db)
            .await?;

        Ok(TripDetails {
            trip,
            purchases,
            expenses,
        })
    }

    /// Creates an ongoing trip with zero totals.
    ///
    /// # Errors
    ///
    /// Returns `Rule` for invalid fields, `VehicleNotFound`, or a database error.
    pub async fn create(&self, input: CreateTripInput) -> Result<trips::Model, TripError> {
        rules::validate_trip(&input.title, input.start_date, input.end_date)?;
        self.ensure_vehicle(input.vehicle_id).await?;

        let now = chrono::Utc::now().into();
        let trip = trips::ActiveModel {
            id: Set(Uuid::new_v4()),
            vehicle_id: Set(input.vehicle_id),
            title: Set(input.title.trim().to_string()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(TripStatus::Ongoing),
            notes: Set(clean(input.notes)),
            total_purchase_quantity: Set(Decimal::ZERO),
            total_purchase_amount: Set(Decimal::ZERO),
            total_sale_quantity: Set(Decimal::ZERO),
            total_sale_amount: Set(Decimal::ZERO),
            total_expense_amount: Set(Decimal::ZERO),
            profit_loss: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let trip = trip.insert(&self.db).await?;
        tracing::info!(trip_id = %trip.id, vehicle_id = %trip.vehicle_id, "Trip created");
        Ok(trip)
    }

    /// Updates trip header fields. Totals are not touched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `VehicleNotFound`, `Rule` or a database error.
    pub async fn update(&self, id: Uuid, input: UpdateTripInput) -> Result<trips::Model, TripError> {
        let trip = self.find_by_id(id).await?;

        let title = input.title.unwrap_or_else(|| trip.title.clone());
        let start_date = input.start_date.unwrap_or(trip.start_date);
        let end_date = input.end_date.unwrap_or(trip.end_date);
        rules::validate_trip(&title, start_date, end_date)?;

        if let Some(vehicle_id) = input.vehicle_id {
            self.ensure_vehicle(vehicle_id).await?;
        }

        let mut active: trips::ActiveModel = trip.into();
        active.title = Set(title.trim().to_string());
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        if let Some(vehicle_id) = input.vehicle_id {
            active.vehicle_id = Set(vehicle_id);
        }
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Marks a trip completed, setting the end date to today if absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule(TripCompleted)` or a database error.
    pub async fn complete(&self, id: Uuid) -> Result<trips::Model, TripError> {
        let trip = self.find_by_id(id).await?;
        rules::ensure_open(trip.status.into())?;

        let today = chrono::Utc::now().date_naive();
        let end_date = trip.end_date.unwrap_or_else(|| today.max(trip.start_date));

        let mut active: trips::ActiveModel = trip.into();
        active.status = Set(TripStatus::Completed);
        active.end_date = Set(Some(end_date));
        active.updated_at = Set(chrono::Utc::now().into());

        let trip = active.update(&self.db).await?;
        tracing::info!(trip_id = %id, profit_loss = %trip.profit_loss, "Trip completed");
        Ok(trip)
    }

    /// Deletes a trip and its purchase lines. Expenses lose the trip reference.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), TripError> {
        let txn = self.db.begin().await?;

        purchases::Entity::delete_many()
            .filter(purchases::Column::TripId.eq(id))
            .exec(&txn)
            .await?;
        let result = trips::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(TripError::NotFound(id));
        }

        txn.commit().await?;
        tracing::info!(trip_id = %id, "Trip deleted");
        Ok(())
    }

    async fn ensure_vehicle(&self, vehicle_id: Uuid) -> Result<(), TripError> {
        vehicles::Entity::find_by_id(vehicle_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(TripError::VehicleNotFound(vehicle_id))
    }
}
