//! Dashboard repository.
//!
//! Loads the raw figures and hands them to `fleetbook_core::dashboard` for
//! aggregation.

use fleetbook_core::dashboard::{
    DashboardSummary, EntityCounts, ExpenseTotals, LedgerSummary, RecentExpense, TripSummary,
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::{
    branches, categories, expenses, purchase_sales,
    sea_orm_active_enums::{ExpenseType, TripStatus},
    trips, vehicles,
};

/// Number of expenses in the recent list.
pub const RECENT_EXPENSES: u64 = 10;

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Dashboard repository for summary queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        Ok(DashboardSummary {
            counts: self.entity_counts().await?,
            expenses: self.expense_totals().await?,
            trips: self.trip_summary().await?,
            ledgers: self.ledger_summary().await?,
            recent_expenses: self.recent_expenses(RECENT_EXPENSES).await?,
        })
    }

    /// Counts master data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entity_counts(&self) -> Result<EntityCounts, DashboardError> {
        Ok(EntityCounts {
            branches: branches::Entity::find().count(&self.db).await?,
            vehicles: vehicles::Entity::find().count(&self.db).await?,
            active_vehicles: vehicles::Entity::find()
                .filter(vehicles::Column::IsActive.eq(true))
                .count(&self.db)
                .await?,
            categories: categories::Entity::find().count(&self.db).await?,
        })
    }

    /// Totals all expenses by type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expense_totals(&self) -> Result<ExpenseTotals, DashboardError> {
        let rows: Vec<(ExpenseType, Decimal)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::ExpenseType)
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ExpenseTotals::from_rows(
            rows.into_iter().map(|(t, amount)| (t.into(), amount)),
        ))
    }

    /// Totals all trips.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trip_summary(&self) -> Result<TripSummary, DashboardError> {
        let trips = trips::Entity::find().all(&self.db).await?;

        Ok(TripSummary::from_trips(trips.iter().map(|trip| {
            (trip.status == TripStatus::Completed, trip.totals())
        })))
    }

    /// Totals all purchase & sale ledgers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_summary(&self) -> Result<LedgerSummary, DashboardError> {
        let ledgers = purchase_sales::Entity::find().all(&self.db).await?;

        Ok(LedgerSummary::from_ledgers(
            ledgers
                .iter()
                .map(|ledger| (ledger.status.into(), ledger.position())),
        ))
    }

    /// Latest expenses by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent_expenses(&self, limit: u64) -> Result<Vec<RecentExpense>, DashboardError> {
        let rows = expenses::Entity::find()
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|e| RecentExpense {
                id: e.id,
                title: e.title,
                amount: e.amount,
                expense_type: e.expense_type.into(),
                expense_date: e.expense_date,
            })
            .collect())
    }
}
