//! Report repository.
//!
//! Fetches the rows a report needs and delegates the grouping to
//! `fleetbook_core::reports::ReportService`.

use std::collections::HashMap;

use chrono::NaiveDate;
use fleetbook_core::reports::{
    DateRange, ExpenseRow, GroupedExpenseReport, MonthlyExpenseReport, ReportService,
    TripProfitReport,
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Select,
};
use uuid::Uuid;

use crate::entities::{categories, expenses, sea_orm_active_enums::ExpenseType, trips, vehicles};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Invalid report parameters.
    #[error(transparent)]
    Params(#[from] fleetbook_core::reports::ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

type ExpenseTuple = (ExpenseType, Decimal, NaiveDate, Option<Uuid>, Option<Uuid>);

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Expenses grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn expenses_by_category(
        &self,
        range: DateRange,
    ) -> Result<GroupedExpenseReport, ReportError> {
        let rows = self.expense_rows(range).await?;
        let names: HashMap<Uuid, String> = categories::Entity::find()
            .select_only()
            .column(categories::Column::Id)
            .column(categories::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(ReportService::expenses_by_category(&rows, &names, range))
    }

    /// Expenses grouped by vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn expenses_by_vehicle(
        &self,
        range: DateRange,
    ) -> Result<GroupedExpenseReport, ReportError> {
        let rows = self.expense_rows(range).await?;
        let names = self.vehicle_names().await?;

        Ok(ReportService::expenses_by_vehicle(&rows, &names, range))
    }

    /// Monthly expense buckets for one year.
    ///
    /// # Errors
    ///
    /// Returns `Params` for an unsupported year, or a database error.
    pub async fn monthly_expenses(&self, year: i32) -> Result<MonthlyExpenseReport, ReportError> {
        let range = DateRange::year(year)?;
        let rows = self.expense_rows(range).await?;

        Ok(ReportService::monthly_expenses(&rows, year))
    }

    /// Trip profit per vehicle, filtered on trip start date.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn trip_profit_by_vehicle(
        &self,
        range: DateRange,
    ) -> Result<TripProfitReport, ReportError> {
        let mut query = trips::Entity::find();
        if let Some(from) = range.from {
            query = query.filter(trips::Column::StartDate.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(trips::Column::StartDate.lte(to));
        }

        let trips: Vec<_> = query
            .all(&self.db)
            .await?
            .iter()
            .map(|trip| (trip.vehicle_id, trip.totals()))
            .collect();
        let names = self.vehicle_names().await?;

        Ok(ReportService::trip_profit_by_vehicle(&trips, &names, range))
    }

    async fn expense_rows(&self, range: DateRange) -> Result<Vec<ExpenseRow>, DbErr> {
        let rows: Vec<ExpenseTuple> = filtered_expenses(range)
            .select_only()
            .column(expenses::Column::ExpenseType)
            .column(expenses::Column::Amount)
            .column(expenses::Column::ExpenseDate)
            .column(expenses::Column::CategoryId)
            .column(expenses::Column::VehicleId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(expense_type, amount, expense_date, category_id, vehicle_id)| ExpenseRow {
                    expense_type: expense_type.into(),
                    amount,
                    expense_date,
                    category_id,
                    vehicle_id,
                },
            )
            .collect())
    }

    async fn vehicle_names(&self) -> Result<HashMap<Uuid, String>, DbErr> {
        let rows: Vec<(Uuid, String, String)> = vehicles::Entity::find()
            .select_only()
            .column(vehicles::Column::Id)
            .column(vehicles::Column::VehicleNumber)
            .column(vehicles::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, number, name)| (id, format!("{number} ({name})")))
            .collect())
    }
}

fn filtered_expenses(range: DateRange) -> Select<expenses::Entity> {
    let mut query = expenses::Entity::find();
    if let Some(from) = range.from {
        query = query.filter(expenses::Column::ExpenseDate.gte(from));
    }
    if let Some(to) = range.to {
        query = query.filter(expenses::Column::ExpenseDate.lte(to));
    }
    query
}
