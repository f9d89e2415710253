//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::{ApiResult, AppState};
use fleetbook_core::reports::{
    DateRange, GroupedExpenseReport, MonthlyExpenseReport, TripProfitReport,
};
use fleetbook_db::ReportRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/expenses/by-category", get(expenses_by_category))
        .route("/reports/expenses/by-vehicle", get(expenses_by_vehicle))
        .route("/reports/expenses/monthly", get(monthly_expenses))
        .route("/reports/trips/by-vehicle", get(trip_profit_by_vehicle))
}

/// Inclusive date filter.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
    fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }
}

/// Year selector for the monthly report.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

async fn expenses_by_category(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<GroupedExpenseReport>> {
    let report = ReportRepository::new(state.conn())
        .expenses_by_category(query.range()?)
        .await?;
    Ok(Json(report))
}

async fn expenses_by_vehicle(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<GroupedExpenseReport>> {
    let report = ReportRepository::new(state.conn())
        .expenses_by_vehicle(query.range()?)
        .await?;
    Ok(Json(report))
}

async fn monthly_expenses(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<MonthlyExpenseReport>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let report = ReportRepository::new(state.conn())
        .monthly_expenses(year)
        .await?;
    Ok(Json(report))
}

async fn trip_profit_by_vehicle(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<TripProfitReport>> {
    let report = ReportRepository::new(state.conn())
        .trip_profit_by_vehicle(query.range()?)
        .await?;
    Ok(Json(report))
}
