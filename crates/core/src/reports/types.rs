//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ReportError;
use crate::expense::ExpenseType;

/// Optional inclusive date filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (from, to)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { from, to })
    }

    /// Range covering one calendar year.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidYear` for years chrono cannot represent.
    pub fn year(year: i32) -> Result<Self, ReportError> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ReportError::InvalidYear(year))?;
        let to = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(ReportError::InvalidYear(year))?;
        Ok(Self {
            from: Some(from),
            to: Some(to),
        })
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Minimal expense row the report service works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// Expense type.
    pub expense_type: ExpenseType,
    /// Amount.
    pub amount: Decimal,
    /// Date.
    pub expense_date: NaiveDate,
    /// Category, if any.
    pub category_id: Option<Uuid>,
    /// Vehicle, if any.
    pub vehicle_id: Option<Uuid>,
}

/// Totals of one group (category or vehicle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// Group key; `None` for expenses without one.
    pub id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Σ investment.
    pub investment: Decimal,
    /// Σ revenue.
    pub revenue: Decimal,
    /// Σ other.
    pub other: Decimal,
    /// Σ all types.
    pub total: Decimal,
    /// Number of expenses.
    pub count: u64,
}

/// Grouped expense report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedExpenseReport {
    /// Report type identifier.
    pub report_type: String,
    /// Filter used.
    pub range: DateRange,
    /// Groups sorted by total descending.
    pub groups: Vec<GroupTotal>,
    /// Σ of all groups.
    pub grand_total: Decimal,
}

/// One month of the monthly report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Month number, 1-12.
    pub month: u32,
    /// Σ investment.
    pub investment: Decimal,
    /// Σ revenue.
    pub revenue: Decimal,
    /// Σ other.
    pub other: Decimal,
    /// `revenue - investment - other`.
    pub net: Decimal,
}

/// Monthly expense report for a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyExpenseReport {
    /// Report type identifier.
    pub report_type: String,
    /// Year.
    pub year: i32,
    /// Twelve buckets, January first.
    pub months: Vec<MonthlyBucket>,
}

/// Trip profit of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTripProfit {
    /// Vehicle ID.
    pub vehicle_id: Uuid,
    /// Vehicle display name.
    pub vehicle_name: String,
    /// Number of trips.
    pub trips: u64,
    /// Σ purchase amount.
    pub purchase_amount: Decimal,
    /// Σ sale amount.
    pub sale_amount: Decimal,
    /// Σ trip expenses.
    pub expense_amount: Decimal,
    /// Σ profit/loss.
    pub profit_loss: Decimal,
}

/// Trip profit report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripProfitReport {
    /// Report type identifier.
    pub report_type: String,
    /// Filter used (on trip start date).
    pub range: DateRange,
    /// Vehicles sorted by profit descending.
    pub vehicles: Vec<VehicleTripProfit>,
    /// Σ profit/loss.
    pub total_profit_loss: Decimal,
}
