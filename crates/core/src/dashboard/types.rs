//! Dashboard data types and their aggregation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::expense::ExpenseType;
use crate::ledger::{LedgerPosition, LedgerStatus};
use crate::trip::TripTotals;

/// Dashboard summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Entity counts.
    pub counts: EntityCounts,
    /// Expense totals by type.
    pub expenses: ExpenseTotals,
    /// Trip totals.
    pub trips: TripSummary,
    /// Purchase & Sale ledger totals.
    pub ledgers: LedgerSummary,
    /// Latest expenses.
    pub recent_expenses: Vec<RecentExpense>,
}

/// Entity counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    /// Number of branches.
    pub branches: u64,
    /// Number of vehicles.
    pub vehicles: u64,
    /// Number of active vehicles.
    pub active_vehicles: u64,
    /// Number of categories.
    pub categories: u64,
}

/// Expense totals by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTotals {
    /// Σ investment.
    pub investment: Decimal,
    /// Σ revenue.
    pub revenue: Decimal,
    /// Σ other.
    pub other: Decimal,
    /// `revenue - investment - other`.
    pub net: Decimal,
    /// Number of expenses.
    pub count: u64,
}

impl ExpenseTotals {
    /// Adds one expense to the totals.
    pub fn add(&mut self, expense_type: ExpenseType, amount: Decimal) {
        match expense_type {
            ExpenseType::Investment => self.investment += amount,
            ExpenseType::Revenue => self.revenue += amount,
            ExpenseType::Other => self.other += amount,
        }
        self.count += 1;
        self.net = self.revenue - self.investment - self.other;
    }

    /// Builds totals from `(type, amount)` rows.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (ExpenseType, Decimal)>,
    {
        let mut totals = Self::default();
        for (expense_type, amount) in rows {
            totals.add(expense_type, amount);
        }
        totals
    }

    /// Sum over all types.
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.investment + self.revenue + self.other
    }
}

/// Trip totals across all trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    /// Ongoing trips.
    pub ongoing: u64,
    /// Completed trips.
    pub completed: u64,
    /// Σ purchase amount.
    pub total_purchase_amount: Decimal,
    /// Σ sale amount.
    pub total_sale_amount: Decimal,
    /// Σ trip expenses.
    pub total_expense_amount: Decimal,
    /// Σ profit/loss.
    pub profit_loss: Decimal,
}

impl TripSummary {
    /// Builds the summary from `(is_completed, totals)` rows.
    #[must_use]
    pub fn from_trips<I>(trips: I) -> Self
    where
        I: IntoIterator<Item = (bool, TripTotals)>,
    {
        trips
            .into_iter()
            .fold(Self::default(), |mut acc, (completed, totals)| {
                if completed {
                    acc.completed += 1;
                } else {
                    acc.ongoing += 1;
                }
                acc.total_purchase_amount += totals.total_purchase_amount;
                acc.total_sale_amount += totals.total_sale_amount;
                acc.total_expense_amount += totals.total_expense_amount;
                acc.profit_loss += totals.profit_loss;
                acc
            })
    }
}

/// Ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Active ledgers.
    pub active: u64,
    /// Completed ledgers.
    pub completed: u64,
    /// Σ current balance over active ledgers.
    pub outstanding_balance: Decimal,
    /// Σ tins over active ledgers.
    pub outstanding_tins: i64,
}

impl LedgerSummary {
    /// Builds the summary from `(status, position)` rows.
    ///
    /// Completed ledgers have already been turned into revenue, so only
    /// active ones count towards the outstanding figures.
    #[must_use]
    pub fn from_ledgers<I>(ledgers: I) -> Self
    where
        I: IntoIterator<Item = (LedgerStatus, LedgerPosition)>,
    {
        ledgers
            .into_iter()
            .fold(Self::default(), |mut acc, (status, position)| {
                match status {
                    LedgerStatus::Active => {
                        acc.active += 1;
                        acc.outstanding_balance += position.balance;
                        acc.outstanding_tins += position.tins;
                    }
                    LedgerStatus::Completed => acc.completed += 1,
                }
                acc
            })
    }
}

/// Compact expense row for the recent activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentExpense {
    /// Expense ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Amount.
    pub amount: Decimal,
    /// Type.
    pub expense_type: ExpenseType,
    /// Date.
    pub expense_date: NaiveDate,
}
