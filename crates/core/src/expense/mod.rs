//! Expense classification and validation.
//!
//! Every money movement outside the trip and ledger bookkeeping lands here as an
//! expense tagged `investment`, `revenue` or `other`. Ledger settlement also
//! produces revenue expenses through this module.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money;

/// Expense classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    /// Money put into the business (vehicles, equipment, stock).
    Investment,
    /// Money coming in.
    Revenue,
    /// Running costs.
    Other,
}

impl ExpenseType {
    /// All variants in display order.
    pub const ALL: [Self; 3] = [Self::Investment, Self::Revenue, Self::Other];

    /// Returns the wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::Revenue => "revenue",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "investment" => Ok(Self::Investment),
            "revenue" => Ok(Self::Revenue),
            "other" => Ok(Self::Other),
            _ => Err(ExpenseError::UnknownType(s.to_string())),
        }
    }
}

/// Expense validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// Title is empty or whitespace.
    #[error("Expense title is required")]
    BlankTitle,

    /// Amount must be strictly positive.
    #[error("Expense amount must be greater than zero")]
    NonPositiveAmount,

    /// Amount has more than four decimal places or too many digits.
    #[error("Expense amount {0} is out of range: at most 4 decimal places and 16 integer digits")]
    AmountOutOfRange(Decimal),

    /// Unrecognised expense type.
    #[error("Unknown expense type: {0}")]
    UnknownType(String),
}

/// Validates the user-supplied parts of an expense.
///
/// # Errors
///
/// Returns `BlankTitle`, `NonPositiveAmount` or `AmountOutOfRange`.
pub fn validate_expense(title: &str, amount: Decimal) -> Result<(), ExpenseError> {
    if title.trim().is_empty() {
        return Err(ExpenseError::BlankTitle);
    }
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::NonPositiveAmount);
    }
    if !money::fits_column(amount) {
        return Err(ExpenseError::AmountOutOfRange(amount));
    }
    Ok(())
}
