//! Trip error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by trip and purchase line rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripError {
    /// Trip title is empty.
    #[error("Trip title is required")]
    BlankTitle,

    /// End date is before start date.
    #[error("Trip end date cannot be before its start date")]
    InvalidDateRange,

    /// Purchased quantity must be greater than zero.
    #[error("Purchase quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Rates cannot be negative.
    #[error("Rate cannot be negative")]
    NegativeRate,

    /// Sold quantity cannot be negative.
    #[error("Sale quantity cannot be negative")]
    NegativeSaleQuantity,

    /// More sold than bought on one line.
    #[error("Sale quantity {sold} exceeds purchased quantity {bought}")]
    SaleExceedsPurchase {
        /// Quantity bought.
        bought: Decimal,
        /// Quantity sold.
        sold: Decimal,
    },

    /// Quantity or rate has more than four decimal places or too many digits.
    #[error("Value {0} is out of range: at most 4 decimal places and 16 integer digits")]
    ValueOutOfRange(Decimal),

    /// Derived line amount is too large to store.
    #[error("Line amount is too large")]
    Overflow,

    /// Trip is completed; lines are frozen.
    #[error("Trip is completed")]
    TripCompleted,

    /// Unrecognised status string.
    #[error("Unknown trip status: {0}")]
    UnknownStatus(String),
}
