//! Range of stored amounts, rates and quantities.
//!
//! Every money and quantity column is `NUMERIC(20, 4)`: at most four decimal
//! places and sixteen integer digits. Values outside that range are rejected
//! up front so the database never rounds or refuses what the ledger computed.

use rust_decimal::Decimal;

/// Decimal places kept by a stored value.
pub const SCALE: u32 = 4;

/// Largest magnitude a stored value can hold (`9999999999999999.9999`).
#[must_use]
pub fn max_value() -> Decimal {
    Decimal::from_i128_with_scale(99_999_999_999_999_999_999, SCALE)
}

/// True if `value` is stored exactly.
#[must_use]
pub fn fits_column(value: Decimal) -> bool {
    value.normalize().scale() <= SCALE && value.abs() <= max_value()
}
