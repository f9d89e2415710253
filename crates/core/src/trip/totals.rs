//! Purchase lines and trip totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TripError;
use crate::money;

/// Trip lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// Trip is running.
    Ongoing,
    /// Trip is closed.
    Completed,
}

impl TripStatus {
    /// Returns the wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TripStatus {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            _ => Err(TripError::UnknownStatus(s.to_string())),
        }
    }
}

/// Rejects changes to the lines of a completed trip.
///
/// # Errors
///
/// Returns `TripError::TripCompleted` when `status` is `Completed`.
pub fn ensure_open(status: TripStatus) -> Result<(), TripError> {
    match status {
        TripStatus::Ongoing => Ok(()),
        TripStatus::Completed => Err(TripError::TripCompleted),
    }
}

/// Validates trip header fields.
///
/// # Errors
///
/// `BlankTitle` or `InvalidDateRange`.
pub fn validate_trip(
    title: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), TripError> {
    if title.trim().is_empty() {
        return Err(TripError::BlankTitle);
    }
    validate_trip_dates(start_date, end_date)
}

/// Checks that a trip does not end before it starts.
///
/// # Errors
///
/// Returns `TripError::InvalidDateRange`.
pub fn validate_trip_dates(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), TripError> {
    if end_date.is_some_and(|end| end < start_date) {
        return Err(TripError::InvalidDateRange);
    }
    Ok(())
}

/// A validated purchase/sale line with its derived amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    /// Quantity bought.
    pub quantity: Decimal,
    /// Purchase rate per unit.
    pub rate: Decimal,
    /// `quantity * rate`.
    pub amount: Decimal,
    /// Quantity sold on.
    pub sale_quantity: Decimal,
    /// Sale rate per unit.
    pub sale_rate: Decimal,
    /// `sale_quantity * sale_rate`.
    pub sale_amount: Decimal,
}

impl PurchaseLine {
    /// Validates a line and derives its amounts (rounded to 2 dp).
    ///
    /// # Errors
    ///
    /// `NonPositiveQuantity`, `NegativeRate`, `NegativeSaleQuantity`,
    /// `ValueOutOfRange`, `SaleExceedsPurchase` or `Overflow` when a derived
    /// amount does not fit its column.
    pub fn new(
        quantity: Decimal,
        rate: Decimal,
        sale_quantity: Decimal,
        sale_rate: Decimal,
    ) -> Result<Self, TripError> {
        if quantity <= Decimal::ZERO {
            return Err(TripError::NonPositiveQuantity);
        }
        if rate < Decimal::ZERO || sale_rate < Decimal::ZERO {
            return Err(TripError::NegativeRate);
        }
        if sale_quantity < Decimal::ZERO {
            return Err(TripError::NegativeSaleQuantity);
        }
        if let Some(value) = [quantity, rate, sale_quantity, sale_rate]
            .into_iter()
            .find(|value| !money::fits_column(*value))
        {
            return Err(TripError::ValueOutOfRange(value));
        }
        if sale_quantity > quantity {
            return Err(TripError::SaleExceedsPurchase {
                bought: quantity,
                sold: sale_quantity,
            });
        }

        Ok(Self {
            quantity,
            rate,
            amount: line_amount(quantity, rate)?,
            sale_quantity,
            sale_rate,
            sale_amount: line_amount(sale_quantity, sale_rate)?,
        })
    }

    /// Sale proceeds minus purchase cost of this line.
    #[must_use]
    pub fn margin(&self) -> Decimal {
        self.sale_amount - self.amount
    }
}

fn line_amount(quantity: Decimal, rate: Decimal) -> Result<Decimal, TripError> {
    quantity
        .checked_mul(rate)
        .map(|amount| amount.round_dp(2))
        .filter(|amount| *amount <= money::max_value())
        .ok_or(TripError::Overflow)
}

/// Stored totals of a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTotals {
    /// Σ line quantity.
    pub total_purchase_quantity: Decimal,
    /// Σ line amount.
    pub total_purchase_amount: Decimal,
    /// Σ line sale quantity.
    pub total_sale_quantity: Decimal,
    /// Σ line sale amount.
    pub total_sale_amount: Decimal,
    /// Σ expenses booked on the trip.
    pub total_expense_amount: Decimal,
    /// `sale - purchase - expenses`.
    pub profit_loss: Decimal,
}

impl TripTotals {
    /// Sums purchase lines and trip expense amounts.
    #[must_use]
    pub fn compute<'a, L, E>(lines: L, expense_amounts: E) -> Self
    where
        L: IntoIterator<Item = &'a PurchaseLine>,
        E: IntoIterator<Item = Decimal>,
    {
        let mut totals = lines.into_iter().fold(Self::default(), |mut acc, line| {
            acc.total_purchase_quantity += line.quantity;
            acc.total_purchase_amount += line.amount;
            acc.total_sale_quantity += line.sale_quantity;
            acc.total_sale_amount += line.sale_amount;
            acc
        });
        totals.total_expense_amount = expense_amounts.into_iter().sum();
        totals.profit_loss =
            totals.total_sale_amount - totals.total_purchase_amount - totals.total_expense_amount;
        totals
    }

    /// Quantity bought but not yet sold.
    #[must_use]
    pub fn unsold_quantity(&self) -> Decimal {
        self.total_purchase_quantity - self.total_sale_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_purchase_line_amounts() {
        let line = PurchaseLine::new(dec!(1000), dec!(92.456), dec!(800), dec!(98.10)).unwrap();

        assert_eq!(line.amount, dec!(92456.00));
        assert_eq!(line.sale_amount, dec!(78480.00));
        assert_eq!(line.margin(), dec!(-13976.00));
    }

    #[test]
    fn test_purchase_line_rounds_to_cents() {
        let line = PurchaseLine::new(dec!(3.333), dec!(1.5), dec!(0), dec!(0)).unwrap();
        assert_eq!(line.amount, dec!(5.00));
    }

    #[test]
    fn test_purchase_line_validation() {
        assert_eq!(
            PurchaseLine::new(dec!(0), dec!(1), dec!(0), dec!(0)),
            Err(TripError::NonPositiveQuantity)
        );
        assert_eq!(
            PurchaseLine::new(dec!(10), dec!(-1), dec!(0), dec!(0)),
            Err(TripError::NegativeRate)
        );
        assert_eq!(
            PurchaseLine::new(dec!(10), dec!(1), dec!(-2), dec!(1)),
            Err(TripError::NegativeSaleQuantity)
        );
        assert_eq!(
            PurchaseLine::new(dec!(10), dec!(1), dec!(11), dec!(1)),
            Err(TripError::SaleExceedsPurchase {
                bought: dec!(10),
                sold: dec!(11)
            })
        );
    }

    #[test]
    fn test_purchase_line_overflow() {
        // The product exceeds what a Decimal can hold.
        let huge = dec!(9999999999999999);
        assert_eq!(
            PurchaseLine::new(huge, huge, dec!(0), dec!(0)),
            Err(TripError::Overflow)
        );
        // The product fits a Decimal but not the amount column.
        assert_eq!(
            PurchaseLine::new(dec!(100000000), dec!(100000000), dec!(0), dec!(0)),
            Err(TripError::Overflow)
        );
        assert_eq!(
            PurchaseLine::new(dec!(10), dec!(1), dec!(10), huge),
            Err(TripError::Overflow)
        );
    }

    #[test]
    fn test_purchase_line_rejects_unstorable_values() {
        assert_eq!(
            PurchaseLine::new(dec!(10000000000000000), dec!(1), dec!(0), dec!(0)),
            Err(TripError::ValueOutOfRange(dec!(10000000000000000)))
        );
        assert_eq!(
            PurchaseLine::new(dec!(10), dec!(1.00001), dec!(0), dec!(0)),
            Err(TripError::ValueOutOfRange(dec!(1.00001)))
        );
    }

    #[test]
    fn test_trip_totals() {
        let lines = [
            PurchaseLine::new(dec!(500), dec!(90), dec!(500), dec!(95)).unwrap(),
            PurchaseLine::new(dec!(300), dec!(91), dec!(200), dec!(96)).unwrap(),
        ];

        let totals = TripTotals::compute(&lines, [dec!(1200), dec!(300)]);

        assert_eq!(totals.total_purchase_quantity, dec!(800));
        assert_eq!(totals.total_purchase_amount, dec!(72300));
        assert_eq!(totals.total_sale_quantity, dec!(700));
        assert_eq!(totals.total_sale_amount, dec!(66700));
        assert_eq!(totals.total_expense_amount, dec!(1500));
        assert_eq!(totals.profit_loss, dec!(-7100));
        assert_eq!(totals.unsold_quantity(), dec!(100));
    }

    #[test]
    fn test_trip_totals_empty() {
        let totals = TripTotals::compute(&[] as &[PurchaseLine], Vec::<Decimal>::new());
        assert_eq!(totals, TripTotals::default());
    }

    #[test]
    fn test_validate_trip() {
        assert!(validate_trip("Run 1", date(2026, 3, 1), None).is_ok());
        assert!(validate_trip("Run 1", date(2026, 3, 1), Some(date(2026, 3, 1))).is_ok());
        assert_eq!(
            validate_trip("Run 1", date(2026, 3, 2), Some(date(2026, 3, 1))),
            Err(TripError::InvalidDateRange)
        );
        assert_eq!(
            validate_trip("", date(2026, 3, 1), None),
            Err(TripError::BlankTitle)
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(TripStatus::from_str("Completed").unwrap(), TripStatus::Completed);
        assert!(TripStatus::from_str("paused").is_err());
        assert!(ensure_open(TripStatus::Ongoing).is_ok());
        assert_eq!(ensure_open(TripStatus::Completed), Err(TripError::TripCompleted));
    }
}
