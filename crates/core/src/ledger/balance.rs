//! Running balance and tin position of a ledger.
//!
//! Invariant maintained by every operation here:
//!
//! ```text
//! balance = opening + Σ sale.amount - Σ purchase.amount - Σ expense.amount  >= 0
//! tins    = Σ purchase.tins - Σ sale.tins                                   >= 0
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{TransactionEffect, TransactionKind};
use crate::money;

fn ensure_storable(value: Decimal) -> Result<(), LedgerError> {
    if money::fits_column(value) {
        Ok(())
    } else {
        Err(LedgerError::AmountOutOfRange(value))
    }
}

/// Validates the raw fields of a transaction row.
///
/// # Errors
///
/// - `NonPositiveAmount` if `amount <= 0`
/// - `AmountOutOfRange` if `amount` cannot be stored exactly
/// - `NegativeTinCount` if `tins < 0`
/// - `ExpenseWithTins` if an expense carries tins
pub fn validate_transaction(
    kind: TransactionKind,
    amount: Decimal,
    tins: i64,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    ensure_storable(amount)?;
    if tins < 0 {
        return Err(LedgerError::NegativeTinCount);
    }
    if kind == TransactionKind::Expense && tins != 0 {
        return Err(LedgerError::ExpenseWithTins);
    }
    Ok(())
}

/// Validates the informational rate of a transaction row.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if the rate cannot be stored exactly.
pub fn validate_rate(rate: Option<Decimal>) -> Result<(), LedgerError> {
    rate.map_or(Ok(()), ensure_storable)
}

/// Current balance and tin count of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPosition {
    /// Running balance.
    pub balance: Decimal,
    /// Tins on hand.
    pub tins: i64,
}

impl LedgerPosition {
    /// Wraps stored values.
    #[must_use]
    pub const fn new(balance: Decimal, tins: i64) -> Self {
        Self { balance, tins }
    }

    /// Position of a freshly opened ledger.
    ///
    /// # Errors
    ///
    /// Returns `NegativeOpeningBalance` if `opening_balance < 0`, or
    /// `AmountOutOfRange` if it cannot be stored exactly.
    pub fn opening(opening_balance: Decimal) -> Result<Self, LedgerError> {
        if opening_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeOpeningBalance);
        }
        ensure_storable(opening_balance)?;
        Ok(Self::new(opening_balance, 0))
    }

    /// Applies an effect, rejecting results below zero.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance`, `InsufficientTins` or `Overflow` (also
    /// when the balance outgrows its column).
    pub fn apply(self, effect: TransactionEffect) -> Result<Self, LedgerError> {
        let balance = self
            .balance
            .checked_add(effect.balance_delta)
            .filter(|balance| *balance <= money::max_value())
            .ok_or(LedgerError::Overflow)?;
        let tins = self
            .tins
            .checked_add(effect.tins_delta)
            .ok_or(LedgerError::Overflow)?;

        if balance < Decimal::ZERO {
            return Err(LedgerError::InsufficientBalance {
                balance: self.balance,
                delta: effect.balance_delta,
            });
        }
        if tins < 0 {
            return Err(LedgerError::InsufficientTins {
                tins: self.tins,
                delta: effect.tins_delta,
            });
        }

        Ok(Self { balance, tins })
    }

    /// Un-applies an effect (used when a transaction row is deleted).
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply`]: deleting a purchase whose tins were already
    /// sold, or a sale whose proceeds were already spent, is rejected.
    pub fn revert(self, effect: TransactionEffect) -> Result<Self, LedgerError> {
        self.apply(effect.inverse())
    }

    /// Swaps the effect of an edited row: un-applies `old`, applies `new`.
    ///
    /// Only the final position is checked, so an edit that lowers a purchase
    /// amount while the balance is zero still goes through.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply`].
    pub fn replace(
        self,
        old: TransactionEffect,
        new: TransactionEffect,
    ) -> Result<Self, LedgerError> {
        self.apply(old.inverse().combine(new)?)
    }

    /// Moves the position after the opening balance was edited.
    ///
    /// # Errors
    ///
    /// `NegativeOpeningBalance` if `new_opening < 0`, `AmountOutOfRange` if
    /// it cannot be stored exactly; otherwise same as [`Self::apply`].
    pub fn rebase_opening(
        self,
        old_opening: Decimal,
        new_opening: Decimal,
    ) -> Result<Self, LedgerError> {
        if new_opening < Decimal::ZERO {
            return Err(LedgerError::NegativeOpeningBalance);
        }
        ensure_storable(new_opening)?;
        let delta = new_opening
            .checked_sub(old_opening)
            .ok_or(LedgerError::Overflow)?;
        self.apply(TransactionEffect {
            balance_delta: delta,
            tins_delta: 0,
        })
    }

    /// Recomputes a position from scratch from the opening balance and every row.
    ///
    /// # Errors
    ///
    /// Fails if the totals are negative, which means the stored rows violate
    /// the invariant.
    pub fn recompute<I>(opening_balance: Decimal, effects: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = TransactionEffect>,
    {
        let total = effects
            .into_iter()
            .try_fold(TransactionEffect::NONE, TransactionEffect::combine)?;
        Self::opening(opening_balance)?.apply(total)
    }
}

/// Result of checking a stored position against its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerVerification {
    /// Position stored on the ledger.
    pub stored: LedgerPosition,
    /// Position recomputed from the rows; `None` if the rows themselves
    /// drive the ledger negative.
    pub recomputed: Option<LedgerPosition>,
    /// True if both agree.
    pub consistent: bool,
}

/// Recomputes a ledger and compares it with what is stored.
pub fn verify<I>(opening_balance: Decimal, stored: LedgerPosition, effects: I) -> LedgerVerification
where
    I: IntoIterator<Item = TransactionEffect>,
{
    let recomputed = LedgerPosition::recompute(opening_balance, effects).ok();
    LedgerVerification {
        stored,
        recomputed,
        consistent: recomputed == Some(stored),
    }
}
