//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Kind of a Purchase & Sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Goods bought: balance goes down, tins go up.
    Purchase,
    /// Goods sold: balance goes up, tins go down.
    Sale,
    /// Cost paid from the ledger: balance goes down.
    Expense,
}

impl TransactionKind {
    /// Returns the wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::UnknownKind(s.to_string())),
        }
    }
}

/// Ledger lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    /// Open for transactions.
    Active,
    /// Collection completed; frozen until undone.
    Completed,
}

/// Rejects mutations on a completed ledger.
///
/// # Errors
///
/// Returns `LedgerError::LedgerCompleted` when `status` is `Completed`.
pub fn ensure_active(status: LedgerStatus) -> Result<(), LedgerError> {
    match status {
        LedgerStatus::Active => Ok(()),
        LedgerStatus::Completed => Err(LedgerError::LedgerCompleted),
    }
}

/// Net effect of one transaction row on a ledger position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffect {
    /// Change to the running balance.
    pub balance_delta: Decimal,
    /// Change to the tin count.
    pub tins_delta: i64,
}

impl TransactionEffect {
    /// An effect that changes nothing.
    pub const NONE: Self = Self {
        balance_delta: Decimal::ZERO,
        tins_delta: 0,
    };

    /// Computes the effect of a transaction row.
    ///
    /// - sale: `(+amount, -tins)`
    /// - purchase: `(-amount, +tins)`
    /// - expense: `(-amount, 0)`
    #[must_use]
    pub fn of(kind: TransactionKind, amount: Decimal, tins: i64) -> Self {
        match kind {
            TransactionKind::Sale => Self {
                balance_delta: amount,
                tins_delta: -tins,
            },
            TransactionKind::Purchase => Self {
                balance_delta: -amount,
                tins_delta: tins,
            },
            TransactionKind::Expense => Self {
                balance_delta: -amount,
                tins_delta: 0,
            },
        }
    }

    /// Returns the effect that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            balance_delta: -self.balance_delta,
            tins_delta: -self.tins_delta,
        }
    }

    /// Combines two effects.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if either component overflows.
    pub fn combine(self, other: Self) -> Result<Self, LedgerError> {
        Ok(Self {
            balance_delta: self
                .balance_delta
                .checked_add(other.balance_delta)
                .ok_or(LedgerError::Overflow)?,
            tins_delta: self
                .tins_delta
                .checked_add(other.tins_delta)
                .ok_or(LedgerError::Overflow)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(TransactionKind::Sale, dec!(500), 4, dec!(500), -4)]
    #[case(TransactionKind::Purchase, dec!(300), 6, dec!(-300), 6)]
    #[case(TransactionKind::Expense, dec!(75), 0, dec!(-75), 0)]
    fn test_effect_of(
        #[case] kind: TransactionKind,
        #[case] amount: Decimal,
        #[case] tins: i64,
        #[case] balance_delta: Decimal,
        #[case] tins_delta: i64,
    ) {
        let effect = TransactionEffect::of(kind, amount, tins);
        assert_eq!(effect.balance_delta, balance_delta);
        assert_eq!(effect.tins_delta, tins_delta);
    }

    #[test]
    fn test_expense_ignores_tins() {
        let effect = TransactionEffect::of(TransactionKind::Expense, dec!(10), 9);
        assert_eq!(effect.tins_delta, 0);
    }

    #[test]
    fn test_inverse_cancels() {
        let effect = TransactionEffect::of(TransactionKind::Purchase, dec!(120), 3);
        assert_eq!(
            effect.combine(effect.inverse()).unwrap(),
            TransactionEffect::NONE
        );
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [
            TransactionKind::Purchase,
            TransactionKind::Sale,
            TransactionKind::Expense,
        ] {
            assert_eq!(TransactionKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            TransactionKind::from_str("refund"),
            Err(LedgerError::UnknownKind("refund".into()))
        );
    }

    #[test]
    fn test_ensure_active() {
        assert!(ensure_active(LedgerStatus::Active).is_ok());
        assert_eq!(
            ensure_active(LedgerStatus::Completed),
            Err(LedgerError::LedgerCompleted)
        );
    }
}
