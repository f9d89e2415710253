//! Postgres enum types and their mapping to the core enums.

use fleetbook_core::{expense, ledger, trip};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `expense_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_type")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    #[sea_orm(string_value = "investment")]
    Investment,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "other")]
    Other,
}

/// `trip_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trip_status")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// `ledger_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_status")]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// `ledger_transaction_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "ledger_transaction_kind"
)]
#[serde(rename_all = "snake_case")]
pub enum LedgerTransactionKind {
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<expense::ExpenseType> for ExpenseType {
    fn from(value: expense::ExpenseType) -> Self {
        match value {
            expense::ExpenseType::Investment => Self::Investment,
            expense::ExpenseType::Revenue => Self::Revenue,
            expense::ExpenseType::Other => Self::Other,
        }
    }
}

impl From<ExpenseType> for expense::ExpenseType {
    fn from(value: ExpenseType) -> Self {
        match value {
            ExpenseType::Investment => Self::Investment,
            ExpenseType::Revenue => Self::Revenue,
            ExpenseType::Other => Self::Other,
        }
    }
}

impl From<trip::TripStatus> for TripStatus {
    fn from(value: trip::TripStatus) -> Self {
        match value {
            trip::TripStatus::Ongoing => Self::Ongoing,
            trip::TripStatus::Completed => Self::Completed,
        }
    }
}

impl From<TripStatus> for trip::TripStatus {
    fn from(value: TripStatus) -> Self {
        match value {
            TripStatus::Ongoing => Self::Ongoing,
            TripStatus::Completed => Self::Completed,
        }
    }
}

impl From<ledger::LedgerStatus> for LedgerStatus {
    fn from(value: ledger::LedgerStatus) -> Self {
        match value {
            ledger::LedgerStatus::Active => Self::Active,
            ledger::LedgerStatus::Completed => Self::Completed,
        }
    }
}

impl From<LedgerStatus> for ledger::LedgerStatus {
    fn from(value: LedgerStatus) -> Self {
        match value {
            LedgerStatus::Active => Self::Active,
            LedgerStatus::Completed => Self::Completed,
        }
    }
}

impl From<ledger::TransactionKind> for LedgerTransactionKind {
    fn from(value: ledger::TransactionKind) -> Self {
        match value {
            ledger::TransactionKind::Purchase => Self::Purchase,
            ledger::TransactionKind::Sale => Self::Sale,
            ledger::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<LedgerTransactionKind> for ledger::TransactionKind {
    fn from(value: LedgerTransactionKind) -> Self {
        match value {
            LedgerTransactionKind::Purchase => Self::Purchase,
            LedgerTransactionKind::Sale => Self::Sale,
            LedgerTransactionKind::Expense => Self::Expense,
        }
    }
}
