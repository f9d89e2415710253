//! Model builders shared by the repository tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use fleetbook_db::entities::{
    branches, expenses, purchase_sale_transactions, purchase_sales,
    sea_orm_active_enums::{ExpenseType, LedgerStatus, LedgerTransactionKind, TripStatus},
    trips, vehicles,
};

pub fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(n))])
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ledger(opening: Decimal, balance: Decimal, tins: i64) -> purchase_sales::Model {
    let now = chrono::Utc::now().into();
    purchase_sales::Model {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        title: "March diesel run".to_string(),
        start_date: date(2026, 3, 1),
        opening_balance: opening,
        current_balance: balance,
        current_tins: tins,
        status: LedgerStatus::Active,
        completed_at: None,
        completion_expense_id: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn completed(mut ledger: purchase_sales::Model) -> purchase_sales::Model {
    ledger.status = LedgerStatus::Completed;
    ledger.completed_at = Some(chrono::Utc::now().into());
    ledger
}

pub fn row(
    ledger_id: Uuid,
    kind: LedgerTransactionKind,
    amount: Decimal,
    tins: i64,
) -> purchase_sale_transactions::Model {
    let now = chrono::Utc::now().into();
    purchase_sale_transactions::Model {
        id: Uuid::new_v4(),
        purchase_sale_id: ledger_id,
        kind,
        amount,
        tins,
        rate: None,
        description: None,
        transaction_date: date(2026, 3, 2),
        created_at: now,
        updated_at: now,
    }
}

pub fn expense(amount: Decimal, expense_type: ExpenseType) -> expenses::Model {
    let now = chrono::Utc::now().into();
    expenses::Model {
        id: Uuid::new_v4(),
        title: "Diesel".to_string(),
        amount,
        expense_type,
        category_id: None,
        vehicle_id: None,
        trip_id: None,
        purchase_sale_id: None,
        expense_date: date(2026, 3, 3),
        notes: None,
        created_by: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn trip(status: TripStatus) -> trips::Model {
    let now = chrono::Utc::now().into();
    trips::Model {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        title: "Depot run".to_string(),
        start_date: date(2026, 3, 1),
        end_date: None,
        status,
        notes: None,
        total_purchase_quantity: Decimal::ZERO,
        total_purchase_amount: Decimal::ZERO,
        total_sale_quantity: Decimal::ZERO,
        total_sale_amount: Decimal::ZERO,
        total_expense_amount: Decimal::ZERO,
        profit_loss: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

pub fn vehicle(number: &str) -> vehicles::Model {
    let now = chrono::Utc::now().into();
    vehicles::Model {
        id: Uuid::new_v4(),
        vehicle_number: number.to_string(),
        name: "Tanker".to_string(),
        vehicle_type: None,
        branch_id: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn branch(name: &str) -> branches::Model {
    let now = chrono::Utc::now().into();
    branches::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        location: None,
        phone: None,
        created_at: now,
        updated_at: now,
    }
}
