//! Tests for the reports module.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::error::ReportError;
use super::service::{ReportService, UNASSIGNED};
use super::types::{DateRange, ExpenseRow};
use crate::expense::ExpenseType;
use crate::trip::TripTotals;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(
    expense_type: ExpenseType,
    amount: Decimal,
    expense_date: NaiveDate,
    category_id: Option<Uuid>,
    vehicle_id: Option<Uuid>,
) -> ExpenseRow {
    ExpenseRow {
        expense_type,
        amount,
        expense_date,
        category_id,
        vehicle_id,
    }
}

#[test]
fn test_date_range_validation() {
    assert!(DateRange::new(Some(date(2026, 1, 1)), Some(date(2026, 1, 1))).is_ok());
    assert_eq!(
        DateRange::new(Some(date(2026, 2, 1)), Some(date(2026, 1, 1))),
        Err(ReportError::InvalidDateRange {
            start: date(2026, 2, 1),
            end: date(2026, 1, 1)
        })
    );
}

#[test]
fn test_date_range_contains() {
    let range = DateRange::new(Some(date(2026, 3, 1)), None).unwrap();
    assert!(range.contains(date(2026, 3, 1)));
    assert!(range.contains(date(2030, 1, 1)));
    assert!(!range.contains(date(2026, 2, 28)));
    assert!(DateRange::default().contains(date(1990, 1, 1)));
}

#[test]
fn test_year_range() {
    let range = DateRange::year(2026).unwrap();
    assert_eq!(range.from, Some(date(2026, 1, 1)));
    assert_eq!(range.to, Some(date(2026, 12, 31)));
}

#[test]
fn test_expenses_by_category() {
    let fuel = Uuid::new_v4();
    let repairs = Uuid::new_v4();
    let names = HashMap::from([
        (fuel, "Fuel".to_string()),
        (repairs, "Repairs".to_string()),
    ]);

    let rows = vec![
        row(ExpenseType::Other, dec!(300), date(2026, 1, 5), Some(fuel), None),
        row(ExpenseType::Other, dec!(200), date(2026, 1, 6), Some(fuel), None),
        row(ExpenseType::Investment, dec!(900), date(2026, 1, 7), Some(repairs), None),
        row(ExpenseType::Revenue, dec!(50), date(2026, 1, 8), None, None),
        // Outside the range
        row(ExpenseType::Other, dec!(1000), date(2025, 12, 31), Some(fuel), None),
    ];

    let range = DateRange::new(Some(date(2026, 1, 1)), Some(date(2026, 1, 31))).unwrap();
    let report = ReportService::expenses_by_category(&rows, &names, range);

    assert_eq!(report.report_type, "expenses_by_category");
    assert_eq!(report.groups.len(), 3);
    assert_eq!(report.groups[0].name, "Repairs");
    assert_eq!(report.groups[0].investment, dec!(900));
    assert_eq!(report.groups[1].name, "Fuel");
    assert_eq!(report.groups[1].other, dec!(500));
    assert_eq!(report.groups[1].count, 2);
    assert_eq!(report.groups[2].name, UNASSIGNED);
    assert_eq!(report.groups[2].id, None);
    assert_eq!(report.grand_total, dec!(1450));
}

#[test]
fn test_expenses_by_vehicle_ties_sorted_by_name() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let names = HashMap::from([(a, "Truck B".to_string()), (b, "Truck A".to_string())]);
    let rows = vec![
        row(ExpenseType::Other, dec!(100), date(2026, 5, 1), None, Some(a)),
        row(ExpenseType::Other, dec!(100), date(2026, 5, 1), None, Some(b)),
    ];

    let report = ReportService::expenses_by_vehicle(&rows, &names, DateRange::default());

    assert_eq!(report.groups[0].name, "Truck A");
    assert_eq!(report.groups[1].name, "Truck B");
}

#[test]
fn test_monthly_expenses() {
    let rows = vec![
        row(ExpenseType::Revenue, dec!(5000), date(2026, 1, 15), None, None),
        row(ExpenseType::Other, dec!(700), date(2026, 1, 20), None, None),
        row(ExpenseType::Investment, dec!(2000), date(2026, 12, 31), None, None),
        row(ExpenseType::Revenue, dec!(9999), date(2025, 1, 15), None, None),
    ];

    let report = ReportService::monthly_expenses(&rows, 2026);

    assert_eq!(report.months.len(), 12);
    assert_eq!(report.months[0].month, 1);
    assert_eq!(report.months[0].revenue, dec!(5000));
    assert_eq!(report.months[0].net, dec!(4300));
    assert_eq!(report.months[11].investment, dec!(2000));
    assert_eq!(report.months[11].net, dec!(-2000));
    assert!(report.months[1..11].iter().all(|m| m.net.is_zero()));
}

#[test]
fn test_trip_profit_by_vehicle() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let names = HashMap::from([(a, "KA-01".to_string())]);
    let totals = |profit: Decimal| TripTotals {
        total_purchase_amount: dec!(100),
        total_sale_amount: dec!(100) + profit,
        profit_loss: profit,
        ..TripTotals::default()
    };

    let trips = vec![(a, totals(dec!(50))), (a, totals(dec!(-10))), (b, totals(dec!(70)))];
    let report = ReportService::trip_profit_by_vehicle(&trips, &names, DateRange::default());

    assert_eq!(report.vehicles.len(), 2);
    assert_eq!(report.vehicles[0].vehicle_id, b);
    assert_eq!(report.vehicles[0].vehicle_name, b.to_string());
    assert_eq!(report.vehicles[1].vehicle_name, "KA-01");
    assert_eq!(report.vehicles[1].trips, 2);
    assert_eq!(report.vehicles[1].profit_loss, dec!(40));
    assert_eq!(report.vehicles[1].purchase_amount, dec!(200));
    assert_eq!(report.total_profit_loss, dec!(110));
}

proptest! {
    /// The grand total equals the sum of every in-range row regardless of grouping.
    #[test]
    fn prop_grand_total_matches_rows(
        amounts in prop::collection::vec((1i64..100_000, 0usize..3, 0usize..4), 0..40),
    ) {
        let keys: Vec<Option<Uuid>> = vec![None, Some(Uuid::new_v4()), Some(Uuid::new_v4()), Some(Uuid::new_v4())];
        let rows: Vec<ExpenseRow> = amounts
            .iter()
            .map(|(cents, t, k)| row(
                ExpenseType::ALL[*t],
                Decimal::new(*cents, 2),
                date(2026, 6, 1),
                keys[*k],
                keys[(*k + 1) % 4],
            ))
            .collect();
        let expected: Decimal = rows.iter().map(|r| r.amount).sum();

        let by_category = ReportService::expenses_by_category(&rows, &HashMap::new(), DateRange::default());
        let by_vehicle = ReportService::expenses_by_vehicle(&rows, &HashMap::new(), DateRange::default());

        prop_assert_eq!(by_category.grand_total, expected);
        prop_assert_eq!(by_vehicle.grand_total, expected);
        prop_assert_eq!(by_category.groups.iter().map(|g| g.count).sum::<u64>(), rows.len() as u64);
    }
}
