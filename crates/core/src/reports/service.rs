//! Report generation service.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{
    DateRange, ExpenseRow, GroupTotal, GroupedExpenseReport, MonthlyBucket, MonthlyExpenseReport,
    TripProfitReport, VehicleTripProfit,
};
use crate::expense::ExpenseType;
use crate::trip::TripTotals;

/// Label for expenses with no category/vehicle.
pub const UNASSIGNED: &str = "Unassigned";

/// Service for generating fleet reports.
pub struct ReportService;

impl ReportService {
    /// Groups expenses by category.
    #[must_use]
    pub fn expenses_by_category(
        rows: &[ExpenseRow],
        names: &HashMap<Uuid, String>,
        range: DateRange,
    ) -> GroupedExpenseReport {
        Self::grouped("expenses_by_category", rows, names, range, |r| r.category_id)
    }

    /// Groups expenses by vehicle.
    #[must_use]
    pub fn expenses_by_vehicle(
        rows: &[ExpenseRow],
        names: &HashMap<Uuid, String>,
        range: DateRange,
    ) -> GroupedExpenseReport {
        Self::grouped("expenses_by_vehicle", rows, names, range, |r| r.vehicle_id)
    }

    fn grouped(
        report_type: &str,
        rows: &[ExpenseRow],
        names: &HashMap<Uuid, String>,
        range: DateRange,
        key: impl Fn(&ExpenseRow) -> Option<Uuid>,
    ) -> GroupedExpenseReport {
        let mut groups: HashMap<Option<Uuid>, GroupTotal> = HashMap::new();

        for row in rows.iter().filter(|r| range.contains(r.expense_date)) {
            let id = key(row);
            let group = groups.entry(id).or_insert_with(|| GroupTotal {
                id,
                name: id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| UNASSIGNED.to_string()),
                investment: Decimal::ZERO,
                revenue: Decimal::ZERO,
                other: Decimal::ZERO,
                total: Decimal::ZERO,
                count: 0,
            });

            match row.expense_type {
                ExpenseType::Investment => group.investment += row.amount,
                ExpenseType::Revenue => group.revenue += row.amount,
                ExpenseType::Other => group.other += row.amount,
            }
            group.total += row.amount;
            group.count += 1;
        }

        let mut groups: Vec<GroupTotal> = groups.into_values().collect();
        groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        let grand_total = groups.iter().map(|g| g.total).sum();

        GroupedExpenseReport {
            report_type: report_type.to_string(),
            range,
            groups,
            grand_total,
        }
    }

    /// Buckets one year of expenses by month.
    ///
    /// Always returns twelve buckets; rows outside `year` are ignored.
    #[must_use]
    pub fn monthly_expenses(rows: &[ExpenseRow], year: i32) -> MonthlyExpenseReport {
        let mut months: Vec<MonthlyBucket> = (1..=12)
            .map(|month| MonthlyBucket {
                month,
                ..MonthlyBucket::default()
            })
            .collect();

        for row in rows.iter().filter(|r| r.expense_date.year() == year) {
            let bucket = &mut months[row.expense_date.month0() as usize];
            match row.expense_type {
                ExpenseType::Investment => bucket.investment += row.amount,
                ExpenseType::Revenue => bucket.revenue += row.amount,
                ExpenseType::Other => bucket.other += row.amount,
            }
        }

        for bucket in &mut months {
            bucket.net = bucket.revenue - bucket.investment - bucket.other;
        }

        MonthlyExpenseReport {
            report_type: "monthly_expenses".to_string(),
            year,
            months,
        }
    }

    /// Sums trip totals per vehicle.
    #[must_use]
    pub fn trip_profit_by_vehicle(
        trips: &[(Uuid, TripTotals)],
        names: &HashMap<Uuid, String>,
        range: DateRange,
    ) -> TripProfitReport {
        let mut vehicles: HashMap<Uuid, VehicleTripProfit> = HashMap::new();

        for (vehicle_id, totals) in trips {
            let entry = vehicles
                .entry(*vehicle_id)
                .or_insert_with(|| VehicleTripProfit {
                    vehicle_id: *vehicle_id,
                    vehicle_name: names
                        .get(vehicle_id)
                        .cloned()
                        .unwrap_or_else(|| vehicle_id.to_string()),
                    trips: 0,
                    purchase_amount: Decimal::ZERO,
                    sale_amount: Decimal::ZERO,
                    expense_amount: Decimal::ZERO,
                    profit_loss: Decimal::ZERO,
                });
            entry.trips += 1;
            entry.purchase_amount += totals.total_purchase_amount;
            entry.sale_amount += totals.total_sale_amount;
            entry.expense_amount += totals.total_expense_amount;
            entry.profit_loss += totals.profit_loss;
        }

        let mut vehicles: Vec<VehicleTripProfit> = vehicles.into_values().collect();
        vehicles.sort_by(|a, b| {
            b.profit_loss
                .cmp(&a.profit_loss)
                .then_with(|| a.vehicle_name.cmp(&b.vehicle_name))
        });
        let total_profit_loss = vehicles.iter().map(|v| v.profit_loss).sum();

        TripProfitReport {
            report_type: "trip_profit_by_vehicle".to_string(),
            range,
            vehicles,
            total_profit_loss,
        }
    }
}
