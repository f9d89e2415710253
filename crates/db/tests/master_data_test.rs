//! Branch, vehicle, trip and expense repository tests.

mod common;

use common::{branch, count_row, date, expense, mock, trip, vehicle};
use fleetbook_core::trip::TripError as TripRule;
use fleetbook_db::entities::sea_orm_active_enums::{ExpenseType, TripStatus};
use fleetbook_db::repositories::{
    BranchError, BranchRepository, CreateBranchInput, CreatePurchaseInput, ExpenseError,
    ExpenseRepository, PurchaseError, PurchaseRepository, TripRepository, UpdateExpenseInput,
    VehicleError, VehicleRepository,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_duplicate_branch_name_is_rejected() {
    let db = mock()
        .append_query_results([vec![branch("North Depot")]])
        .into_connection();
    let repo = BranchRepository::new(db);

    let err = repo
        .create(CreateBranchInput {
            name: "  North Depot ".to_string(),
            location: None,
            phone: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::DuplicateName(name) if name == "North Depot"));
}

#[tokio::test]
async fn test_vehicle_with_trips_cannot_be_deleted() {
    let truck = vehicle("KA-01-1234");
    let db = mock()
        .append_query_results([vec![truck.clone()]])
        .append_query_results([vec![count_row(2)]])
        .append_query_results([vec![count_row(0)]])
        .into_connection();
    let repo = VehicleRepository::new(db);

    let err = repo.delete(truck.id).await.unwrap_err();

    assert!(matches!(err, VehicleError::InUse { trips: 2, ledgers: 0 }));
}

#[tokio::test]
async fn test_unused_vehicle_is_deleted() {
    let truck = vehicle("KA-01-9999");
    let db = mock()
        .append_query_results([vec![truck.clone()]])
        .append_query_results([vec![count_row(0)]])
        .append_query_results([vec![count_row(0)]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = VehicleRepository::new(db);

    assert!(repo.delete(truck.id).await.is_ok());
}

#[tokio::test]
async fn test_purchase_on_completed_trip_is_rejected() {
    let closed = trip(TripStatus::Completed);
    let db = mock()
        .append_query_results([vec![closed.clone()]])
        .into_connection();
    let repo = PurchaseRepository::new(db);

    let err = repo
        .create(
            closed.id,
            CreatePurchaseInput {
                purchase_date: date(2026, 3, 4),
                supplier: Some("Shell Depot".to_string()),
                quantity: dec!(1000),
                rate: dec!(92.5),
                customer: None,
                sale_quantity: dec!(0),
                sale_rate: dec!(0),
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PurchaseError::Rule(TripRule::TripCompleted)));
}

#[tokio::test]
async fn test_oversold_purchase_line_is_rejected() {
    let repo = PurchaseRepository::new(mock().into_connection());

    let err = repo
        .create(
            uuid::Uuid::new_v4(),
            CreatePurchaseInput {
                purchase_date: date(2026, 3, 4),
                supplier: None,
                quantity: dec!(100),
                rate: dec!(90),
                customer: Some("Fleet customer".to_string()),
                sale_quantity: dec!(120),
                sale_rate: dec!(95),
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseError::Rule(TripRule::SaleExceedsPurchase { .. })
    ));
}

#[tokio::test]
async fn test_completing_trip_twice_is_rejected() {
    let closed = trip(TripStatus::Completed);
    let db = mock()
        .append_query_results([vec![closed.clone()]])
        .into_connection();
    let repo = TripRepository::new(db);

    let err = repo.complete(closed.id).await.unwrap_err();

    assert!(matches!(
        err,
        fleetbook_db::repositories::TripError::Rule(TripRule::TripCompleted)
    ));
}

#[tokio::test]
async fn test_ledger_completion_expense_is_read_only() {
    let ledger_id = uuid::Uuid::new_v4();
    let mut collection = expense(dec!(300), ExpenseType::Revenue);
    collection.purchase_sale_id = Some(ledger_id);

    let db = mock()
        .append_query_results([vec![collection.clone()]])
        .append_query_results([vec![collection.clone()]])
        .into_connection();
    let repo = ExpenseRepository::new(db);

    let err = repo
        .update(
            collection.id,
            UpdateExpenseInput {
                amount: Some(dec!(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExpenseError::OwnedByLedger(id) if id == ledger_id));

    let err = repo.delete(collection.id).await.unwrap_err();
    assert!(matches!(err, ExpenseError::OwnedByLedger(id) if id == ledger_id));
}

#[tokio::test]
async fn test_expense_with_blank_title_is_rejected() {
    let repo = ExpenseRepository::new(mock().into_connection());

    let err = repo
        .create(fleetbook_db::repositories::CreateExpenseInput {
            title: "   ".to_string(),
            amount: dec!(10),
            expense_type: fleetbook_core::expense::ExpenseType::Other,
            category_id: None,
            vehicle_id: None,
            trip_id: None,
            expense_date: date(2026, 3, 5),
            notes: None,
            created_by: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExpenseError::Rule(fleetbook_core::expense::ExpenseError::BlankTitle)
    ));
}
