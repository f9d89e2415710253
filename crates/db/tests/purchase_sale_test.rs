//! Purchase & sale ledger repository tests.

mod common;

use common::{completed, expense, ledger, mock, row};
use fleetbook_core::ledger::{LedgerError, TransactionKind};
use fleetbook_db::entities::sea_orm_active_enums::{
    ExpenseType, LedgerStatus, LedgerTransactionKind,
};
use fleetbook_db::repositories::{
    CreateLedgerTransactionInput, PurchaseSaleError, PurchaseSaleRepository, UpdateLedgerInput,
    UpdateLedgerTransactionInput,
};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, Statement, Value};

fn input(kind: TransactionKind, amount: rust_decimal::Decimal, tins: i64) -> CreateLedgerTransactionInput {
    CreateLedgerTransactionInput {
        kind,
        amount,
        tins,
        rate: None,
        description: None,
        transaction_date: common::date(2026, 3, 2),
    }
}

fn opening(amount: rust_decimal::Decimal) -> UpdateLedgerInput {
    UpdateLedgerInput {
        opening_balance: Some(amount),
        ..Default::default()
    }
}

/// UPDATE statements the mock connection received.
fn updates(db: DatabaseConnection) -> Vec<Statement> {
    db.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().to_vec())
        .filter(|stmt| stmt.sql.starts_with("UPDATE"))
        .collect()
}

fn writes(stmt: &Statement, value: rust_decimal::Decimal) -> bool {
    stmt.values
        .as_ref()
        .is_some_and(|values| values.0.contains(&Value::from(value)))
}

#[tokio::test]
async fn test_purchase_beyond_balance_is_rejected() {
    let existing = ledger(dec!(100), dec!(100), 0);
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo
        .add_transaction(existing.id, input(TransactionKind::Purchase, dec!(150), 5))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::InsufficientBalance { .. })
    ));
}

#[tokio::test]
async fn test_invalid_row_is_rejected_before_loading() {
    let db = mock().into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo
        .add_transaction(uuid::Uuid::new_v4(), input(TransactionKind::Expense, dec!(10), 2))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::ExpenseWithTins)
    ));
}

#[tokio::test]
async fn test_sale_is_written_with_new_position() {
    let existing = ledger(dec!(100), dec!(100), 10);
    let written = row(existing.id, LedgerTransactionKind::Sale, dec!(60), 4);
    let mut updated = existing.clone();
    updated.current_balance = dec!(160);
    updated.current_tins = 6;

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![written.clone()]])
        .append_query_results([vec![updated]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let posted = repo
        .add_transaction(existing.id, input(TransactionKind::Sale, dec!(60), 4))
        .await
        .unwrap();

    assert_eq!(posted.transaction.id, written.id);
    assert_eq!(posted.ledger.current_balance, dec!(160));
    assert_eq!(posted.ledger.current_tins, 6);
}

#[tokio::test]
async fn test_transactions_on_completed_ledger_are_rejected() {
    let existing = completed(ledger(dec!(100), dec!(100), 0));
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo
        .add_transaction(existing.id, input(TransactionKind::Sale, dec!(10), 0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::LedgerCompleted)
    ));
}

#[tokio::test]
async fn test_edit_purchase_at_zero_balance_succeeds() {
    // opening 100, one purchase of 100 for 5 tins: balance 0, tins 5
    let existing = ledger(dec!(100), dec!(0), 5);
    let purchase = row(existing.id, LedgerTransactionKind::Purchase, dec!(100), 5);
    let mut edited = purchase.clone();
    edited.amount = dec!(80);
    let mut updated = existing.clone();
    updated.current_balance = dec!(20);

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![purchase.clone()]])
        .append_query_results([vec![edited]])
        .append_query_results([vec![updated]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let posted = repo
        .update_transaction(
            existing.id,
            purchase.id,
            UpdateLedgerTransactionInput {
                amount: Some(dec!(80)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(posted.transaction.amount, dec!(80));
    assert_eq!(posted.ledger.current_balance, dec!(20));
}

#[tokio::test]
async fn test_deleting_purchase_with_sold_tins_is_rejected() {
    // opening 100, purchase 100/5 tins, sale 150/5 tins: balance 150, tins 0
    let existing = ledger(dec!(100), dec!(150), 0);
    let purchase = row(existing.id, LedgerTransactionKind::Purchase, dec!(100), 5);

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![purchase.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo
        .delete_transaction(existing.id, purchase.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::InsufficientTins { tins: 0, delta: -5 })
    ));
}

#[tokio::test]
async fn test_completed_ledger_cannot_be_deleted() {
    let existing = completed(ledger(dec!(0), dec!(40), 0));
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo.delete(existing.id).await.unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::LedgerCompleted)
    ));
}

#[tokio::test]
async fn test_complete_books_revenue_expense() {
    let existing = ledger(dec!(500), dec!(634.50), 2);
    let mut collection = expense(dec!(634.50), ExpenseType::Revenue);
    collection.purchase_sale_id = Some(existing.id);
    let mut done = completed(existing.clone());
    done.completion_expense_id = Some(collection.id);

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![collection.clone()]])
        .append_query_results([vec![done]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let result = repo.complete(existing.id, None).await.unwrap();

    assert_eq!(result.expense.amount, dec!(634.50));
    assert_eq!(result.expense.expense_type, ExpenseType::Revenue);
    assert_eq!(result.ledger.status, LedgerStatus::Completed);
    assert_eq!(result.ledger.completion_expense_id, Some(collection.id));
    assert_eq!(result.ledger.current_balance, dec!(634.50));
}

#[tokio::test]
async fn test_complete_with_zero_balance_is_rejected() {
    let existing = ledger(dec!(0), dec!(0), 3);
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo.complete(existing.id, None).await.unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::NothingToCollect)
    ));
}

#[tokio::test]
async fn test_undo_on_active_ledger_is_rejected() {
    let existing = ledger(dec!(10), dec!(10), 0);
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo.undo_complete(existing.id).await.unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::NotCompleted)
    ));
}

#[tokio::test]
async fn test_undo_reopens_ledger() {
    let existing = completed(ledger(dec!(10), dec!(10), 0));
    let mut reopened = existing.clone();
    reopened.status = LedgerStatus::Active;
    reopened.completed_at = None;

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![reopened]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let ledger = repo.undo_complete(existing.id).await.unwrap();

    assert_eq!(ledger.status, LedgerStatus::Active);
    assert_eq!(ledger.completed_at, None);
}

#[tokio::test]
async fn test_verify_detects_drift() {
    let existing = ledger(dec!(200), dec!(150), 3);
    let rows = vec![
        row(existing.id, LedgerTransactionKind::Purchase, dec!(100), 4),
        row(existing.id, LedgerTransactionKind::Sale, dec!(60), 1),
    ];

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([rows])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let verification = repo.verify(existing.id).await.unwrap();

    assert!(!verification.consistent);
    assert_eq!(
        verification.recomputed.map(|p| (p.balance, p.tins)),
        Some((dec!(160), 3))
    );
}

#[tokio::test]
async fn test_missing_ledger_is_not_found() {
    let db = mock()
        .append_query_results([Vec::<fleetbook_db::entities::purchase_sales::Model>::new()])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);
    let id = uuid::Uuid::new_v4();

    let err = repo.find_by_id(id).await.unwrap_err();

    assert!(matches!(err, PurchaseSaleError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_raising_opening_balance_rebases_current_balance() {
    // opening 1000, rows have taken it down to 250
    let existing = ledger(dec!(1000), dec!(250), 4);
    let mut rebased = existing.clone();
    rebased.opening_balance = dec!(1200);
    rebased.current_balance = dec!(450);

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![rebased]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db.clone());

    let updated = repo.update(existing.id, opening(dec!(1200))).await.unwrap();
    assert_eq!(updated.current_balance, dec!(450));

    let updates = updates(db);
    assert_eq!(updates.len(), 1);
    assert!(writes(&updates[0], dec!(1200)));
    assert!(writes(&updates[0], dec!(450)));
}

#[tokio::test]
async fn test_lowering_opening_below_spent_amount_is_rejected() {
    let existing = ledger(dec!(1000), dec!(250), 4);
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db.clone());

    let err = repo
        .update(existing.id, opening(dec!(700)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::InsufficientBalance { .. })
    ));
    assert!(updates(db).is_empty());
}

#[tokio::test]
async fn test_opening_balance_of_completed_ledger_is_frozen() {
    let existing = completed(ledger(dec!(100), dec!(40), 0));
    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db.clone());

    let err = repo
        .update(existing.id, opening(dec!(150)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::LedgerCompleted)
    ));
    assert!(updates(db).is_empty());
}

#[tokio::test]
async fn test_completed_ledger_title_can_be_edited() {
    let existing = completed(ledger(dec!(100), dec!(40), 0));
    let mut renamed = existing.clone();
    renamed.title = "March diesel run (closed)".to_string();

    let db = mock()
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![renamed]])
        .into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let updated = repo
        .update(
            existing.id,
            UpdateLedgerInput {
                title: Some("March diesel run (closed)".to_string()),
                opening_balance: Some(dec!(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "March diesel run (closed)");
    assert_eq!(updated.status, LedgerStatus::Completed);
}

#[tokio::test]
async fn test_unstorable_amount_is_rejected_before_loading() {
    let db = mock().into_connection();
    let repo = PurchaseSaleRepository::new(db);

    let err = repo
        .add_transaction(uuid::Uuid::new_v4(), input(TransactionKind::Purchase, dec!(1.00005), 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseSaleError::Ledger(LedgerError::AmountOutOfRange(_))
    ));
}
