//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod branch;
pub mod category;
pub mod dashboard;
pub mod expense;
pub mod purchase;
pub mod purchase_sale;
pub mod report;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use branch::{BranchError, BranchRepository, CreateBranchInput, UpdateBranchInput};
pub use category::{CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput};
pub use dashboard::{DashboardError, DashboardRepository};
pub use expense::{
    CreateExpenseInput, ExpenseError, ExpenseFilter, ExpenseRepository, UpdateExpenseInput,
};
pub use purchase::{CreatePurchaseInput, PurchaseError, PurchaseRepository, UpdatePurchaseInput};
pub use purchase_sale::{
    CreateLedgerInput, CreateLedgerTransactionInput, LedgerCompletion, LedgerFilter,
    LedgerWithTransactions, PostedTransaction, PurchaseSaleError, PurchaseSaleRepository,
    UpdateLedgerInput, UpdateLedgerTransactionInput,
};
pub use report::{ReportError, ReportRepository};
pub use trip::{CreateTripInput, TripDetails, TripError, TripFilter, TripRepository, UpdateTripInput};
pub use user::{UserError, UserRepository};
pub use vehicle::{
    CreateVehicleInput, UpdateVehicleInput, VehicleError, VehicleFilter, VehicleRepository,
};

/// Trims an optional text field, turning blank input into `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
