//! `SeaORM` entity prelude.

pub use super::branches::Entity as Branches;
pub use super::categories::Entity as Categories;
pub use super::expenses::Entity as Expenses;
pub use super::purchase_sale_transactions::Entity as PurchaseSaleTransactions;
pub use super::purchase_sales::Entity as PurchaseSales;
pub use super::purchases::Entity as Purchases;
pub use super::trips::Entity as Trips;
pub use super::users::Entity as Users;
pub use super::vehicles::Entity as Vehicles;
