//! `SeaORM` entity definitions.

pub mod prelude;

pub mod branches;
pub mod categories;
pub mod expenses;
pub mod purchase_sale_transactions;
pub mod purchase_sales;
pub mod purchases;
pub mod sea_orm_active_enums;
pub mod trips;
pub mod users;
pub mod vehicles;
