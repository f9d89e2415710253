//! `SeaORM` Entity for purchase_sales table (per-vehicle running ledgers).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LedgerStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub title: String,
    pub start_date: Date,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub opening_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub current_balance: Decimal,
    pub current_tins: i64,
    pub status: LedgerStatus,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub completion_expense_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Stored balance and tins.
    #[must_use]
    pub const fn position(&self) -> fleetbook_core::ledger::LedgerPosition {
        fleetbook_core::ledger::LedgerPosition::new(self.current_balance, self.current_tins)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id",
        on_delete = "Restrict"
    )]
    Vehicles,
    #[sea_orm(has_many = "super::purchase_sale_transactions::Entity")]
    PurchaseSaleTransactions,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::purchase_sale_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseSaleTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
