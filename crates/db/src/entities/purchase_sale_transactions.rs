//! `SeaORM` Entity for purchase_sale_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LedgerTransactionKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_sale_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_sale_id: Uuid,
    pub kind: LedgerTransactionKind,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub amount: Decimal,
    pub tins: i64,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))", nullable)]
    pub rate: Option<Decimal>,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Effect of this row on its ledger.
    #[must_use]
    pub fn effect(&self) -> fleetbook_core::ledger::TransactionEffect {
        fleetbook_core::ledger::TransactionEffect::of(self.kind.into(), self.amount, self.tins)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_sales::Entity",
        from = "Column::PurchaseSaleId",
        to = "super::purchase_sales::Column::Id",
        on_delete = "Cascade"
    )]
    PurchaseSales,
}

impl Related<super::purchase_sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
