//! `SeaORM` Entity for trips table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TripStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub title: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub status: TripStatus,
    pub notes: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_purchase_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_purchase_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_sale_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_sale_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_expense_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub profit_loss: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Stored totals as the core type.
    #[must_use]
    pub fn totals(&self) -> fleetbook_core::trip::TripTotals {
        fleetbook_core::trip::TripTotals {
            total_purchase_quantity: self.total_purchase_quantity,
            total_purchase_amount: self.total_purchase_amount,
            total_sale_quantity: self.total_sale_quantity,
            total_sale_amount: self.total_sale_amount,
            total_expense_amount: self.total_expense_amount,
            profit_loss: self.profit_loss,
        }
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
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
