//! `SeaORM` Entity for purchases table (purchase/sale lines of a trip).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trip_id: Uuid,
    pub purchase_date: Date,
    pub supplier: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub amount: Decimal,
    pub customer: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub sale_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub sale_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub sale_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// The stored amounts as a core purchase line.
    #[must_use]
    pub const fn line(&self) -> fleetbook_core::trip::PurchaseLine {
        fleetbook_core::trip::PurchaseLine {
            quantity: self.quantity,
            rate: self.rate,
            amount: self.amount,
            sale_quantity: self.sale_quantity,
            sale_rate: self.sale_rate,
            sale_amount: self.sale_amount,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_delete = "Cascade"
    )]
    Trips,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
