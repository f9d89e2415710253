//! `SeaORM` Entity for vehicles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub vehicle_number: String,
    pub name: String,
    pub vehicle_type: Option<String>,
    pub branch_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id",
        on_delete = "SetNull"
    )]
    Branches,
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
    #[sea_orm(has_many = "super::purchase_sales::Entity")]
    PurchaseSales,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::purchase_sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
