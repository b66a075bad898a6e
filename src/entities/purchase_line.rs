//! Purchase line entity - Quantity and cost of one product on a purchase.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub boxes: u32,
    pub units: u32,
    /// Cost of a single unit
    pub unit_cost: f64,
    /// `(boxes * capacity_per_box + units) * unit_cost` at the time of purchase
    pub line_cost: f64,
}

/// Defines relationships between purchase lines and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
