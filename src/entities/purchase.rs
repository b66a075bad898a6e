//! Purchase entity - Goods received from a supplier.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier the goods came from
    pub supplier_id: i64,
    /// Supplier name at the time of the purchase
    pub supplier: String,
    /// Supplier's delivery note or invoice number, if any
    pub reference: Option<String>,
    /// Sum of all line costs
    pub total_cost: f64,
    /// When the goods were received
    pub received_at: DateTimeUtc,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase comes from one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// Lines of the purchase
    #[sea_orm(has_many = "super::purchase_line::Entity")]
    PurchaseLine,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::purchase_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
