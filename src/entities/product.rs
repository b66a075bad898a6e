//! Product entity - Represents a sellable product of the catalog.
//!
//! Products are sold by the box (crate of `capacity_per_box` units) or by the unit.
//! Records are soft deleted so historical trips keep resolving their designation and price.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Cola 33cl")
    #[sea_orm(unique)]
    pub designation: String,
    /// Price of a single unit
    pub unit_price: f64,
    /// Number of units in one box; zero for products sold by the unit only
    pub capacity_per_box: u32,
    /// Soft delete flag - if true, product is hidden but data is preserved
    pub is_deleted: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Products are referenced by trip, waste and purchase lines
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Trip lines carrying this product
    #[sea_orm(has_many = "super::trip_product_line::Entity")]
    TripProductLine,
}

impl Related<super::trip_product_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripProductLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
