//! Trip product line entity - Stock of one product over one trip.
//!
//! `remaining_*` is what the vehicle already carried, `issued_*` what was loaded
//! for the trip, `returned_*` what came back (zero until the trip finishes).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip product line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_product_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trip_id: i64,
    pub product_id: i64,
    pub remaining_boxes: u32,
    pub remaining_units: u32,
    pub issued_boxes: u32,
    pub issued_units: u32,
    pub returned_boxes: u32,
    pub returned_units: u32,
}

/// Defines relationships between trip product lines and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    /// Each line refers to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
