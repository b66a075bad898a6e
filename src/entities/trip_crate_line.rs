//! Trip crate line entity - Empty-crate movements of one crate type over one trip.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip crate line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_crate_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trip_id: i64,
    pub crate_id: i64,
    /// Crates still out from earlier trips when this one started
    pub previous_remaining: u32,
    pub issued_boxes: u32,
    pub returned_boxes: u32,
}

/// Defines relationships between trip crate lines and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
