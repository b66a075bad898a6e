//! Trip waste entity - Units written off during a trip (damage, exchange).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip waste database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_waste")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trip_id: i64,
    pub product_id: i64,
    pub quantity_units: u32,
    /// Free-form reason, e.g. `"damaged"` or `"exchange"`
    pub reason: Option<String>,
}

/// Defines relationships between waste entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one trip
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
