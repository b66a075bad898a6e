//! Vehicle entity - Trucks that go out on delivery trips.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vehicle database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    /// Unique identifier for the vehicle
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Registration plate, used by operators to pick the vehicle
    #[sea_orm(unique)]
    pub registration: String,
    /// Optional free-form label (e.g., "Blue van")
    pub label: Option<String>,
    /// Soft delete flag
    pub is_deleted: bool,
    /// When the vehicle was registered
    pub created_at: DateTime,
}

/// Defines relationships between Vehicle and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A vehicle goes out on many trips
    #[sea_orm(has_many = "super::trip::Entity")]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
