//! Trip entity - One dispatch cycle of a vehicle.
//!
//! `status` is one of `"active"`, `"finished"` or `"rolled_over"`. Only active trips
//! may change; `received_amount` is set when the trip finishes.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Vehicle dispatched on this trip
    pub vehicle_id: i64,
    /// Employee who drove the trip, if recorded
    pub employee_id: Option<i64>,
    /// Employee name at the time the trip started
    pub driver: Option<String>,
    /// Lifecycle status
    pub status: String,
    /// When the trip was started
    pub started_at: DateTimeUtc,
    /// When the trip was finished or rolled over
    pub closed_at: Option<DateTimeUtc>,
    /// Cash handed in when the trip finished
    pub received_amount: Option<f64>,
}

/// Defines relationships between Trip and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each trip belongs to one vehicle
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    /// The driver, when one was recorded
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// Product lines of the trip
    #[sea_orm(has_many = "super::trip_product_line::Entity")]
    TripProductLine,
    /// Crate lines of the trip
    #[sea_orm(has_many = "super::trip_crate_line::Entity")]
    TripCrateLine,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::trip_product_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripProductLine.def()
    }
}

impl Related<super::trip_crate_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripCrateLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
