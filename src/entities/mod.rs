//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod crate_box;
pub mod employee;
pub mod product;
pub mod purchase;
pub mod purchase_line;
pub mod supplier;
pub mod trip;
pub mod trip_charge;
pub mod trip_crate_line;
pub mod trip_product_line;
pub mod trip_waste;
pub mod vehicle;

// Re-export specific types to avoid conflicts
pub use crate_box::{Column as CrateColumn, Entity as CrateBox, Model as CrateModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use purchase_line::{
    Column as PurchaseLineColumn, Entity as PurchaseLine, Model as PurchaseLineModel,
};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
pub use trip_charge::{Column as TripChargeColumn, Entity as TripCharge, Model as TripChargeModel};
pub use trip_crate_line::{
    Column as TripCrateLineColumn, Entity as TripCrateLine, Model as TripCrateLineModel,
};
pub use trip_product_line::{
    Column as TripProductLineColumn, Entity as TripProductLine, Model as TripProductLineModel,
};
pub use trip_waste::{Column as TripWasteColumn, Entity as TripWaste, Model as TripWasteModel};
pub use vehicle::{Column as VehicleColumn, Entity as Vehicle, Model as VehicleModel};
