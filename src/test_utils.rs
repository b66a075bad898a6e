//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog records with sensible defaults.

use crate::{
    core::{crate_box, employee, product, supplier, vehicle},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `unit_price`: 2.0
/// * `capacity_per_box`: 10
pub async fn create_test_product(
    db: &DatabaseConnection,
    designation: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, designation.to_string(), 2.0, 10).await
}

/// Creates a test product with custom price and box capacity.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    designation: &str,
    unit_price: f64,
    capacity_per_box: u32,
) -> Result<entities::product::Model> {
    product::create_product(db, designation.to_string(), unit_price, capacity_per_box).await
}

/// Creates a test crate type.
pub async fn create_test_crate(
    db: &DatabaseConnection,
    designation: &str,
) -> Result<entities::crate_box::Model> {
    crate_box::create_crate(db, designation.to_string()).await
}

/// Creates a test vehicle without a label.
pub async fn create_test_vehicle(
    db: &DatabaseConnection,
    registration: &str,
) -> Result<entities::vehicle::Model> {
    vehicle::create_vehicle(db, registration, None).await
}

/// Creates a test supplier without a phone number.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(db, name, None).await
}

/// Creates a test employee with a base salary of 30000.0.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, name, 30_000.0).await
}

/// A database with a small catalog, for trip scenarios.
pub struct CatalogFixture {
    pub db: DatabaseConnection,
    /// Vehicle `TRUCK1`
    pub vehicle: entities::vehicle::Model,
    /// Product "Cola", 2.0 per unit, 10 per box
    pub cola: entities::product::Model,
    /// Product "Water", 2.0 per unit, 10 per box
    pub water: entities::product::Model,
    /// Crate type "Plastic 24"
    pub plastic: entities::crate_box::Model,
    /// Employee "Karim", 30000.0 per month
    pub driver: entities::employee::Model,
}

/// Sets up a complete test environment with one vehicle, two products, one crate type
/// and one driver.
pub async fn setup_with_catalog() -> Result<CatalogFixture> {
    let db = setup_test_db().await?;
    let vehicle = create_test_vehicle(&db, "TRUCK1").await?;
    let cola = create_test_product(&db, "Cola").await?;
    let water = create_test_product(&db, "Water").await?;
    let plastic = create_test_crate(&db, "Plastic 24").await?;
    let driver = create_test_employee(&db, "Karim").await?;
    Ok(CatalogFixture {
        db,
        vehicle,
        cola,
        water,
        plastic,
        driver,
    })
}
