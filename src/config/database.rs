//! Database configuration module.
//!
//! This module handles the `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.
//! Creation uses `IF NOT EXISTS`, which makes it safe to run on every start.

use crate::entities::{
    CrateBox, Employee, Product, Purchase, PurchaseLine, Supplier, Trip, TripCharge,
    TripCrateLine, TripProductLine, TripWaste, Vehicle,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/tournee.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the
/// default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    debug!("Ensuring table {}", entity.table_name());
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables that do not exist yet.
///
/// Parent tables are created before the tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Product).await?;
    create_table(db, &schema, CrateBox).await?;
    create_table(db, &schema, Vehicle).await?;
    create_table(db, &schema, Employee).await?;
    create_table(db, &schema, Supplier).await?;
    create_table(db, &schema, Trip).await?;
    create_table(db, &schema, TripProductLine).await?;
    create_table(db, &schema, TripCrateLine).await?;
    create_table(db, &schema, TripWaste).await?;
    create_table(db, &schema, TripCharge).await?;
    create_table(db, &schema, Purchase).await?;
    create_table(db, &schema, PurchaseLine).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ProductModel, TripModel, VehicleModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<VehicleModel> = Vehicle::find().limit(1).all(&db).await?;
        let _: Vec<TripModel> = Trip::find().limit(1).all(&db).await?;
        let _ = TripProductLine::find().limit(1).all(&db).await?;
        let _ = PurchaseLine::find().limit(1).all(&db).await?;
        let _ = Supplier::find().limit(1).all(&db).await?;
        let _ = Employee::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
