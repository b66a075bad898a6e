//! Product business logic - Handles all product-related catalog operations.
//!
//! Products are what the trucks sell: each has a unit price and a box capacity used
//! by the trip ledger to convert boxes into units. Products are soft deleted so that
//! trips and purchases recorded against them keep their designation and price.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all active (non-deleted) products, ordered alphabetically by designation.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Designation)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its designation, returning None if not found or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_designation(
    db: &DatabaseConnection,
    designation: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Designation.eq(designation.trim()))
        .filter(product::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, deleted or not.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

fn validate_price(price: f64) -> Result<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The designation is empty or whitespace-only
/// - The unit price is negative or not finite (NaN, infinity)
/// - The database insert operation fails (e.g. duplicate designation)
pub async fn create_product(
    db: &DatabaseConnection,
    designation: String,
    unit_price: f64,
    capacity_per_box: u32,
) -> Result<product::Model> {
    if designation.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product designation cannot be empty".to_string(),
        });
    }
    validate_price(unit_price)?;

    let now = chrono::Utc::now().naive_utc();

    let product = product::ActiveModel {
        designation: Set(designation.trim().to_string()),
        unit_price: Set(unit_price),
        capacity_per_box: Set(capacity_per_box),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let product = product.insert(db).await?;
    info!(product_id = product.id, "Created product {}", product.designation);
    Ok(product)
}

/// Changes the unit price of an active product.
///
/// Trips already finished are not repriced: their invoices use the catalog snapshot
/// at the time they are printed, so price changes should happen between trips.
///
/// # Errors
/// Returns an error if:
/// - The price is negative or not finite
/// - The product does not exist or is deleted
/// - The database update operation fails
pub async fn update_product_price(
    db: &DatabaseConnection,
    product_id: i64,
    new_price: f64,
) -> Result<product::Model> {
    validate_price(new_price)?;

    let mut product: product::ActiveModel = active_product(db, product_id).await?.into();
    product.unit_price = Set(new_price);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Soft deletes a product by marking it as deleted, preserving trip history.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = active_product(db, product_id).await?.into();

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

async fn active_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .filter(|product| !product.is_deleted)
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test empty designation validation
        let result = create_product(&db, String::new(), 10.0, 12).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Test whitespace-only designation validation
        let result = create_product(&db, "   ".to_string(), 10.0, 12).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Test negative price validation
        let result = create_product(&db, "Cola".to_string(), -10.0, 12).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -10.0 }
        ));

        // Test NaN and infinity price validation
        let result = create_product(&db, "Cola".to_string(), f64::NAN, 12).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        let result = create_product(&db, "Cola".to_string(), f64::INFINITY, 12).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, "  Cola 33cl ".to_string(), 45.0, 24).await?;

        assert_eq!(product.designation, "Cola 33cl");
        assert_eq!(product.unit_price, 45.0);
        assert_eq!(product.capacity_per_box, 24);
        assert!(!product.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_designation_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        create_product(&db, "Cola".to_string(), 45.0, 24).await?;
        let result = create_product(&db, "Cola".to_string(), 50.0, 12).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_by_designation_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_product(&db, "Water 1.5L").await?;

        let found = get_product_by_designation(&db, "Water 1.5L").await?;
        assert_eq!(found.unwrap().id, created.id);

        let not_found = get_product_by_designation(&db, "Lemonade").await?;
        assert!(not_found.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_active_products_ordered() -> Result<()> {
        let db = setup_test_db().await?;
        let water = create_test_product(&db, "Water").await?;
        let cola = create_test_product(&db, "Cola").await?;

        let products = get_all_active_products(&db).await?;
        assert_eq!(products, vec![cola, water]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_price_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Cola").await?;

        let updated = update_product_price(&db, product.id, 60.0).await?;
        assert_eq!(updated.unit_price, 60.0);

        let retrieved = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(retrieved.unit_price, 60.0);

        let result = update_product_price(&db, product.id, -1.0).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Cola").await?;

        let deleted = delete_product(&db, product.id).await?;
        assert!(deleted.is_deleted);
        assert!(get_all_active_products(&db).await?.is_empty());

        // Still reachable by id for historical trips
        assert!(get_product_by_id(&db, product.id).await?.is_some());

        // Deleting twice is a not-found
        let result = delete_product(&db, product.id).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_product(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { .. }));

        Ok(())
    }
}
