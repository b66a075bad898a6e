//! Supplier business logic - who the company buys its stock from.
//!
//! Purchases reference a supplier by id and keep a copy of its name, so deleting a
//! supplier does not change past purchases.

use crate::{
    entities::{Supplier, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all active suppliers, ordered by name.
pub async fn get_all_active_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    Supplier::find()
        .filter(supplier::Column::IsDeleted.eq(false))
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active supplier by name, returning None if not found or deleted.
pub async fn get_supplier_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<supplier::Model>> {
    Supplier::find()
        .filter(supplier::Column::Name.eq(name.trim()))
        .filter(supplier::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a supplier by ID, deleted or not.
pub async fn get_supplier_by_id<C>(db: &C, supplier_id: i64) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a supplier.
///
/// # Errors
/// Returns an error if the name is blank or already taken.
pub async fn create_supplier(
    db: &DatabaseConnection,
    name: &str,
    phone: Option<String>,
) -> Result<supplier::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Supplier name cannot be empty".to_string(),
        });
    }

    let supplier = supplier::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(supplier_id = supplier.id, "Added supplier {}", supplier.name);
    Ok(supplier)
}

/// Soft deletes a supplier.
///
/// # Errors
/// Returns an error if the supplier does not exist or is already deleted.
pub async fn delete_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<supplier::Model> {
    let existing = Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .filter(|s| !s.is_deleted)
        .ok_or_else(|| Error::SupplierNotFound {
            id: supplier_id.to_string(),
        })?;

    let mut model: supplier::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.update(db).await.map_err(Into::into)
}
