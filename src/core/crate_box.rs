//! Crate business logic - Catalog of reusable crate types.

use crate::{
    entities::{CrateBox, crate_box},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active crate types, ordered by designation.
pub async fn get_all_active_crates(db: &DatabaseConnection) -> Result<Vec<crate_box::Model>> {
    CrateBox::find()
        .filter(crate_box::Column::IsDeleted.eq(false))
        .order_by_asc(crate_box::Column::Designation)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a crate type by ID, deleted or not.
pub async fn get_crate_by_id<C>(db: &C, crate_id: i64) -> Result<Option<crate_box::Model>>
where
    C: ConnectionTrait,
{
    CrateBox::find_by_id(crate_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new crate type.
///
/// # Errors
/// Returns an error if the designation is blank or already taken.
pub async fn create_crate(db: &DatabaseConnection, designation: String) -> Result<crate_box::Model> {
    if designation.trim().is_empty() {
        return Err(Error::Validation {
            message: "Crate designation cannot be empty".to_string(),
        });
    }

    let model = crate_box::ActiveModel {
        designation: Set(designation.trim().to_string()),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Soft deletes a crate type.
///
/// # Errors
/// Returns an error if the crate type does not exist or is already deleted.
pub async fn delete_crate(db: &DatabaseConnection, crate_id: i64) -> Result<crate_box::Model> {
    let existing = CrateBox::find_by_id(crate_id)
        .one(db)
        .await?
        .filter(|c| !c.is_deleted)
        .ok_or_else(|| Error::CrateNotFound {
            id: crate_id.to_string(),
        })?;

    let mut model: crate_box::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.update(db).await.map_err(Into::into)
}
