//! Crate entity - Reusable shipping containers tracked by count only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Crate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "crates")]
pub struct Model {
    /// Unique identifier for the crate type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Plastic 24")
    #[sea_orm(unique)]
    pub designation: String,
    /// Soft delete flag
    pub is_deleted: bool,
    /// When the crate type was created
    pub created_at: DateTime,
}

/// Crate types have no relationships that are navigated from here
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
