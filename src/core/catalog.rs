//! Catalog snapshots and seeding.
//!
//! The trip ledger never talks to the database. This module builds the immutable
//! id → record maps it consumes, and inserts the seed from `config.toml`.

use crate::{
    config::catalog::CatalogConfig,
    core::{
        ledger::{CrateCatalog, CrateInfo, ProductCatalog, ProductInfo},
        vehicle::normalize_registration,
    },
    entities::{
        CrateBox, Employee, Product, Supplier, Vehicle, crate_box, employee, product, supplier,
        vehicle,
    },
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, info};

/// Summary of what [`seed_catalog`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Number of products inserted
    pub products: usize,
    /// Number of crate types inserted
    pub crates: usize,
    /// Number of vehicles inserted
    pub vehicles: usize,
    /// Number of suppliers inserted
    pub suppliers: usize,
    /// Number of employees inserted
    pub employees: usize,
}

/// Loads every product, deleted ones included, as a ledger catalog.
///
/// Deleted products stay in the snapshot so that old trips keep their designation
/// and price when they are reprinted.
pub async fn load_product_catalog<C>(db: &C) -> Result<ProductCatalog>
where
    C: ConnectionTrait,
{
    let products = Product::find().all(db).await?;
    debug!("Loaded product catalog with {} entries", products.len());
    Ok(products
        .into_iter()
        .map(|p| {
            (
                p.id,
                ProductInfo {
                    designation: p.designation,
                    unit_price: p.unit_price,
                    capacity_per_box: p.capacity_per_box,
                },
            )
        })
        .collect())
}

/// Loads every crate type, deleted ones included, as a ledger catalog.
pub async fn load_crate_catalog<C>(db: &C) -> Result<CrateCatalog>
where
    C: ConnectionTrait,
{
    let crates = CrateBox::find().all(db).await?;
    Ok(crates
        .into_iter()
        .map(|c| {
            (
                c.id,
                CrateInfo {
                    designation: c.designation,
                },
            )
        })
        .collect())
}

/// Inserts the records of `config` that are not yet known.
///
/// Records are matched on designation (products, crates), normalized registration
/// (vehicles) or name (suppliers, employees), deleted records included, so a record removed by an operator is not
/// brought back on the next start.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let now = chrono::Utc::now().naive_utc();

    for seed in &config.products {
        let exists = Product::find()
            .filter(product::Column::Designation.eq(seed.designation.trim()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        product::ActiveModel {
            designation: Set(seed.designation.trim().to_string()),
            unit_price: Set(seed.unit_price),
            capacity_per_box: Set(seed.capacity_per_box),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.products += 1;
    }

    for seed in &config.crates {
        let exists = CrateBox::find()
            .filter(crate_box::Column::Designation.eq(seed.designation.trim()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        crate_box::ActiveModel {
            designation: Set(seed.designation.trim().to_string()),
            is_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.crates += 1;
    }

    for seed in &config.vehicles {
        let registration = normalize_registration(&seed.registration);
        let exists = Vehicle::find()
            .filter(vehicle::Column::Registration.eq(registration.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        vehicle::ActiveModel {
            registration: Set(registration),
            label: Set(seed.label.clone()),
            is_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.vehicles += 1;
    }

    for seed in &config.suppliers {
        let exists = Supplier::find()
            .filter(supplier::Column::Name.eq(seed.name.trim()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        supplier::ActiveModel {
            name: Set(seed.name.trim().to_string()),
            phone: Set(seed.phone.clone()),
            is_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.suppliers += 1;
    }

    for seed in &config.employees {
        let exists = Employee::find()
            .filter(employee::Column::Name.eq(seed.name.trim()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        employee::ActiveModel {
            name: Set(seed.name.trim().to_string()),
            base_salary: Set(seed.base_salary),
            is_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.employees += 1;
    }

    info!(
        products = summary.products,
        crates = summary.crates,
        vehicles = summary.vehicles,
        suppliers = summary.suppliers,
        employees = summary.employees,
        "Catalog seed applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        config::catalog::{CrateSeed, EmployeeSeed, ProductSeed, SupplierSeed, VehicleSeed},
        core::product,
        test_utils::*,
    };

    fn seed() -> CatalogConfig {
        CatalogConfig {
            products: vec![ProductSeed {
                designation: "Cola 33cl".to_string(),
                unit_price: 45.0,
                capacity_per_box: 24,
            }],
            crates: vec![CrateSeed {
                designation: "Plastic 24".to_string(),
            }],
            vehicles: vec![VehicleSeed {
                registration: "ab 12".to_string(),
                label: None,
            }],
            suppliers: vec![SupplierSeed {
                name: "Bottler SA".to_string(),
                phone: None,
            }],
            employees: vec![EmployeeSeed {
                name: "Karim".to_string(),
                base_salary: 30_000.0,
            }],
        }
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = seed_catalog(&db, &seed()).await?;
        assert_eq!(
            first,
            SeedSummary {
                products: 1,
                crates: 1,
                vehicles: 1,
                suppliers: 1,
                employees: 1,
            }
        );

        let second = seed_catalog(&db, &seed()).await?;
        assert_eq!(second, SeedSummary::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_includes_deleted_products() -> Result<()> {
        let db = setup_test_db().await?;
        let cola = create_test_product(&db, "Cola").await?;
        product::delete_product(&db, cola.id).await?;

        let catalog = load_product_catalog(&db).await?;
        let info = catalog.get(&cola.id).unwrap();
        assert_eq!(info.designation, "Cola");
        assert_eq!(info.unit_price, cola.unit_price);
        assert_eq!(info.capacity_per_box, cola.capacity_per_box);
        Ok(())
    }

    #[tokio::test]
    async fn test_crate_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let plastic = create_test_crate(&db, "Plastic 24").await?;

        let catalog = load_crate_catalog(&db).await?;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[&plastic.id].designation, "Plastic 24");
        Ok(())
    }
}
