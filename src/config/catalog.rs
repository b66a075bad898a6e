//! Catalog seed configuration loading from config.toml
//!
//! The seed file lists the products, crate types, vehicles, suppliers and employees
//! the desk should know about on first run. Missing records are inserted at startup; existing ones are
//! left untouched.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Products to seed
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Crate types to seed
    #[serde(default)]
    pub crates: Vec<CrateSeed>,
    /// Vehicles to seed
    #[serde(default)]
    pub vehicles: Vec<VehicleSeed>,
    /// Suppliers to seed
    #[serde(default)]
    pub suppliers: Vec<SupplierSeed>,
    /// Employees to seed
    #[serde(default)]
    pub employees: Vec<EmployeeSeed>,
}

/// Seed entry for a product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Display name, unique across products
    pub designation: String,
    /// Price of a single unit
    pub unit_price: f64,
    /// Units per box (0 for unit-only products)
    #[serde(default)]
    pub capacity_per_box: u32,
}

/// Seed entry for a crate type
#[derive(Debug, Deserialize, Clone)]
pub struct CrateSeed {
    /// Display name, unique across crate types
    pub designation: String,
}

/// Seed entry for a vehicle
#[derive(Debug, Deserialize, Clone)]
pub struct VehicleSeed {
    /// Registration plate
    pub registration: String,
    /// Optional label
    pub label: Option<String>,
}

/// Seed entry for a supplier
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierSeed {
    /// Name, unique across suppliers
    pub name: String,
    /// Optional contact phone
    pub phone: Option<String>,
}

/// Seed entry for an employee
#[derive(Debug, Deserialize, Clone)]
pub struct EmployeeSeed {
    /// Name, unique across employees
    pub name: String,
    /// Fixed monthly pay
    #[serde(default)]
    pub base_salary: f64,
}

/// Loads the catalog seed from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading catalog seed from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {path_ref:?}: {e}"),
    })
}

/// Loads the catalog seed named by `CATALOG_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: the desk simply starts with an empty seed.
pub fn load_default_config() -> Result<CatalogConfig> {
    let path = std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No catalog seed at {path}, skipping");
        return Ok(CatalogConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[products]]
            designation = "Cola 33cl"
            unit_price = 45.0
            capacity_per_box = 24

            [[products]]
            designation = "Ice bag"
            unit_price = 100.0

            [[crates]]
            designation = "Plastic 24"

            [[vehicles]]
            registration = "12345-116-16"
            label = "Blue van"

            [[suppliers]]
            name = "Bottler SA"

            [[employees]]
            name = "Karim"
            base_salary = 30000.0

            [[employees]]
            name = "Amine"
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.products.len(), 2);
        assert_eq!(config.products[0].designation, "Cola 33cl");
        assert_eq!(config.products[0].capacity_per_box, 24);
        assert_eq!(config.products[1].capacity_per_box, 0);
        assert_eq!(config.products[1].unit_price, 100.0);
        assert_eq!(config.crates[0].designation, "Plastic 24");
        assert_eq!(config.vehicles[0].label.as_deref(), Some("Blue van"));
        assert_eq!(config.suppliers[0].name, "Bottler SA");
        assert_eq!(config.suppliers[0].phone, None);
        assert_eq!(config.employees[0].base_salary, 30000.0);
        assert_eq!(config.employees[1].base_salary, 0.0);
    }

    #[test]
    fn test_sections_are_optional() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert!(config.products.is_empty());
        assert!(config.crates.is_empty());
        assert!(config.vehicles.is_empty());
        assert!(config.suppliers.is_empty());
        assert!(config.employees.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
    }
}
