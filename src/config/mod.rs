/// Database configuration and connection management
pub mod database;

/// Catalog seed loading from config.toml
pub mod catalog;

/// Company profile printed on invoices, from environment variables
pub mod company;
