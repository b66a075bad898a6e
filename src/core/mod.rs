//! Core business logic, independent of the Discord layer.
//!
//! [`ledger`] is the pure reconciliation engine. The other modules load and store
//! catalog records, staff, trips and purchases through SeaORM and feed the ledger.

pub mod catalog;
pub mod crate_box;
pub mod employee;
pub mod invoice;
pub mod ledger;
pub mod payroll;
pub mod product;
pub mod purchase;
pub mod supplier;
pub mod trip;
pub mod vehicle;
