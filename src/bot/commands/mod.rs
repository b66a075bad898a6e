//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Product, crate and vehicle management commands
pub mod catalog;

/// General utility commands
pub mod general;

/// Monthly payroll command
pub mod payroll;

/// Supplier purchase commands
pub mod purchase;

/// Supplier and employee management commands
pub mod staff;

/// Trip lifecycle commands
pub mod trip;

// Export commands
pub use catalog::*;
pub use general::*;
pub use payroll::*;
pub use purchase::*;
pub use staff::*;
pub use trip::*;
