//! Unified error type for the crate.
//!
//! Every variant maps to a stable code (see [`Error::code`]) so the operator
//! surface can show a field-level message and keep the rest of the form intact.

use std::fmt;
use thiserror::Error;

/// Which quantity of a line an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Whole boxes (crates of product, or empty crates)
    Boxes,
    /// Loose units
    Units,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boxes => write!(f, "boxes"),
            Self::Units => write!(f, "units"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Discord framework error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Invalid received amount: {amount}")]
    InvalidReceivedAmount { amount: f64 },

    #[error(
        "Product {entity_id}: returned {returned} {quantity} but only {available} were out"
    )]
    ReturnExceedsIssued {
        entity_id: i64,
        quantity: Quantity,
        returned: u64,
        available: u64,
    },

    #[error("Quantity overflow on line {entity_id}: {quantity} add up past {max}", max = u32::MAX)]
    QuantityOverflow { entity_id: i64, quantity: Quantity },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid line '{input}': {reason}")]
    InvalidLine { input: String, reason: String },

    #[error("Product not found: {id}")]
    ProductNotFound { id: String },

    #[error("Crate not found: {id}")]
    CrateNotFound { id: String },

    #[error("Supplier not found: {id}")]
    SupplierNotFound { id: String },

    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: String },

    #[error("Vehicle not found: {id}")]
    VehicleNotFound { id: String },

    #[error("Trip not found: {id}")]
    TripNotFound { id: i64 },

    #[error("Trip {id} is {status} and can no longer be changed")]
    TripNotActive { id: i64, status: String },

    #[error("Vehicle {id} still has active trip {trip_id}")]
    VehicleBusy { id: i64, trip_id: i64 },
}

impl Error {
    /// Stable, machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG",
            Self::Database(_) => "DATABASE",
            Self::EnvVar(_) => "ENV_VAR",
            Self::Discord(_) => "DISCORD",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidReceivedAmount { .. } => "INVALID_RECEIVED_AMOUNT",
            Self::ReturnExceedsIssued { .. } => "RETURN_EXCEEDS_ISSUED",
            Self::QuantityOverflow { .. } => "QUANTITY_OVERFLOW",
            Self::Validation { .. } => "VALIDATION",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
            Self::CrateNotFound { .. } => "CRATE_NOT_FOUND",
            Self::SupplierNotFound { .. } => "SUPPLIER_NOT_FOUND",
            Self::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            Self::VehicleNotFound { .. } => "VEHICLE_NOT_FOUND",
            Self::TripNotFound { .. } => "TRIP_NOT_FOUND",
            Self::TripNotActive { .. } => "TRIP_NOT_ACTIVE",
            Self::VehicleBusy { .. } => "VEHICLE_BUSY",
        }
    }

    /// True for errors the operator can fix by correcting their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::Config { .. } | Self::Database(_) | Self::EnvVar(_) | Self::Discord(_)
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = Error::ReturnExceedsIssued {
            entity_id: 4,
            quantity: Quantity::Boxes,
            returned: 6,
            available: 5,
        };
        assert_eq!(err.code(), "RETURN_EXCEEDS_ISSUED");
        assert_eq!(
            Error::InvalidReceivedAmount { amount: -1.0 }.code(),
            "INVALID_RECEIVED_AMOUNT"
        );
        assert_eq!(Error::TripNotFound { id: 1 }.code(), "TRIP_NOT_FOUND");
        assert_eq!(
            Error::QuantityOverflow {
                entity_id: 1,
                quantity: Quantity::Boxes
            }
            .code(),
            "QUANTITY_OVERFLOW"
        );
    }

    #[test]
    fn test_return_exceeds_message_names_quantity() {
        let err = Error::ReturnExceedsIssued {
            entity_id: 7,
            quantity: Quantity::Units,
            returned: 9,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Product 7: returned 9 units but only 3 were out"
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(Error::Validation { message: "x".into() }.is_user_error());
        assert!(
            !Error::Config {
                message: "x".into()
            }
            .is_user_error()
        );
    }
}
