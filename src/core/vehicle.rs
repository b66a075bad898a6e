//! Vehicle business logic - Trucks available for delivery trips.
//!
//! Vehicles are picked by registration plate. A vehicle with an active trip cannot
//! be removed from the fleet until that trip is finished.

use crate::{
    core::trip,
    entities::{Vehicle, vehicle},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Normalizes a registration plate for storage and lookups.
///
/// Whitespace is dropped and letters are upper-cased, so `"12345 116 16"` and
/// `"12345116 16"` refer to the same truck.
#[must_use]
pub fn normalize_registration(registration: &str) -> String {
    registration
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Retrieves all active vehicles, ordered by registration.
pub async fn get_all_active_vehicles(db: &DatabaseConnection) -> Result<Vec<vehicle::Model>> {
    Vehicle::find()
        .filter(vehicle::Column::IsDeleted.eq(false))
        .order_by_asc(vehicle::Column::Registration)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active vehicle by registration plate.
pub async fn get_vehicle_by_registration(
    db: &DatabaseConnection,
    registration: &str,
) -> Result<Option<vehicle::Model>> {
    Vehicle::find()
        .filter(vehicle::Column::Registration.eq(normalize_registration(registration)))
        .filter(vehicle::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a vehicle by ID, deleted or not.
pub async fn get_vehicle_by_id<C>(db: &C, vehicle_id: i64) -> Result<Option<vehicle::Model>>
where
    C: ConnectionTrait,
{
    Vehicle::find_by_id(vehicle_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new vehicle.
///
/// # Errors
/// Returns an error if the registration is blank or already registered.
pub async fn create_vehicle(
    db: &DatabaseConnection,
    registration: &str,
    label: Option<String>,
) -> Result<vehicle::Model> {
    let registration = normalize_registration(registration);
    if registration.is_empty() {
        return Err(Error::Validation {
            message: "Vehicle registration cannot be empty".to_string(),
        });
    }

    let model = vehicle::ActiveModel {
        registration: Set(registration),
        label: Set(label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let vehicle = model.insert(db).await?;
    info!(vehicle_id = vehicle.id, "Registered vehicle {}", vehicle.registration);
    Ok(vehicle)
}

/// Soft deletes a vehicle.
///
/// # Errors
/// Returns an error if:
/// - The vehicle does not exist or is already deleted
/// - The vehicle still has an active trip
pub async fn delete_vehicle(db: &DatabaseConnection, vehicle_id: i64) -> Result<vehicle::Model> {
    let existing = Vehicle::find_by_id(vehicle_id)
        .one(db)
        .await?
        .filter(|v| !v.is_deleted)
        .ok_or_else(|| Error::VehicleNotFound {
            id: vehicle_id.to_string(),
        })?;

    if let Some(active_trip) = trip::get_active_trip_for_vehicle(db, vehicle_id).await? {
        return Err(Error::VehicleBusy {
            id: vehicle_id,
            trip_id: active_trip.id,
        });
    }

    let mut model: vehicle::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration(" 12345 116 16 "), "1234511616");
        assert_eq!(normalize_registration("ab-12"), "AB-12");
    }

    #[tokio::test]
    async fn test_create_and_find_vehicle() -> Result<()> {
        let db = setup_test_db().await?;
        let vehicle = create_vehicle(&db, "ab 123", Some(" Blue van ".to_string())).await?;

        assert_eq!(vehicle.registration, "AB123");
        assert_eq!(vehicle.label.as_deref(), Some("Blue van"));

        let found = get_vehicle_by_registration(&db, "Ab123").await?;
        assert_eq!(found.unwrap().id, vehicle.id);
        assert_eq!(get_all_active_vehicles(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_vehicle_rejects_blank() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_vehicle(&db, "   ", None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_vehicle_with_active_trip_is_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let vehicle = create_test_vehicle(&db, "TRUCK1").await?;
        let started = trip::start_trip(&db, trip::NewTrip::for_vehicle(vehicle.id)).await?;

        let result = delete_vehicle(&db, vehicle.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::VehicleBusy { trip_id, .. } if trip_id == started.id
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_vehicle() -> Result<()> {
        let db = setup_test_db().await?;
        let vehicle = create_test_vehicle(&db, "TRUCK1").await?;

        let deleted = delete_vehicle(&db, vehicle.id).await?;
        assert!(deleted.is_deleted);
        assert!(get_vehicle_by_registration(&db, "TRUCK1").await?.is_none());

        let result = delete_vehicle(&db, vehicle.id).await;
        assert!(matches!(result.unwrap_err(), Error::VehicleNotFound { .. }));
        Ok(())
    }
}
