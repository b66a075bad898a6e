//! Employee business logic - drivers and sellers on the payroll.

use crate::{
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

fn validate_salary(salary: f64) -> Result<()> {
    if salary < 0.0 || !salary.is_finite() {
        return Err(Error::InvalidAmount { amount: salary });
    }
    Ok(())
}

/// Retrieves all active employees, ordered by name.
pub async fn get_all_active_employees<C>(db: &C) -> Result<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find()
        .filter(employee::Column::IsDeleted.eq(false))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active employee by name, returning None if not found or deleted.
pub async fn get_employee_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Name.eq(name.trim()))
        .filter(employee::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an employee by ID, deleted or not.
pub async fn get_employee_by_id<C>(db: &C, employee_id: i64) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds an employee with a fixed monthly pay.
///
/// # Errors
/// Returns an error if:
/// - The name is blank or already taken
/// - The salary is negative or not finite
pub async fn create_employee(
    db: &DatabaseConnection,
    name: &str,
    base_salary: f64,
) -> Result<employee::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Employee name cannot be empty".to_string(),
        });
    }
    validate_salary(base_salary)?;

    let employee = employee::ActiveModel {
        name: Set(name.to_string()),
        base_salary: Set(base_salary),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(employee_id = employee.id, "Added employee {}", employee.name);
    Ok(employee)
}

/// Changes the monthly pay of an employee.
///
/// # Errors
/// Returns an error if the salary is invalid or the employee does not exist.
pub async fn update_employee_salary(
    db: &DatabaseConnection,
    employee_id: i64,
    base_salary: f64,
) -> Result<employee::Model> {
    validate_salary(base_salary)?;

    let mut model: employee::ActiveModel = active_employee(db, employee_id).await?.into();
    model.base_salary = Set(base_salary);
    model.update(db).await.map_err(Into::into)
}

/// Soft deletes an employee. Trips they drove keep their name.
///
/// # Errors
/// Returns an error if the employee does not exist or is already deleted.
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<employee::Model> {
    let mut model: employee::ActiveModel = active_employee(db, employee_id).await?.into();
    model.is_deleted = Set(true);
    model.update(db).await.map_err(Into::into)
}

async fn active_employee(db: &DatabaseConnection, employee_id: i64) -> Result<employee::Model> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or_else(|| Error::EmployeeNotFound {
            id: employee_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_and_find_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let karim = create_employee(&db, " Karim ", 30_000.0).await?;

        assert_eq!(karim.name, "Karim");
        assert_eq!(karim.base_salary, 30_000.0);
        assert_eq!(get_employee_by_name(&db, "Karim").await?.unwrap().id, karim.id);
        assert_eq!(get_all_active_employees(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_employee_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_employee(&db, " ", 1.0).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_employee(&db, "Karim", -5.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == -5.0
        ));

        let result = update_employee_salary(&db, 1, f64::NAN).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_salary_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let karim = create_test_employee(&db, "Karim").await?;

        let updated = update_employee_salary(&db, karim.id, 32_500.0).await?;
        assert_eq!(updated.base_salary, 32_500.0);

        delete_employee(&db, karim.id).await?;
        assert!(get_employee_by_name(&db, "Karim").await?.is_none());
        assert!(get_employee_by_id(&db, karim.id).await?.unwrap().is_deleted);

        let result = update_employee_salary(&db, karim.id, 1.0).await;
        assert!(matches!(result.unwrap_err(), Error::EmployeeNotFound { .. }));
        Ok(())
    }
}
