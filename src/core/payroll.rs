//! Payroll - what each employee is owed for a month.
//!
//! Pay is the employee's base salary. The trips they finished in the period are
//! listed next to it (count and billed revenue) for reference; no commission rate is
//! applied, since none has been agreed.

use crate::{
    core::trip::{self, TripStatus},
    entities::{Employee, Trip, employee, trip as trip_entity},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::debug;

/// A calendar month, as a half-open UTC interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    /// First instant of the month
    pub start: DateTime<Utc>,
    /// First instant of the next month
    pub end: DateTime<Utc>,
}

impl PayPeriod {
    /// The period for `month` (1-12) of `year`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the month is out of range.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let invalid = || Error::Validation {
            message: format!("Invalid month {year}-{month:02}"),
        };
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        let (next_year, next_month) = if month == 12 {
            (year.saturating_add(1), 1)
        } else {
            (year, month + 1)
        };
        let first_day = |y: i32, m: u32| {
            NaiveDate::from_ymd_opt(y, m, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
                .ok_or_else(invalid)
        };
        Ok(Self {
            start: first_day(year, month)?,
            end: first_day(next_year, next_month)?,
        })
    }

    /// The month `instant` falls in.
    ///
    /// # Errors
    /// Same as [`PayPeriod::month`].
    pub fn containing(instant: DateTime<Utc>) -> Result<Self> {
        Self::month(instant.year(), instant.month())
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.format("%Y-%m"))
    }
}

impl FromStr for PayPeriod {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation {
            message: format!("Expected a month as YYYY-MM, got '{s}'"),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::month(year, month)
    }
}

/// Pay of one employee over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollLine {
    /// Employee id
    pub employee_id: i64,
    /// Employee name
    pub name: String,
    /// Fixed monthly pay
    pub base_salary: f64,
    /// Trips the employee finished in the period
    pub finished_trips: usize,
    /// Sum of the expected amounts of those trips
    pub trip_revenue: f64,
    /// Amount owed; the base salary while no commission is applied
    pub net_pay: f64,
}

/// Computes the payroll of `period`, one line per employee, ordered by name.
///
/// Active employees are always listed. Deleted employees are listed only if they
/// finished a trip in the period. Rolled-over trips do not count.
pub async fn payroll_for_period(
    db: &DatabaseConnection,
    period: &PayPeriod,
) -> Result<Vec<PayrollLine>> {
    let trips = Trip::find()
        .filter(trip_entity::Column::Status.eq(TripStatus::Finished.as_str()))
        .filter(trip_entity::Column::EmployeeId.is_not_null())
        .filter(trip_entity::Column::ClosedAt.gte(period.start))
        .filter(trip_entity::Column::ClosedAt.lt(period.end))
        .all(db)
        .await?;
    debug!(period = %period, trips = trips.len(), "Computing payroll");

    let mut per_employee: HashMap<i64, (usize, f64)> = HashMap::new();
    for finished in trips {
        let Some(employee_id) = finished.employee_id else {
            continue;
        };
        let view = trip::load_trip_view(db, finished.id).await?;
        let entry = per_employee.entry(employee_id).or_default();
        entry.0 += 1;
        entry.1 += view.totals.expected_amount;
    }

    let employees = Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await?;
    Ok(employees
        .into_iter()
        .filter(|e| !e.is_deleted || per_employee.contains_key(&e.id))
        .map(|e| {
            let (finished_trips, trip_revenue) =
                per_employee.get(&e.id).copied().unwrap_or_default();
            PayrollLine {
                employee_id: e.id,
                name: e.name,
                base_salary: e.base_salary,
                finished_trips,
                trip_revenue,
                net_pay: e.base_salary,
            }
        })
        .collect())
}
