//! Trip lifecycle business logic - start, view and finish delivery trips.
//!
//! A trip is started for a vehicle with the stock issued to it, runs while the driver
//! sells, and is finished once returns, waste, charges and the cash handed in are
//! recorded. Every view of a trip (running, being finished, reprinted) goes through
//! the same [`ledger`] reconciliation over the stored lines, so the figures agree
//! wherever they are shown.
//!
//! A vehicle has at most one active trip. Starting a new trip while one is still
//! active rolls the old one over: what it had on board becomes the new trip's
//! carry-over, is booked as handed back on the old trip, and the old trip is closed
//! as `rolled_over`. The goods are therefore sold (and billed) on the new trip only.
//! Crates that never came back are carried from the latest trip whatever its status.

use crate::{
    core::{
        catalog, crate_box, employee,
        ledger::{
            self, CarryOverLine, ChargeLine, CrateCatalog, IssueLine, ProductCatalog,
            ReconciledCrateLine, ReconciledProductLine, ReturnLine, Totals, UNKNOWN_DESIGNATION,
            WasteLine,
        },
        product, vehicle,
    },
    entities::{
        Trip, TripCharge, TripCrateLine, TripProductLine, TripWaste, trip, trip_charge,
        trip_crate_line, trip_product_line, trip_waste,
    },
    errors::{Error, Quantity, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::{info, instrument};

/// Lifecycle status of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TripStatus {
    /// On the road; lines may still change
    Active,
    /// Closed with returns and cash recorded; read-only
    Finished,
    /// Superseded by a newer trip of the same vehicle before it was finished; its
    /// stock was handed to that trip, so it sells nothing itself
    RolledOver,
}

impl TripStatus {
    /// Value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::RolledOver => "rolled_over",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            "rolled_over" => Ok(Self::RolledOver),
            other => Err(Error::Validation {
                message: format!("Unknown trip status '{other}'"),
            }),
        }
    }
}

/// Input for [`start_trip`].
#[derive(Debug, Clone, Default)]
pub struct NewTrip {
    /// Vehicle going out
    pub vehicle_id: i64,
    /// Employee driving it, if recorded
    pub employee_id: Option<i64>,
    /// Products loaded on top of the carry-over
    pub product_issues: Vec<IssueLine>,
    /// Crates loaded on top of the carry-over
    pub crate_issues: Vec<IssueLine>,
}

impl NewTrip {
    /// A trip for `vehicle_id` with nothing issued yet.
    #[must_use]
    pub fn for_vehicle(vehicle_id: i64) -> Self {
        Self {
            vehicle_id,
            ..Self::default()
        }
    }
}

/// Units of a product written off during the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasteEntry {
    /// Product written off
    pub product_id: i64,
    /// Units written off
    pub quantity_units: u32,
    /// Why (e.g., "broken")
    pub reason: Option<String>,
}

/// Input for [`finish_trip`] and [`preview_finish`].
#[derive(Debug, Clone, Default)]
pub struct FinishTrip {
    /// Products brought back
    pub product_returns: Vec<ReturnLine>,
    /// Crates brought back
    pub crate_returns: Vec<ReturnLine>,
    /// Products written off
    pub waste: Vec<WasteEntry>,
    /// Expenses paid by the driver
    pub charges: Vec<ChargeLine>,
    /// Cash handed in
    pub received_amount: f64,
}

/// What a vehicle still carries before its next trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryOver {
    /// Product stock of the active trip that would be rolled over
    pub products: Vec<CarryOverLine>,
    /// Crates not yet returned
    pub crates: Vec<CarryOverLine>,
    /// The active trip that a new trip would roll over
    pub rolled_trip: Option<i64>,
}

/// A waste entry with its designation and cost resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteItem {
    /// Product written off
    pub product_id: i64,
    /// Catalog designation, or `<unknown>`
    pub designation: String,
    /// Units written off
    pub quantity_units: u32,
    /// Units priced at the product's unit price
    pub cost: f64,
    /// Why, if given
    pub reason: Option<String>,
}

/// Everything needed to display or print a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripView {
    /// Trip id
    pub trip_id: i64,
    /// Vehicle id
    pub vehicle_id: i64,
    /// Registration plate, or `<unknown>` if the vehicle record is gone
    pub vehicle_registration: String,
    /// Driver id, if recorded
    pub employee_id: Option<i64>,
    /// Driver name as recorded when the trip started
    pub driver: Option<String>,
    /// Lifecycle status
    pub status: TripStatus,
    /// When the trip started
    pub started_at: DateTime<Utc>,
    /// When the trip was finished or rolled over
    pub closed_at: Option<DateTime<Utc>>,
    /// Cash handed in, `None` while the trip runs
    pub received_amount: Option<f64>,
    /// One line per product, ordered by id
    pub products: Vec<ReconciledProductLine>,
    /// One line per crate type, ordered by id
    pub crates: Vec<ReconciledCrateLine>,
    /// Waste with designations and costs
    pub waste: Vec<WasteItem>,
    /// Charges in entry order
    pub charges: Vec<ChargeLine>,
    /// Money figures
    pub totals: Totals,
}

/// Stored rows of one trip.
struct TripRecords {
    trip: trip::Model,
    vehicle_registration: String,
    product_lines: Vec<trip_product_line::Model>,
    crate_lines: Vec<trip_crate_line::Model>,
    waste: Vec<trip_waste::Model>,
    charges: Vec<trip_charge::Model>,
}

/// Retrieves a trip by its ID.
pub async fn get_trip_by_id<C>(db: &C, trip_id: i64) -> Result<Option<trip::Model>>
where
    C: ConnectionTrait,
{
    Trip::find_by_id(trip_id).one(db).await.map_err(Into::into)
}

/// Retrieves the active trip of a vehicle, if any.
pub async fn get_active_trip_for_vehicle<C>(db: &C, vehicle_id: i64) -> Result<Option<trip::Model>>
where
    C: ConnectionTrait,
{
    Trip::find()
        .filter(trip::Column::VehicleId.eq(vehicle_id))
        .filter(trip::Column::Status.eq(TripStatus::Active.as_str()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the most recent trips, newest first, optionally for a single vehicle.
pub async fn list_trips(
    db: &DatabaseConnection,
    vehicle_id: Option<i64>,
    limit: u64,
) -> Result<Vec<trip::Model>> {
    let mut query = Trip::find().order_by_desc(trip::Column::Id);
    if let Some(vehicle_id) = vehicle_id {
        query = query.filter(trip::Column::VehicleId.eq(vehicle_id));
    }
    query.limit(limit).all(db).await.map_err(Into::into)
}

async fn latest_trip_for_vehicle<C>(db: &C, vehicle_id: i64) -> Result<Option<trip::Model>>
where
    C: ConnectionTrait,
{
    Trip::find()
        .filter(trip::Column::VehicleId.eq(vehicle_id))
        .order_by_desc(trip::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

fn product_inputs(
    lines: &[trip_product_line::Model],
) -> (Vec<CarryOverLine>, Vec<IssueLine>, Vec<ReturnLine>) {
    let carry_over = lines
        .iter()
        .map(|l| CarryOverLine {
            entity_id: l.product_id,
            remaining_boxes: l.remaining_boxes,
            remaining_units: l.remaining_units,
        })
        .collect();
    let issues = lines
        .iter()
        .map(|l| IssueLine {
            entity_id: l.product_id,
            issued_boxes: l.issued_boxes,
            issued_units: l.issued_units,
        })
        .collect();
    let returns = lines
        .iter()
        .map(|l| ReturnLine {
            entity_id: l.product_id,
            returned_boxes: l.returned_boxes,
            returned_units: l.returned_units,
        })
        .collect();
    (carry_over, issues, returns)
}

fn crate_inputs(
    lines: &[trip_crate_line::Model],
) -> (Vec<CarryOverLine>, Vec<IssueLine>, Vec<ReturnLine>) {
    let carry_over = lines
        .iter()
        .map(|l| CarryOverLine {
            entity_id: l.crate_id,
            remaining_boxes: l.previous_remaining,
            remaining_units: 0,
        })
        .collect();
    let issues = lines
        .iter()
        .map(|l| IssueLine {
            entity_id: l.crate_id,
            issued_boxes: l.issued_boxes,
            issued_units: 0,
        })
        .collect();
    let returns = lines
        .iter()
        .map(|l| ReturnLine {
            entity_id: l.crate_id,
            returned_boxes: l.returned_boxes,
            returned_units: 0,
        })
        .collect();
    (carry_over, issues, returns)
}

async fn load_records<C>(db: &C, trip_id: i64) -> Result<TripRecords>
where
    C: ConnectionTrait,
{
    let trip = get_trip_by_id(db, trip_id)
        .await?
        .ok_or(Error::TripNotFound { id: trip_id })?;

    let vehicle_registration = vehicle::get_vehicle_by_id(db, trip.vehicle_id)
        .await?
        .map_or_else(|| UNKNOWN_DESIGNATION.to_string(), |v| v.registration);

    let product_lines = TripProductLine::find()
        .filter(trip_product_line::Column::TripId.eq(trip_id))
        .order_by_asc(trip_product_line::Column::Id)
        .all(db)
        .await?;
    let crate_lines = TripCrateLine::find()
        .filter(trip_crate_line::Column::TripId.eq(trip_id))
        .order_by_asc(trip_crate_line::Column::Id)
        .all(db)
        .await?;
    let waste = TripWaste::find()
        .filter(trip_waste::Column::TripId.eq(trip_id))
        .order_by_asc(trip_waste::Column::Id)
        .all(db)
        .await?;
    let charges = TripCharge::find()
        .filter(trip_charge::Column::TripId.eq(trip_id))
        .order_by_asc(trip_charge::Column::Id)
        .all(db)
        .await?;

    Ok(TripRecords {
        trip,
        vehicle_registration,
        product_lines,
        crate_lines,
        waste,
        charges,
    })
}

fn is_nonzero_return(line: &ReturnLine) -> bool {
    line.returned_boxes > 0 || line.returned_units > 0
}

/// Reconciles stored rows, plus the submitted finish data when a trip is being closed.
fn reconcile_view(
    records: &TripRecords,
    pending: Option<&FinishTrip>,
    products: &ProductCatalog,
    crates: &CrateCatalog,
) -> Result<TripView> {
    let (product_carry, product_issues, mut product_returns) =
        product_inputs(&records.product_lines);
    let (crate_carry, crate_issues, mut crate_returns) = crate_inputs(&records.crate_lines);

    let (waste_entries, charges, received_amount) = match pending {
        Some(finish) => {
            product_returns.extend(finish.product_returns.iter().filter(|l| is_nonzero_return(l)));
            crate_returns.extend(finish.crate_returns.iter().filter(|l| l.returned_boxes > 0));
            (
                finish.waste.clone(),
                finish.charges.clone(),
                Some(finish.received_amount),
            )
        }
        None => (
            records
                .waste
                .iter()
                .map(|w| WasteEntry {
                    product_id: w.product_id,
                    quantity_units: w.quantity_units,
                    reason: w.reason.clone(),
                })
                .collect(),
            records
                .charges
                .iter()
                .map(|c| ChargeLine {
                    charge_type: c.charge_type.clone(),
                    amount: c.amount,
                })
                .collect(),
            records.trip.received_amount,
        ),
    };

    let product_lines =
        ledger::reconcile_products(&product_carry, &product_issues, &product_returns, products)?;
    let crate_lines = ledger::reconcile_crates(&crate_carry, &crate_issues, &crate_returns, crates);

    let waste_lines: Vec<WasteLine> = waste_entries
        .iter()
        .map(|w| WasteLine {
            entity_id: w.product_id,
            quantity_units: w.quantity_units,
        })
        .collect();
    let totals = ledger::compute_totals(
        &product_lines,
        &waste_lines,
        &charges,
        received_amount,
        products,
    )?;

    let waste = waste_entries
        .into_iter()
        .map(|w| {
            let (designation, unit_price) = products.get(&w.product_id).map_or_else(
                || (UNKNOWN_DESIGNATION.to_string(), 0.0),
                |info| (info.designation.clone(), info.unit_price),
            );
            WasteItem {
                product_id: w.product_id,
                designation,
                quantity_units: w.quantity_units,
                cost: f64::from(w.quantity_units) * unit_price,
                reason: w.reason,
            }
        })
        .collect();

    Ok(TripView {
        trip_id: records.trip.id,
        vehicle_id: records.trip.vehicle_id,
        vehicle_registration: records.vehicle_registration.clone(),
        employee_id: records.trip.employee_id,
        driver: records.trip.driver.clone(),
        status: records.trip.status.parse()?,
        started_at: records.trip.started_at,
        closed_at: records.trip.closed_at,
        received_amount,
        products: product_lines,
        crates: crate_lines,
        waste,
        charges,
        totals,
    })
}

/// Computes what a vehicle still carries from its previous trip.
///
/// Product stock is only carried when the latest trip is still active (it would be
/// rolled over); a finished trip has accounted for all its products. Crates that
/// never came back are carried from the latest trip whatever its status.
pub async fn carry_over_for_vehicle<C>(db: &C, vehicle_id: i64) -> Result<CarryOver>
where
    C: ConnectionTrait,
{
    let Some(latest) = latest_trip_for_vehicle(db, vehicle_id).await? else {
        return Ok(CarryOver::default());
    };
    let records = load_records(db, latest.id).await?;
    let product_catalog = catalog::load_product_catalog(db).await?;
    let crate_catalog = catalog::load_crate_catalog(db).await?;
    let view = reconcile_view(&records, None, &product_catalog, &crate_catalog)?;

    let is_active = view.status == TripStatus::Active;
    Ok(CarryOver {
        products: if is_active {
            ledger::product_carry_over(&view.products)
        } else {
            Vec::new()
        },
        crates: ledger::crate_carry_over(&view.crates),
        rolled_trip: is_active.then_some(latest.id),
    })
}

/// Closes an active trip whose stock moves to the vehicle's next trip.
///
/// Everything still out is booked as returned, so the rolled trip sells nothing and
/// the goods are accounted for once, on the trip that receives them.
async fn roll_over_trip<C>(db: &C, trip_id: i64, closed_at: DateTime<Utc>) -> Result<()>
where
    C: ConnectionTrait,
{
    let rolled = get_trip_by_id(db, trip_id)
        .await?
        .ok_or(Error::TripNotFound { id: trip_id })?;

    let lines = TripProductLine::find()
        .filter(trip_product_line::Column::TripId.eq(trip_id))
        .all(db)
        .await?;
    for line in lines {
        let handed_boxes = line
            .remaining_boxes
            .checked_add(line.issued_boxes)
            .ok_or(Error::QuantityOverflow {
                entity_id: line.product_id,
                quantity: Quantity::Boxes,
            })?;
        let handed_units = line
            .remaining_units
            .checked_add(line.issued_units)
            .ok_or(Error::QuantityOverflow {
                entity_id: line.product_id,
                quantity: Quantity::Units,
            })?;
        let mut model: trip_product_line::ActiveModel = line.into();
        model.returned_boxes = Set(handed_boxes);
        model.returned_units = Set(handed_units);
        model.update(db).await?;
    }

    let mut rolled: trip::ActiveModel = rolled.into();
    rolled.status = Set(TripStatus::RolledOver.as_str().to_string());
    rolled.closed_at = Set(Some(closed_at));
    rolled.update(db).await?;
    info!(trip_id, "Rolled over active trip");
    Ok(())
}

/// Starts a new trip for a vehicle.
///
/// Every referenced product, crate and employee must exist. If the vehicle still has
/// an active trip, that trip is closed as `rolled_over` and its stock is carried into
/// the new one. Runs in a single database transaction.
///
/// # Errors
/// Returns an error if:
/// - The vehicle or the driver does not exist or is deleted
/// - A product or crate referenced by an issue line does not exist or is deleted
/// - A database operation fails
#[instrument(skip(db, new_trip), fields(vehicle_id = new_trip.vehicle_id))]
pub async fn start_trip(db: &DatabaseConnection, new_trip: NewTrip) -> Result<trip::Model> {
    let txn = db.begin().await?;

    vehicle::get_vehicle_by_id(&txn, new_trip.vehicle_id)
        .await?
        .filter(|v| !v.is_deleted)
        .ok_or_else(|| Error::VehicleNotFound {
            id: new_trip.vehicle_id.to_string(),
        })?;

    let driver = match new_trip.employee_id {
        Some(employee_id) => Some(
            employee::get_employee_by_id(&txn, employee_id)
                .await?
                .filter(|e| !e.is_deleted)
                .ok_or_else(|| Error::EmployeeNotFound {
                    id: employee_id.to_string(),
                })?,
        ),
        None => None,
    };

    for issue in &new_trip.product_issues {
        product::get_product_by_id(&txn, issue.entity_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| Error::ProductNotFound {
                id: issue.entity_id.to_string(),
            })?;
    }
    for issue in &new_trip.crate_issues {
        crate_box::get_crate_by_id(&txn, issue.entity_id)
            .await?
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| Error::CrateNotFound {
                id: issue.entity_id.to_string(),
            })?;
    }

    let carry_over = carry_over_for_vehicle(&txn, new_trip.vehicle_id).await?;
    let now = Utc::now();

    if let Some(rolled_id) = carry_over.rolled_trip {
        roll_over_trip(&txn, rolled_id, now).await?;
    }

    let trip = trip::ActiveModel {
        vehicle_id: Set(new_trip.vehicle_id),
        employee_id: Set(driver.as_ref().map(|e| e.id)),
        driver: Set(driver.map(|e| e.name)),
        status: Set(TripStatus::Active.as_str().to_string()),
        started_at: Set(now),
        closed_at: Set(None),
        received_amount: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let product_catalog = catalog::load_product_catalog(&txn).await?;
    let crate_catalog = catalog::load_crate_catalog(&txn).await?;

    let product_lines = ledger::reconcile_products(
        &carry_over.products,
        &new_trip.product_issues,
        &[],
        &product_catalog,
    )?;
    for line in product_lines
        .iter()
        .filter(|l| l.total_out_boxes > 0 || l.total_out_units > 0)
    {
        trip_product_line::ActiveModel {
            trip_id: Set(trip.id),
            product_id: Set(line.entity_id),
            remaining_boxes: Set(line.remaining_boxes),
            remaining_units: Set(line.remaining_units),
            issued_boxes: Set(line.issued_boxes),
            issued_units: Set(line.issued_units),
            returned_boxes: Set(0),
            returned_units: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let crate_lines = ledger::reconcile_crates(
        &carry_over.crates,
        &new_trip.crate_issues,
        &[],
        &crate_catalog,
    );
    for line in crate_lines
        .iter()
        .filter(|l| l.previous_remaining > 0 || l.issued_boxes > 0)
    {
        trip_crate_line::ActiveModel {
            trip_id: Set(trip.id),
            crate_id: Set(line.entity_id),
            previous_remaining: Set(line.previous_remaining),
            issued_boxes: Set(line.issued_boxes),
            returned_boxes: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(trip_id = trip.id, "Started trip");
    Ok(trip)
}

/// Loads the reconciled view of a trip from storage.
///
/// Used for running trips, finished trips and invoice reprints alike.
///
/// # Errors
/// Returns [`Error::TripNotFound`] if the trip does not exist, or a ledger error
/// if the stored lines are inconsistent.
pub async fn load_trip_view<C>(db: &C, trip_id: i64) -> Result<TripView>
where
    C: ConnectionTrait,
{
    let records = load_records(db, trip_id).await?;
    let product_catalog = catalog::load_product_catalog(db).await?;
    let crate_catalog = catalog::load_crate_catalog(db).await?;
    reconcile_view(&records, None, &product_catalog, &crate_catalog)
}

fn ensure_active(trip: &trip::Model) -> Result<()> {
    if trip.status != TripStatus::Active.as_str() {
        return Err(Error::TripNotActive {
            id: trip.id,
            status: trip.status.clone(),
        });
    }
    Ok(())
}

fn validate_finish(finish: &FinishTrip, products: &ProductCatalog, crates: &CrateCatalog) -> Result<()> {
    for entry in &finish.waste {
        if !products.contains_key(&entry.product_id) {
            return Err(Error::ProductNotFound {
                id: entry.product_id.to_string(),
            });
        }
    }
    for line in &finish.crate_returns {
        if !crates.contains_key(&line.entity_id) {
            return Err(Error::CrateNotFound {
                id: line.entity_id.to_string(),
            });
        }
    }
    for charge in &finish.charges {
        if charge.charge_type.trim().is_empty() {
            return Err(Error::Validation {
                message: "Charge type cannot be empty".to_string(),
            });
        }
        if charge.amount < 0.0 || !charge.amount.is_finite() {
            return Err(Error::InvalidAmount {
                amount: charge.amount,
            });
        }
    }
    Ok(())
}

/// Computes the view a trip would have if it were finished with `finish`, without
/// saving anything. Used for the confirmation step before finishing.
///
/// # Errors
/// Same validation errors as [`finish_trip`].
pub async fn preview_finish(
    db: &DatabaseConnection,
    trip_id: i64,
    finish: &FinishTrip,
) -> Result<TripView> {
    let records = load_records(db, trip_id).await?;
    ensure_active(&records.trip)?;
    let product_catalog = catalog::load_product_catalog(db).await?;
    let crate_catalog = catalog::load_crate_catalog(db).await?;
    validate_finish(finish, &product_catalog, &crate_catalog)?;
    reconcile_view(&records, Some(finish), &product_catalog, &crate_catalog)
}

/// Finishes an active trip with its returns, waste, charges and received cash.
///
/// All input is validated through the ledger before anything is written; the writes
/// then happen in one database transaction. Returns the view reloaded from storage,
/// which is exactly what a later reprint will show.
///
/// # Errors
/// Returns an error if:
/// - The trip does not exist ([`Error::TripNotFound`]) or is not active ([`Error::TripNotActive`])
/// - A return exceeds what was out ([`Error::ReturnExceedsIssued`])
/// - The received amount is negative ([`Error::InvalidReceivedAmount`])
/// - A waste product or returned crate is unknown, or a charge is invalid
/// - A database operation fails
#[instrument(skip(db, finish))]
pub async fn finish_trip(
    db: &DatabaseConnection,
    trip_id: i64,
    finish: FinishTrip,
) -> Result<TripView> {
    let txn = db.begin().await?;

    let records = load_records(&txn, trip_id).await?;
    ensure_active(&records.trip)?;
    let product_catalog = catalog::load_product_catalog(&txn).await?;
    let crate_catalog = catalog::load_crate_catalog(&txn).await?;
    validate_finish(&finish, &product_catalog, &crate_catalog)?;
    let preview = reconcile_view(&records, Some(&finish), &product_catalog, &crate_catalog)?;

    let returned_products: HashMap<i64, &ReconciledProductLine> =
        preview.products.iter().map(|l| (l.entity_id, l)).collect();
    for line in &records.product_lines {
        let Some(reconciled) = returned_products.get(&line.product_id) else {
            continue;
        };
        if reconciled.returned_boxes == 0 && reconciled.returned_units == 0 {
            continue;
        }
        let mut model: trip_product_line::ActiveModel = line.clone().into();
        model.returned_boxes = Set(reconciled.returned_boxes);
        model.returned_units = Set(reconciled.returned_units);
        model.update(&txn).await?;
    }

    let stored_crates: HashMap<i64, &trip_crate_line::Model> = records
        .crate_lines
        .iter()
        .map(|l| (l.crate_id, l))
        .collect();
    for reconciled in preview.crates.iter().filter(|l| l.returned_boxes > 0) {
        if let Some(line) = stored_crates.get(&reconciled.entity_id) {
            let mut model: trip_crate_line::ActiveModel = (*line).clone().into();
            model.returned_boxes = Set(reconciled.returned_boxes);
            model.update(&txn).await?;
        } else {
            // Crates left behind by an earlier trip that were not on this one's lines
            trip_crate_line::ActiveModel {
                trip_id: Set(trip_id),
                crate_id: Set(reconciled.entity_id),
                previous_remaining: Set(0),
                issued_boxes: Set(0),
                returned_boxes: Set(reconciled.returned_boxes),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    for entry in finish.waste.iter().filter(|w| w.quantity_units > 0) {
        trip_waste::ActiveModel {
            trip_id: Set(trip_id),
            product_id: Set(entry.product_id),
            quantity_units: Set(entry.quantity_units),
            reason: Set(entry.reason.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for charge in &finish.charges {
        trip_charge::ActiveModel {
            trip_id: Set(trip_id),
            charge_type: Set(charge.charge_type.trim().to_string()),
            amount: Set(charge.amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let mut trip: trip::ActiveModel = records.trip.into();
    trip.status = Set(TripStatus::Finished.as_str().to_string());
    trip.closed_at = Set(Some(Utc::now()));
    trip.received_amount = Set(Some(finish.received_amount));
    trip.update(&txn).await?;

    let view = load_trip_view(&txn, trip_id).await?;
    txn.commit().await?;

    info!(
        trip_id,
        net_expected = view.totals.net_expected,
        difference = view.totals.difference,
        "Finished trip"
    );
    Ok(view)
}
