//! Trip ledger - reconciliation of the stock and cash of a single delivery trip.
//!
//! Given what was still on a vehicle from its previous trip (carry-over), what was
//! issued for this trip and what came back, the ledger produces one reconciled line
//! per product and per crate, and the money figures the driver has to account for.
//!
//! Everything here is pure: no I/O, no shared state. Catalog lookups arrive as
//! immutable snapshots, so the same inputs always reproduce the same figures whether
//! the trip is still running, being finished, or being reprinted weeks later.

use crate::errors::{Error, Quantity, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Designation used for lines whose id is missing from the catalog.
pub const UNKNOWN_DESIGNATION: &str = "<unknown>";

/// Log code attached to lines whose id is missing from the catalog.
pub const UNKNOWN_ENTITY: &str = "UNKNOWN_ENTITY";

/// Catalog record for a product, as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Display name
    pub designation: String,
    /// Price of one unit
    pub unit_price: f64,
    /// Units per box; zero for products sold by the unit only
    pub capacity_per_box: u32,
}

/// Catalog record for a crate type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrateInfo {
    /// Display name
    pub designation: String,
}

/// Product snapshot keyed by product id.
pub type ProductCatalog = HashMap<i64, ProductInfo>;

/// Crate snapshot keyed by crate id.
pub type CrateCatalog = HashMap<i64, CrateInfo>;

/// Stock still on the vehicle before the trip starts.
///
/// For crates only `remaining_boxes` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarryOverLine {
    /// Product or crate id
    pub entity_id: i64,
    /// Full boxes left on board
    pub remaining_boxes: u32,
    /// Loose units left on board
    pub remaining_units: u32,
}

/// Quantity newly issued for the trip.
///
/// For crates only `issued_boxes` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueLine {
    /// Product or crate id
    pub entity_id: i64,
    /// Full boxes loaded for this trip
    pub issued_boxes: u32,
    /// Loose units loaded for this trip
    pub issued_units: u32,
}

/// Quantity brought back when the trip finishes.
///
/// For crates only `returned_boxes` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReturnLine {
    /// Product or crate id
    pub entity_id: i64,
    /// Full boxes brought back
    pub returned_boxes: u32,
    /// Loose units brought back
    pub returned_units: u32,
}

/// Units of a product written off (damage, exchange).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteLine {
    /// Product id
    pub entity_id: i64,
    /// Units written off
    pub quantity_units: u32,
}

/// An expense incurred during the trip (fuel, tolls, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeLine {
    /// Free-form label (e.g., "fuel")
    pub charge_type: String,
    /// Amount spent, never negative
    pub amount: f64,
}

/// Reconciled view of one product over a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledProductLine {
    /// Product id
    pub entity_id: i64,
    /// Catalog designation, or [`UNKNOWN_DESIGNATION`]
    pub designation: String,
    /// False when the id did not resolve in the catalog
    pub in_catalog: bool,
    /// Boxes carried over from the previous trip
    pub remaining_boxes: u32,
    /// Units carried over from the previous trip
    pub remaining_units: u32,
    /// Boxes issued for this trip
    pub issued_boxes: u32,
    /// Units issued for this trip
    pub issued_units: u32,
    /// `remaining_boxes + issued_boxes`
    pub total_out_boxes: u32,
    /// `remaining_units + issued_units`
    pub total_out_units: u32,
    /// Boxes brought back
    pub returned_boxes: u32,
    /// Units brought back
    pub returned_units: u32,
    /// Units out minus units back, boxes counted at the catalog capacity
    pub units_sold: u64,
    /// `units_sold * unit_price`
    pub revenue: f64,
}

/// Reconciled view of one crate type over a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledCrateLine {
    /// Crate type id
    pub entity_id: i64,
    /// Catalog designation, or [`UNKNOWN_DESIGNATION`]
    pub designation: String,
    /// False when the id did not resolve in the catalog
    pub in_catalog: bool,
    /// Crates left on the vehicle before this trip's issue
    pub previous_remaining: u32,
    /// Crates loaded for this trip
    pub issued_boxes: u32,
    /// Crates brought back
    pub returned_boxes: u32,
    /// `issued_boxes - returned_boxes`; informational, may be negative
    pub net_outstanding: i64,
}

impl ReconciledCrateLine {
    /// Crates still unaccounted for after this trip, carried into the next one.
    #[must_use]
    pub const fn left_on_vehicle(&self) -> u32 {
        self.previous_remaining
            .saturating_add(self.issued_boxes)
            .saturating_sub(self.returned_boxes)
    }
}

/// Money figures of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of product revenue
    pub expected_amount: f64,
    /// Waste priced at unit price
    pub waste_cost: f64,
    /// Sum of charges
    pub total_charges: f64,
    /// `expected_amount - waste_cost - total_charges`
    pub net_expected: f64,
    /// `received - net_expected`, `None` until cash has been received
    pub difference: Option<f64>,
}

#[derive(Debug, Default)]
struct ProductTally {
    remaining_boxes: u32,
    remaining_units: u32,
    issued_boxes: u32,
    issued_units: u32,
    returned_boxes: u32,
    returned_units: u32,
}

#[derive(Debug, Default)]
struct CrateTally {
    previous_remaining: u32,
    issued_boxes: u32,
    returned_boxes: u32,
}

/// Reconciles the products of a trip.
///
/// Produces exactly one line per distinct product id found in `carry_over`,
/// `issues` or `returns`, ordered by id. Several lines for the same id in one
/// input are summed. Returns are checked against the combined remaining and issued
/// stock, never against the issue alone.
///
/// Ids missing from `catalog` still produce a line, priced at zero with capacity
/// zero and the [`UNKNOWN_DESIGNATION`] designation.
///
/// # Errors
/// Returns an error if:
/// - A product comes back in more boxes or more units than were out ([`Error::ReturnExceedsIssued`])
/// - Summing the lines of one id overflows a `u32` ([`Error::QuantityOverflow`])
pub fn reconcile_products(
    carry_over: &[CarryOverLine],
    issues: &[IssueLine],
    returns: &[ReturnLine],
    catalog: &ProductCatalog,
) -> Result<Vec<ReconciledProductLine>> {
    let mut tallies: BTreeMap<i64, ProductTally> = BTreeMap::new();

    for line in carry_over {
        let id = line.entity_id;
        let tally = tallies.entry(id).or_default();
        tally.remaining_boxes = add_quantity(
            id,
            Quantity::Boxes,
            tally.remaining_boxes,
            line.remaining_boxes,
        )?;
        tally.remaining_units = add_quantity(
            id,
            Quantity::Units,
            tally.remaining_units,
            line.remaining_units,
        )?;
    }
    for line in issues {
        let id = line.entity_id;
        let tally = tallies.entry(id).or_default();
        tally.issued_boxes = add_quantity(
            id,
            Quantity::Boxes,
            tally.issued_boxes,
            line.issued_boxes,
        )?;
        tally.issued_units = add_quantity(
            id,
            Quantity::Units,
            tally.issued_units,
            line.issued_units,
        )?;
    }
    for line in returns {
        let id = line.entity_id;
        let tally = tallies.entry(id).or_default();
        tally.returned_boxes = add_quantity(
            id,
            Quantity::Boxes,
            tally.returned_boxes,
            line.returned_boxes,
        )?;
        tally.returned_units = add_quantity(
            id,
            Quantity::Units,
            tally.returned_units,
            line.returned_units,
        )?;
    }

    tallies
        .into_iter()
        .map(|(entity_id, tally)| reconcile_product_line(entity_id, &tally, catalog))
        .collect()
}

fn add_quantity(entity_id: i64, quantity: Quantity, total: u32, value: u32) -> Result<u32> {
    total
        .checked_add(value)
        .ok_or(Error::QuantityOverflow { entity_id, quantity })
}

fn reconcile_product_line(
    entity_id: i64,
    tally: &ProductTally,
    catalog: &ProductCatalog,
) -> Result<ReconciledProductLine> {
    let (designation, unit_price, capacity, in_catalog) = match catalog.get(&entity_id) {
        Some(info) => (
            info.designation.clone(),
            info.unit_price,
            info.capacity_per_box,
            true,
        ),
        None => {
            warn!(
                code = UNKNOWN_ENTITY,
                product_id = entity_id,
                "product missing from catalog, priced as zero"
            );
            (UNKNOWN_DESIGNATION.to_string(), 0.0, 0, false)
        }
    };

    let total_out_boxes = add_quantity(
        entity_id,
        Quantity::Boxes,
        tally.remaining_boxes,
        tally.issued_boxes,
    )?;
    let total_out_units = add_quantity(
        entity_id,
        Quantity::Units,
        tally.remaining_units,
        tally.issued_units,
    )?;

    ensure_not_over_returned(
        entity_id,
        Quantity::Boxes,
        u64::from(tally.returned_boxes),
        u64::from(total_out_boxes),
    )?;
    ensure_not_over_returned(
        entity_id,
        Quantity::Units,
        u64::from(tally.returned_units),
        u64::from(total_out_units),
    )?;

    let capacity = u64::from(capacity);
    let out_in_units = u64::from(total_out_boxes) * capacity + u64::from(total_out_units);
    let returned_in_units =
        u64::from(tally.returned_boxes) * capacity + u64::from(tally.returned_units);
    // Both dimensions are checked above, so this cannot go below zero
    let units_sold = out_in_units.saturating_sub(returned_in_units);

    // Unit counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let revenue = units_sold as f64 * unit_price;

    Ok(ReconciledProductLine {
        entity_id,
        designation,
        in_catalog,
        remaining_boxes: tally.remaining_boxes,
        remaining_units: tally.remaining_units,
        issued_boxes: tally.issued_boxes,
        issued_units: tally.issued_units,
        total_out_boxes,
        total_out_units,
        returned_boxes: tally.returned_boxes,
        returned_units: tally.returned_units,
        units_sold,
        revenue,
    })
}

fn ensure_not_over_returned(
    entity_id: i64,
    quantity: Quantity,
    returned: u64,
    available: u64,
) -> Result<()> {
    if returned > available {
        return Err(Error::ReturnExceedsIssued {
            entity_id,
            quantity,
            returned,
            available,
        });
    }
    Ok(())
}

/// Reconciles the crates of a trip.
///
/// Same union as [`reconcile_products`] on whole boxes only; the unit fields of
/// the input lines are ignored. Crate shortfalls are tolerated, so this never fails:
/// `net_outstanding` may be negative when crates left on an earlier trip come back.
#[must_use]
pub fn reconcile_crates(
    carry_over: &[CarryOverLine],
    issues: &[IssueLine],
    returns: &[ReturnLine],
    catalog: &CrateCatalog,
) -> Vec<ReconciledCrateLine> {
    let mut tallies: BTreeMap<i64, CrateTally> = BTreeMap::new();

    for line in carry_over {
        let tally = tallies.entry(line.entity_id).or_default();
        tally.previous_remaining = tally.previous_remaining.saturating_add(line.remaining_boxes);
    }
    for line in issues {
        let tally = tallies.entry(line.entity_id).or_default();
        tally.issued_boxes = tally.issued_boxes.saturating_add(line.issued_boxes);
    }
    for line in returns {
        let tally = tallies.entry(line.entity_id).or_default();
        tally.returned_boxes = tally.returned_boxes.saturating_add(line.returned_boxes);
    }

    tallies
        .into_iter()
        .map(|(entity_id, tally)| {
            let (designation, in_catalog) = catalog.get(&entity_id).map_or_else(
                || {
                    warn!(
                        code = UNKNOWN_ENTITY,
                        crate_id = entity_id,
                        "crate missing from catalog"
                    );
                    (UNKNOWN_DESIGNATION.to_string(), false)
                },
                |info| (info.designation.clone(), true),
            );

            ReconciledCrateLine {
                entity_id,
                designation,
                in_catalog,
                previous_remaining: tally.previous_remaining,
                issued_boxes: tally.issued_boxes,
                returned_boxes: tally.returned_boxes,
                net_outstanding: i64::from(tally.issued_boxes) - i64::from(tally.returned_boxes),
            }
        })
        .collect()
}

/// Computes the money figures of a trip from its reconciled product lines.
///
/// Waste is priced at the product's unit price; waste on a product missing from
/// the catalog costs nothing. `received_amount` is `None` while the trip runs, in
/// which case no difference can be computed yet. Sums are taken in input order.
///
/// # Errors
/// Returns [`Error::InvalidReceivedAmount`] when `received_amount` is negative or
/// not a finite number.
pub fn compute_totals(
    product_lines: &[ReconciledProductLine],
    waste: &[WasteLine],
    charges: &[ChargeLine],
    received_amount: Option<f64>,
    catalog: &ProductCatalog,
) -> Result<Totals> {
    if let Some(amount) = received_amount.filter(|amount| *amount < 0.0 || !amount.is_finite()) {
        return Err(Error::InvalidReceivedAmount { amount });
    }

    let expected_amount: f64 = product_lines.iter().map(|line| line.revenue).sum();
    let waste_cost: f64 = waste
        .iter()
        .map(|line| {
            catalog
                .get(&line.entity_id)
                .map_or(0.0, |info| f64::from(line.quantity_units) * info.unit_price)
        })
        .sum();
    let total_charges: f64 = charges.iter().map(|charge| charge.amount).sum();
    let net_expected = expected_amount - waste_cost - total_charges;

    Ok(Totals {
        expected_amount,
        waste_cost,
        total_charges,
        net_expected,
        difference: received_amount.map(|received| received - net_expected),
    })
}

/// Stock a trip leaves on the vehicle when it is rolled into a new one.
///
/// Nothing has been returned yet, so everything that was out stays on board.
#[must_use]
pub fn product_carry_over(lines: &[ReconciledProductLine]) -> Vec<CarryOverLine> {
    lines
        .iter()
        .map(|line| CarryOverLine {
            entity_id: line.entity_id,
            remaining_boxes: line.total_out_boxes.saturating_sub(line.returned_boxes),
            remaining_units: line.total_out_units.saturating_sub(line.returned_units),
        })
        .filter(|line| line.remaining_boxes > 0 || line.remaining_units > 0)
        .collect()
}

/// Crates a trip leaves unaccounted for, carried into the next trip.
#[must_use]
pub fn crate_carry_over(lines: &[ReconciledCrateLine]) -> Vec<CarryOverLine> {
    lines
        .iter()
        .filter_map(|line| {
            let left = line.left_on_vehicle();
            (left > 0).then_some(CarryOverLine {
                entity_id: line.entity_id,
                remaining_boxes: left,
                remaining_units: 0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn catalog() -> ProductCatalog {
        HashMap::from([
            (
                1,
                ProductInfo {
                    designation: "Cola 33cl".to_string(),
                    unit_price: 2.0,
                    capacity_per_box: 10,
                },
            ),
            (
                2,
                ProductInfo {
                    designation: "Water 1.5L".to_string(),
                    unit_price: 0.5,
                    capacity_per_box: 6,
                },
            ),
            (
                3,
                ProductInfo {
                    designation: "Ice bag".to_string(),
                    unit_price: 1.25,
                    capacity_per_box: 0,
                },
            ),
        ])
    }

    fn crates() -> CrateCatalog {
        HashMap::from([
            (
                10,
                CrateInfo {
                    designation: "Plastic 24".to_string(),
                },
            ),
            (
                11,
                CrateInfo {
                    designation: "Wooden 12".to_string(),
                },
            ),
        ])
    }

    const fn carry(entity_id: i64, boxes: u32, units: u32) -> CarryOverLine {
        CarryOverLine {
            entity_id,
            remaining_boxes: boxes,
            remaining_units: units,
        }
    }

    const fn issue(entity_id: i64, boxes: u32, units: u32) -> IssueLine {
        IssueLine {
            entity_id,
            issued_boxes: boxes,
            issued_units: units,
        }
    }

    const fn ret(entity_id: i64, boxes: u32, units: u32) -> ReturnLine {
        ReturnLine {
            entity_id,
            returned_boxes: boxes,
            returned_units: units,
        }
    }

    #[test]
    fn test_sold_quantity_against_carry_over_and_issue() {
        let lines = reconcile_products(
            &[carry(1, 2, 0)],
            &[issue(1, 3, 5)],
            &[ret(1, 4, 3)],
            &catalog(),
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.designation, "Cola 33cl");
        assert_eq!(line.total_out_boxes, 5);
        assert_eq!(line.total_out_units, 5);
        assert_eq!(line.units_sold, 12);
        assert_eq!(line.revenue, 24.0);
    }

    #[test]
    fn test_union_keeps_every_id_once() {
        let lines = reconcile_products(
            &[carry(2, 1, 0), carry(1, 1, 0)],
            &[issue(1, 2, 0), issue(3, 0, 4)],
            &[ret(2, 1, 0)],
            &catalog(),
        )
        .unwrap();

        let ids: Vec<i64> = lines.iter().map(|l| l.entity_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // Product 2 was only carried over, not reissued
        let water = &lines[1];
        assert_eq!(water.issued_boxes, 0);
        assert_eq!(water.remaining_boxes, 1);
        assert_eq!(water.units_sold, 0);
    }

    #[test]
    fn test_duplicate_lines_are_summed() {
        let lines = reconcile_products(
            &[],
            &[issue(1, 1, 0), issue(1, 2, 3)],
            &[],
            &catalog(),
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].issued_boxes, 3);
        assert_eq!(lines[0].issued_units, 3);
        assert_eq!(lines[0].units_sold, 33);
    }

    #[test]
    fn test_conservation_holds_on_every_line() {
        let lines = reconcile_products(
            &[carry(1, 2, 7), carry(2, 0, 3)],
            &[issue(1, 1, 1), issue(2, 4, 0), issue(3, 0, 9)],
            &[ret(1, 1, 0), ret(3, 0, 2)],
            &catalog(),
        )
        .unwrap();

        for line in &lines {
            assert_eq!(line.total_out_boxes, line.remaining_boxes + line.issued_boxes);
            assert_eq!(line.total_out_units, line.remaining_units + line.issued_units);
        }
    }

    #[test]
    fn test_unit_only_product() {
        let lines = reconcile_products(&[], &[issue(3, 5, 20)], &[ret(3, 5, 8)], &catalog())
            .unwrap();

        // Capacity zero: boxes contribute nothing to units
        assert_eq!(lines[0].units_sold, 12);
        assert_eq!(lines[0].revenue, 15.0);
    }

    #[test]
    fn test_over_return_of_boxes_is_rejected() {
        let result = reconcile_products(&[carry(1, 1, 0)], &[issue(1, 2, 0)], &[ret(1, 4, 0)], &catalog());

        assert!(matches!(
            result.unwrap_err(),
            Error::ReturnExceedsIssued {
                entity_id: 1,
                quantity: Quantity::Boxes,
                returned: 4,
                available: 3,
            }
        ));
    }

    #[test]
    fn test_over_return_of_units_is_rejected() {
        let result = reconcile_products(&[], &[issue(2, 3, 1)], &[ret(2, 0, 2)], &catalog());

        let err = result.unwrap_err();
        assert_eq!(err.code(), "RETURN_EXCEEDS_ISSUED");
        assert!(matches!(
            err,
            Error::ReturnExceedsIssued {
                quantity: Quantity::Units,
                ..
            }
        ));
    }

    #[test]
    fn test_return_of_product_never_issued_is_rejected() {
        let result = reconcile_products(&[], &[issue(1, 1, 0)], &[ret(2, 1, 0)], &catalog());
        assert!(matches!(
            result.unwrap_err(),
            Error::ReturnExceedsIssued { entity_id: 2, .. }
        ));
    }

    #[test]
    fn test_overflowing_duplicates_are_rejected() {
        let result = reconcile_products(
            &[],
            &[issue(1, u32::MAX, 0), issue(1, 1, 0)],
            &[],
            &catalog(),
        );
        assert!(matches!(
            result.unwrap_err(),
            Error::QuantityOverflow {
                entity_id: 1,
                quantity: Quantity::Boxes,
            }
        ));

        let result = reconcile_products(&[carry(2, 0, u32::MAX)], &[issue(2, 0, 1)], &[], &catalog());
        assert!(matches!(
            result.unwrap_err(),
            Error::QuantityOverflow {
                entity_id: 2,
                quantity: Quantity::Units,
            }
        ));
    }

    #[test]
    fn test_full_return_sells_nothing() {
        let lines = reconcile_products(&[carry(1, 2, 3)], &[issue(1, 1, 4)], &[ret(1, 3, 7)], &catalog())
            .unwrap();
        assert_eq!(lines[0].units_sold, 0);
        assert_eq!(lines[0].revenue, 0.0);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let carry_over = [carry(1, 2, 3), carry(2, 1, 1)];
        let issues = [issue(1, 1, 0), issue(3, 0, 7)];
        let returns = [ret(1, 1, 2)];
        let catalog = catalog();

        let first = reconcile_products(&carry_over, &issues, &returns, &catalog).unwrap();
        let second = reconcile_products(&carry_over, &issues, &returns, &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_product_is_tolerated() {
        let lines = reconcile_products(
            &[],
            &[issue(1, 1, 0), issue(99, 4, 2)],
            &[ret(99, 1, 0)],
            &catalog(),
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        let unknown = &lines[1];
        assert_eq!(unknown.entity_id, 99);
        assert_eq!(unknown.designation, UNKNOWN_DESIGNATION);
        assert!(!unknown.in_catalog);
        assert_eq!(unknown.revenue, 0.0);
        // The known product is still computed normally
        assert_eq!(lines[0].revenue, 20.0);
    }

    #[test]
    fn test_empty_inputs_give_no_lines() {
        let lines = reconcile_products(&[], &[], &[], &catalog()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_reconcile_crates() {
        let lines = reconcile_crates(
            &[carry(10, 3, 0)],
            &[issue(10, 20, 0), issue(11, 5, 0)],
            &[ret(10, 22, 0), ret(11, 5, 0)],
            &crates(),
        );

        assert_eq!(lines.len(), 2);
        let plastic = &lines[0];
        assert_eq!(plastic.designation, "Plastic 24");
        assert_eq!(plastic.previous_remaining, 3);
        assert_eq!(plastic.net_outstanding, -2);
        assert_eq!(plastic.left_on_vehicle(), 1);

        let wooden = &lines[1];
        assert_eq!(wooden.net_outstanding, 0);
        assert_eq!(wooden.left_on_vehicle(), 0);
    }

    #[test]
    fn test_crate_units_are_ignored_and_unknown_tolerated() {
        let lines = reconcile_crates(&[], &[issue(42, 2, 9)], &[], &crates());
        assert_eq!(lines[0].designation, UNKNOWN_DESIGNATION);
        assert!(!lines[0].in_catalog);
        assert_eq!(lines[0].issued_boxes, 2);
        assert_eq!(lines[0].net_outstanding, 2);
    }

    #[test]
    fn test_crate_carry_over_keeps_shortfall_only() {
        let lines = reconcile_crates(
            &[],
            &[issue(10, 10, 0), issue(11, 4, 0)],
            &[ret(10, 7, 0), ret(11, 4, 0)],
            &crates(),
        );
        assert_eq!(crate_carry_over(&lines), vec![carry(10, 3, 0)]);
    }

    #[test]
    fn test_product_carry_over_of_running_trip() {
        let lines = reconcile_products(
            &[carry(1, 1, 2)],
            &[issue(1, 2, 0), issue(2, 0, 0)],
            &[],
            &catalog(),
        )
        .unwrap();
        assert_eq!(product_carry_over(&lines), vec![carry(1, 3, 2)]);
    }

    #[test]
    fn test_totals() {
        let catalog = catalog();
        let lines = reconcile_products(&[], &[issue(1, 5, 0)], &[ret(1, 1, 0)], &catalog).unwrap();
        let waste = [WasteLine {
            entity_id: 1,
            quantity_units: 3,
        }];
        let charges = [
            ChargeLine {
                charge_type: "fuel".to_string(),
                amount: 10.0,
            },
            ChargeLine {
                charge_type: "tolls".to_string(),
                amount: 4.0,
            },
        ];

        let totals = compute_totals(&lines, &waste, &charges, Some(50.0), &catalog).unwrap();
        assert_eq!(totals.expected_amount, 80.0);
        assert_eq!(totals.waste_cost, 6.0);
        assert_eq!(totals.total_charges, 14.0);
        assert_eq!(totals.net_expected, 60.0);
        assert_eq!(totals.difference, Some(-10.0));
    }

    #[test]
    fn test_totals_without_received_amount() {
        let catalog = catalog();
        let lines = reconcile_products(&[], &[issue(2, 1, 0)], &[], &catalog).unwrap();
        let totals = compute_totals(&lines, &[], &[], None, &catalog).unwrap();
        assert_eq!(totals.expected_amount, 3.0);
        assert_eq!(totals.difference, None);
    }

    #[test]
    fn test_negative_received_amount_is_rejected() {
        let result = compute_totals(&[], &[], &[], Some(-1.0), &catalog());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReceivedAmount { amount } if amount == -1.0
        ));

        let result = compute_totals(&[], &[], &[], Some(f64::NAN), &catalog());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReceivedAmount { .. }
        ));
    }

    #[test]
    fn test_net_expected_decreases_with_waste_and_charges() {
        let catalog = catalog();
        let lines = reconcile_products(&[], &[issue(1, 10, 0)], &[], &catalog).unwrap();

        let mut previous = f64::INFINITY;
        for units in [0, 5, 10, 50] {
            let waste = [WasteLine {
                entity_id: 1,
                quantity_units: units,
            }];
            let totals = compute_totals(&lines, &waste, &[], None, &catalog).unwrap();
            assert!(totals.net_expected < previous);
            previous = totals.net_expected;
        }

        let mut previous = f64::INFINITY;
        for amount in [0.0, 1.0, 2.5, 40.0] {
            let charges = [ChargeLine {
                charge_type: "fuel".to_string(),
                amount,
            }];
            let totals = compute_totals(&lines, &[], &charges, None, &catalog).unwrap();
            assert!(totals.net_expected < previous);
            previous = totals.net_expected;
        }
    }

    #[test]
    fn test_waste_on_unknown_product_costs_nothing() {
        let waste = [WasteLine {
            entity_id: 77,
            quantity_units: 12,
        }];
        let totals = compute_totals(&[], &waste, &[], Some(0.0), &catalog()).unwrap();
        assert_eq!(totals.waste_cost, 0.0);
        assert_eq!(totals.difference, Some(0.0));
    }
}
