//! Plain-text trip invoice.
//!
//! Rendered from a [`TripView`], so a reprint of a finished trip gives the same
//! document as the one printed when it was closed.

use crate::{config::company::CompanyProfile, core::trip::TripView};

const DESIGNATION_WIDTH: usize = 22;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats a money amount with two decimals and the currency symbol.
///
/// `format_amount(24.0, "DA")` gives `"24.00 DA"`.
#[must_use]
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    // Avoids printing "-0.00" for tiny negative rounding leftovers
    let amount = if amount.abs() < 0.005 { 0.0 } else { amount };
    format!("{amount:.2} {currency_symbol}")
}

fn designation_cell(designation: &str) -> String {
    let truncated: String = designation.chars().take(DESIGNATION_WIDTH).collect();
    format!("{truncated:<DESIGNATION_WIDTH$}")
}

fn boxes_units(boxes: u32, units: u32) -> String {
    format!("{boxes}/{units}")
}

/// Renders the fixed-width invoice of a trip.
#[must_use]
pub fn render_invoice(view: &TripView, company: &CompanyProfile) -> String {
    let money = |amount: f64| format_amount(amount, &company.currency_symbol);
    let mut lines = Vec::new();

    lines.push(company.name.clone());
    lines.push(format!(
        "Trip #{} | Vehicle {} | Driver {}",
        view.trip_id,
        view.vehicle_registration,
        view.driver.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "Started {} | Closed {} | Status {}",
        view.started_at.format(DATE_FORMAT),
        view.closed_at
            .map_or_else(|| "-".to_string(), |d| d.format(DATE_FORMAT).to_string()),
        view.status
    ));
    lines.push(String::new());

    lines.push("PRODUCTS (boxes/units)".to_string());
    lines.push(format!(
        "{}{:>8}{:>8}{:>8}{:>8}{:>7}{:>16}",
        designation_cell("Designation"),
        "Prev",
        "Issued",
        "Out",
        "Ret",
        "Sold",
        "Amount"
    ));
    for line in &view.products {
        lines.push(format!(
            "{}{:>8}{:>8}{:>8}{:>8}{:>7}{:>16}",
            designation_cell(&line.designation),
            boxes_units(line.remaining_boxes, line.remaining_units),
            boxes_units(line.issued_boxes, line.issued_units),
            boxes_units(line.total_out_boxes, line.total_out_units),
            boxes_units(line.returned_boxes, line.returned_units),
            line.units_sold,
            money(line.revenue)
        ));
    }

    if !view.crates.is_empty() {
        lines.push(String::new());
        lines.push("CRATES".to_string());
        lines.push(format!(
            "{}{:>8}{:>8}{:>10}{:>13}",
            designation_cell("Designation"),
            "Prev",
            "Issued",
            "Returned",
            "Outstanding"
        ));
        for line in &view.crates {
            lines.push(format!(
                "{}{:>8}{:>8}{:>10}{:>13}",
                designation_cell(&line.designation),
                line.previous_remaining,
                line.issued_boxes,
                line.returned_boxes,
                line.net_outstanding
            ));
        }
    }

    if !view.waste.is_empty() {
        lines.push(String::new());
        lines.push("WASTE".to_string());
        for item in &view.waste {
            let reason = item
                .reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            lines.push(format!(
                "{}{:>8} u{:>16}{reason}",
                designation_cell(&item.designation),
                item.quantity_units,
                money(item.cost)
            ));
        }
    }

    if !view.charges.is_empty() {
        lines.push(String::new());
        lines.push("CHARGES".to_string());
        for charge in &view.charges {
            lines.push(format!(
                "{}{:>26}",
                designation_cell(&charge.charge_type),
                money(charge.amount)
            ));
        }
    }

    let totals = &view.totals;
    lines.push(String::new());
    lines.push("TOTALS".to_string());
    lines.push(format!("{}{:>26}", designation_cell("Expected"), money(totals.expected_amount)));
    lines.push(format!("{}{:>26}", designation_cell("Waste"), money(totals.waste_cost)));
    lines.push(format!("{}{:>26}", designation_cell("Charges"), money(totals.total_charges)));
    lines.push(format!("{}{:>26}", designation_cell("Net expected"), money(totals.net_expected)));
    match (view.received_amount, totals.difference) {
        (Some(received), Some(difference)) => {
            lines.push(format!("{}{:>26}", designation_cell("Received"), money(received)));
            lines.push(format!("{}{:>26}", designation_cell("Difference"), money(difference)));
        }
        _ => lines.push(format!("{}{:>26}", designation_cell("Received"), "pending")),
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        ledger::{ChargeLine, ReconciledCrateLine, ReconciledProductLine, Totals},
        trip::{TripStatus, WasteItem},
    };
    use chrono::{TimeZone, Utc};

    fn view(received_amount: Option<f64>) -> TripView {
        TripView {
            trip_id: 12,
            vehicle_id: 1,
            vehicle_registration: "TRUCK1".to_string(),
            employee_id: Some(1),
            driver: Some("Karim".to_string()),
            status: if received_amount.is_some() {
                TripStatus::Finished
            } else {
                TripStatus::Active
            },
            started_at: Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap(),
            closed_at: None,
            received_amount,
            products: vec![ReconciledProductLine {
                entity_id: 1,
                designation: "Cola".to_string(),
                in_catalog: true,
                remaining_boxes: 2,
                remaining_units: 0,
                issued_boxes: 3,
                issued_units: 5,
                total_out_boxes: 5,
                total_out_units: 5,
                returned_boxes: 4,
                returned_units: 3,
                units_sold: 12,
                revenue: 24.0,
            }],
            crates: vec![ReconciledCrateLine {
                entity_id: 1,
                designation: "Plastic 24".to_string(),
                in_catalog: true,
                previous_remaining: 0,
                issued_boxes: 5,
                returned_boxes: 4,
                net_outstanding: 1,
            }],
            waste: vec![WasteItem {
                product_id: 1,
                designation: "Cola".to_string(),
                quantity_units: 1,
                cost: 2.0,
                reason: Some("broken".to_string()),
            }],
            charges: vec![ChargeLine {
                charge_type: "fuel".to_string(),
                amount: 5.0,
            }],
            totals: Totals {
                expected_amount: 24.0,
                waste_cost: 2.0,
                total_charges: 5.0,
                net_expected: 17.0,
                difference: received_amount.map(|r| r - 17.0),
            },
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(24.0, "DA"), "24.00 DA");
        assert_eq!(format_amount(-3.456, "DA"), "-3.46 DA");
        assert_eq!(format_amount(-0.001, "DA"), "0.00 DA");
    }

    #[test]
    fn test_invoice_of_finished_trip() {
        let invoice = render_invoice(&view(Some(20.0)), &CompanyProfile::default());

        assert!(invoice.starts_with("Crate Distribution\nTrip #12 | Vehicle TRUCK1 | Driver Karim"));
        assert!(invoice.contains("Status finished"));
        assert!(invoice.contains("24.00 DA"));
        assert!(invoice.contains("(broken)"));
        assert!(invoice.contains("Plastic 24"));
        let received = invoice.lines().find(|l| l.starts_with("Received")).unwrap();
        assert!(received.ends_with("20.00 DA"));
        let difference = invoice.lines().find(|l| l.starts_with("Difference")).unwrap();
        assert!(difference.ends_with("3.00 DA"));
    }

    #[test]
    fn test_invoice_of_running_trip_is_pending() {
        let company = CompanyProfile {
            name: "Acme".to_string(),
            currency_symbol: "EUR".to_string(),
        };
        let invoice = render_invoice(&view(None), &company);

        assert!(invoice.contains("24.00 EUR"));
        let received = invoice.lines().find(|l| l.starts_with("Received")).unwrap();
        assert!(received.ends_with("pending"));
        assert!(!invoice.contains("Difference"));
    }

    #[test]
    fn test_long_designations_are_truncated() {
        let mut view = view(None);
        view.products[0].designation = "A very long product designation indeed".to_string();
        let invoice = render_invoice(&view, &CompanyProfile::default());
        assert!(invoice.contains("A very long product de "));
        assert!(!invoice.contains("indeed"));
    }
}
