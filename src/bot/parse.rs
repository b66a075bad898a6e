//! Parsing of the compact line-item arguments typed into slash commands.
//!
//! Items are separated by commas:
//! - stock lines: `id:boxes` or `id:boxes/units`, e.g. `3:12/4, 7:2`
//! - waste: `id:units`, e.g. `3:2`
//! - charges: `label=amount`, e.g. `fuel=1500, tolls=200`
//! - purchase lines: `id:boxes/units@unit_cost`, e.g. `3:10/0@38.5`
//!
//! An empty or blank argument is an empty list.

use crate::{
    core::{
        ledger::{ChargeLine, IssueLine, ReturnLine},
        purchase::NewPurchaseLine,
        trip::WasteEntry,
    },
    errors::{Error, Result},
};
use std::str::FromStr;

/// An `id:boxes/units` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockItem {
    pub entity_id: i64,
    pub boxes: u32,
    pub units: u32,
}

impl From<StockItem> for IssueLine {
    fn from(item: StockItem) -> Self {
        Self {
            entity_id: item.entity_id,
            issued_boxes: item.boxes,
            issued_units: item.units,
        }
    }
}

impl From<StockItem> for ReturnLine {
    fn from(item: StockItem) -> Self {
        Self {
            entity_id: item.entity_id,
            returned_boxes: item.boxes,
            returned_units: item.units,
        }
    }
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidLine {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn items(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn number<T: FromStr>(item: &str, text: &str, what: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| invalid(item, &format!("{what} '{}' is not a valid number", text.trim())))
}

fn stock_item(item: &str) -> Result<StockItem> {
    let (id, quantity) = item
        .split_once(':')
        .ok_or_else(|| invalid(item, "expected id:boxes or id:boxes/units"))?;
    let (boxes, units) = quantity.split_once('/').unwrap_or((quantity, "0"));
    Ok(StockItem {
        entity_id: number(item, id, "id")?,
        boxes: number(item, boxes, "boxes")?,
        units: number(item, units, "units")?,
    })
}

/// Parses `id:boxes[/units]` items.
///
/// # Errors
/// Returns [`Error::InvalidLine`] naming the first malformed item.
pub fn parse_stock_lines(input: &str) -> Result<Vec<StockItem>> {
    items(input).map(stock_item).collect()
}

/// Parses `id:boxes[/units]` items as issue lines.
pub fn parse_issue_lines(input: &str) -> Result<Vec<IssueLine>> {
    Ok(parse_stock_lines(input)?.into_iter().map(Into::into).collect())
}

/// Parses `id:boxes[/units]` items as return lines.
pub fn parse_return_lines(input: &str) -> Result<Vec<ReturnLine>> {
    Ok(parse_stock_lines(input)?.into_iter().map(Into::into).collect())
}

/// Parses `id:units` waste items.
pub fn parse_waste(input: &str) -> Result<Vec<WasteEntry>> {
    items(input)
        .map(|item| {
            let (id, units) = item
                .split_once(':')
                .ok_or_else(|| invalid(item, "expected id:units"))?;
            Ok(WasteEntry {
                product_id: number(item, id, "id")?,
                quantity_units: number(item, units, "units")?,
                reason: None,
            })
        })
        .collect()
}

/// Parses `label=amount` charge items.
pub fn parse_charges(input: &str) -> Result<Vec<ChargeLine>> {
    items(input)
        .map(|item| {
            let (label, amount) = item
                .split_once('=')
                .ok_or_else(|| invalid(item, "expected label=amount"))?;
            if label.trim().is_empty() {
                return Err(invalid(item, "charge label is empty"));
            }
            let amount: f64 = number(item, amount, "amount")?;
            if amount < 0.0 || !amount.is_finite() {
                return Err(invalid(item, "amount must be a non-negative number"));
            }
            Ok(ChargeLine {
                charge_type: label.trim().to_string(),
                amount,
            })
        })
        .collect()
}

/// Parses `id:boxes[/units]@unit_cost` purchase items.
pub fn parse_purchase_lines(input: &str) -> Result<Vec<NewPurchaseLine>> {
    items(input)
        .map(|item| {
            let (stock, cost) = item
                .rsplit_once('@')
                .ok_or_else(|| invalid(item, "expected id:boxes/units@unit_cost"))?;
            let stock = stock_item(stock.trim())?;
            Ok(NewPurchaseLine {
                product_id: stock.entity_id,
                boxes: stock.boxes,
                units: stock.units,
                unit_cost: number(item, cost, "unit cost")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_stock_lines() {
        let lines = parse_stock_lines("3:12/4, 7:2 ,").unwrap();
        assert_eq!(
            lines,
            vec![
                StockItem {
                    entity_id: 3,
                    boxes: 12,
                    units: 4
                },
                StockItem {
                    entity_id: 7,
                    boxes: 2,
                    units: 0
                },
            ]
        );
        assert!(parse_stock_lines("   ").unwrap().is_empty());
    }

    #[test]
    fn test_issue_and_return_conversion() {
        let issues = parse_issue_lines("1:3/5").unwrap();
        assert_eq!(issues[0].issued_boxes, 3);
        assert_eq!(issues[0].issued_units, 5);

        let returns = parse_return_lines("1:4/3").unwrap();
        assert_eq!(returns[0].returned_boxes, 4);
        assert_eq!(returns[0].returned_units, 3);
    }

    #[test]
    fn test_malformed_stock_lines() {
        for input in ["3", "x:1", "3:-1", "3:1/y", "3:1/2/3"] {
            let err = parse_stock_lines(input).unwrap_err();
            assert_eq!(err.code(), "INVALID_LINE", "input {input}");
        }

        let err = parse_stock_lines("1:2, 4:z").unwrap_err();
        assert!(matches!(err, Error::InvalidLine { input, .. } if input == "4:z"));
    }

    #[test]
    fn test_parse_waste() {
        let waste = parse_waste("3:2").unwrap();
        assert_eq!(waste[0].product_id, 3);
        assert_eq!(waste[0].quantity_units, 2);
        assert!(parse_waste("3").is_err());
    }

    #[test]
    fn test_parse_charges() {
        let charges = parse_charges("fuel=1500, tolls = 200.5").unwrap();
        assert_eq!(charges.len(), 2);
        assert_eq!(charges[1].charge_type, "tolls");
        assert_eq!(charges[1].amount, 200.5);

        assert!(parse_charges("fuel").is_err());
        assert!(parse_charges("=10").is_err());
        assert!(parse_charges("fuel=-1").is_err());
        assert!(parse_charges("fuel=NaN").is_err());
    }

    #[test]
    fn test_parse_purchase_lines() {
        let lines = parse_purchase_lines("3:10/2@38.5, 4:1@2").unwrap();
        assert_eq!(lines[0].product_id, 3);
        assert_eq!(lines[0].boxes, 10);
        assert_eq!(lines[0].units, 2);
        assert_eq!(lines[0].unit_cost, 38.5);
        assert_eq!(lines[1].unit_cost, 2.0);

        assert!(parse_purchase_lines("3:10").is_err());
    }
}
