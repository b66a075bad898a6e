//! Purchase business logic - goods received from suppliers.
//!
//! A purchase is a supplier delivery with one line per product. Line costs are
//! computed from the product's box capacity at the time of recording and stored,
//! so later catalog edits do not change past purchases. The supplier's name is
//! stored alongside its id for the same reason.

use crate::{
    core::{product, supplier},
    entities::{Purchase, PurchaseLine, purchase, purchase_line},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One product line of a [`NewPurchase`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPurchaseLine {
    /// Product received
    pub product_id: i64,
    /// Full boxes received
    pub boxes: u32,
    /// Loose units received
    pub units: u32,
    /// Cost of a single unit
    pub unit_cost: f64,
}

/// Input for [`record_purchase`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    /// Supplier the goods came from
    pub supplier_id: i64,
    /// Supplier's delivery note or invoice number
    pub reference: Option<String>,
    /// At least one line
    pub lines: Vec<NewPurchaseLine>,
}

/// A recorded purchase with its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseDetail {
    /// The purchase itself
    pub purchase: purchase::Model,
    /// Its lines, in the order they were recorded
    pub lines: Vec<purchase_line::Model>,
}

/// Cost of `boxes` full boxes plus `units` loose units.
#[must_use]
pub fn line_cost(boxes: u32, units: u32, capacity_per_box: u32, unit_cost: f64) -> f64 {
    let total_units = u64::from(boxes) * u64::from(capacity_per_box) + u64::from(units);
    // Unit counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let total_units = total_units as f64;
    total_units * unit_cost
}

/// Records a supplier delivery and its lines in one database transaction.
///
/// # Errors
/// Returns an error if:
/// - There are no lines
/// - A unit cost is negative or not finite
/// - The supplier or a product does not exist or is deleted
/// - A database operation fails
pub async fn record_purchase(
    db: &DatabaseConnection,
    new_purchase: NewPurchase,
) -> Result<PurchaseDetail> {
    if new_purchase.lines.is_empty() {
        return Err(Error::Validation {
            message: "A purchase needs at least one line".to_string(),
        });
    }
    if let Some(line) = new_purchase
        .lines
        .iter()
        .find(|l| l.unit_cost < 0.0 || !l.unit_cost.is_finite())
    {
        return Err(Error::InvalidAmount {
            amount: line.unit_cost,
        });
    }

    let txn = db.begin().await?;

    let supplier = supplier::get_supplier_by_id(&txn, new_purchase.supplier_id)
        .await?
        .filter(|s| !s.is_deleted)
        .ok_or_else(|| Error::SupplierNotFound {
            id: new_purchase.supplier_id.to_string(),
        })?;

    let mut costed = Vec::with_capacity(new_purchase.lines.len());
    for line in &new_purchase.lines {
        let product = product::get_product_by_id(&txn, line.product_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| Error::ProductNotFound {
                id: line.product_id.to_string(),
            })?;
        let cost = line_cost(line.boxes, line.units, product.capacity_per_box, line.unit_cost);
        costed.push((*line, cost));
    }
    let total_cost: f64 = costed.iter().map(|(_, cost)| cost).sum();

    let purchase = purchase::ActiveModel {
        supplier_id: Set(supplier.id),
        supplier: Set(supplier.name),
        reference: Set(new_purchase
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())),
        total_cost: Set(total_cost),
        received_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(costed.len());
    for (line, cost) in costed {
        let model = purchase_line::ActiveModel {
            purchase_id: Set(purchase.id),
            product_id: Set(line.product_id),
            boxes: Set(line.boxes),
            units: Set(line.units),
            unit_cost: Set(line.unit_cost),
            line_cost: Set(cost),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        lines.push(model);
    }

    txn.commit().await?;
    info!(
        purchase_id = purchase.id,
        total_cost, "Recorded purchase from {}", purchase.supplier
    );
    Ok(PurchaseDetail { purchase, lines })
}

/// Lists the most recent purchases with their lines, newest first.
pub async fn list_recent_purchases(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<PurchaseDetail>> {
    let purchases = Purchase::find()
        .order_by_desc(purchase::Column::Id)
        .limit(limit)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(purchases.len());
    for purchase in purchases {
        let lines = get_purchase_lines(db, purchase.id).await?;
        details.push(PurchaseDetail { purchase, lines });
    }
    Ok(details)
}

/// Retrieves the lines of a purchase in the order they were recorded.
pub async fn get_purchase_lines(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Vec<purchase_line::Model>> {
    PurchaseLine::find()
        .filter(purchase_line::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::supplier::delete_supplier, test_utils::*};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn purchase_of(supplier_id: i64, lines: Vec<NewPurchaseLine>) -> NewPurchase {
        NewPurchase {
            supplier_id,
            reference: Some(" BL-204 ".to_string()),
            lines,
        }
    }

    const fn line(product_id: i64, boxes: u32, units: u32, unit_cost: f64) -> NewPurchaseLine {
        NewPurchaseLine {
            product_id,
            boxes,
            units,
            unit_cost,
        }
    }

    #[test]
    fn test_line_cost() {
        assert_eq!(line_cost(2, 3, 24, 0.5), 25.5);
        assert_eq!(line_cost(0, 7, 0, 1.0), 7.0);
    }

    #[tokio::test]
    async fn test_record_purchase_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = record_purchase(&db, purchase_of(1, vec![])).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = record_purchase(&db, purchase_of(1, vec![line(1, 1, 0, -2.0)])).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == -2.0
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_purchase_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let bottler = create_test_supplier(&db, "Bottler SA").await?;
        let cola = create_test_product(&db, "Cola").await?;
        let water = create_test_product(&db, "Water").await?;

        let recorded = record_purchase(
            &db,
            purchase_of(
                bottler.id,
                vec![line(cola.id, 2, 4, 1.5), line(water.id, 1, 0, 0.5)],
            ),
        )
        .await?;

        let purchase = &recorded.purchase;
        assert_eq!(purchase.supplier_id, bottler.id);
        assert_eq!(purchase.supplier, "Bottler SA");
        assert_eq!(purchase.reference.as_deref(), Some("BL-204"));
        // (2 * 10 + 4) * 1.5 + 10 * 0.5
        assert_eq!(recorded.lines[0].line_cost, 36.0);
        assert_eq!(recorded.lines[1].line_cost, 5.0);
        assert_eq!(purchase.total_cost, 41.0);

        let stored = get_purchase_lines(&db, purchase.id).await?;
        assert_eq!(stored, recorded.lines);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_references_record_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let bottler = create_test_supplier(&db, "Bottler SA").await?;
        let cola = create_test_product(&db, "Cola").await?;

        let result = record_purchase(&db, purchase_of(bottler.id, vec![line(999, 1, 0, 1.0)])).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { .. }));

        let result = record_purchase(&db, purchase_of(999, vec![line(cola.id, 1, 0, 1.0)])).await;
        assert!(matches!(result.unwrap_err(), Error::SupplierNotFound { .. }));

        delete_supplier(&db, bottler.id).await?;
        let result = record_purchase(&db, purchase_of(bottler.id, vec![line(cola.id, 1, 0, 1.0)])).await;
        assert!(matches!(result.unwrap_err(), Error::SupplierNotFound { .. }));

        assert!(list_recent_purchases(&db, 10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_recent_purchases_with_lines() -> Result<()> {
        let db = setup_test_db().await?;
        let bottler = create_test_supplier(&db, "Bottler SA").await?;
        let cola = create_test_product(&db, "Cola").await?;
        let water = create_test_product(&db, "Water").await?;

        let first = record_purchase(&db, purchase_of(bottler.id, vec![line(cola.id, 1, 0, 1.0)])).await?;
        let second = record_purchase(
            &db,
            purchase_of(
                bottler.id,
                vec![line(water.id, 0, 6, 0.5), line(cola.id, 2, 0, 1.0)],
            ),
        )
        .await?;

        let recent = list_recent_purchases(&db, 1).await?;
        assert_eq!(recent, vec![second.clone()]);
        assert_eq!(recent[0].lines.len(), 2);

        let all = list_recent_purchases(&db, 10).await?;
        assert_eq!(all, vec![second, first]);
        Ok(())
    }
}
