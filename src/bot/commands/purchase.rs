//! Purchase Discord commands - `purchase_record` and `purchase_list`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, join_within_limit, list_limit, parse},
        core::{
            invoice::format_amount,
            purchase::{self, NewPurchase},
            supplier,
        },
        errors::{Error, Result},
    };

    /// Records goods received from a supplier.
    #[poise::command(slash_command)]
    pub async fn purchase_record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Supplier"]
        #[autocomplete = "autocomplete::autocomplete_supplier_name"]
        supplier: String,
        #[description = "Lines as id:boxes/units@unit_cost (e.g., 3:10/0@38.5)"] lines: String,
        #[description = "Delivery note or invoice number"] reference: Option<String>,
    ) -> Result<()> {
        let lines = parse::parse_purchase_lines(&lines)?;
        let currency = &ctx.data().company.currency_symbol;
        let db = &ctx.data().database;
        let Some(found) = supplier::get_supplier_by_name(db, &supplier).await? else {
            return Err(Error::SupplierNotFound { id: supplier });
        };

        let recorded = purchase::record_purchase(
            db,
            NewPurchase {
                supplier_id: found.id,
                reference,
                lines,
            },
        )
        .await?;

        let details = recorded
            .lines
            .iter()
            .map(|l| {
                format!(
                    "• product #{}: {}/{} at {} = {}",
                    l.product_id,
                    l.boxes,
                    l.units,
                    format_amount(l.unit_cost, currency),
                    format_amount(l.line_cost, currency)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        ctx.say(format!(
            "✅ Purchase #{} from {} recorded, total **{}**\n{details}",
            recorded.purchase.id,
            recorded.purchase.supplier,
            format_amount(recorded.purchase.total_cost, currency)
        ))
        .await?;
        Ok(())
    }

    /// Lists recent purchases, newest first.
    #[poise::command(slash_command)]
    pub async fn purchase_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many purchases to show (default 10, at most 25)"] limit: Option<u64>,
    ) -> Result<()> {
        let currency = &ctx.data().company.currency_symbol;
        let purchases =
            purchase::list_recent_purchases(&ctx.data().database, list_limit(limit)).await?;

        if purchases.is_empty() {
            ctx.say("No purchases recorded yet.").await?;
            return Ok(());
        }

        let items: Vec<String> = purchases
            .iter()
            .map(|detail| {
                let p = &detail.purchase;
                let lines = detail
                    .lines
                    .iter()
                    .map(|l| format!("#{} {}/{}", l.product_id, l.boxes, l.units))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "• #{} {} {}- {} on {}\n  {lines}",
                    p.id,
                    p.supplier,
                    p.reference
                        .as_deref()
                        .map(|r| format!("({r}) "))
                        .unwrap_or_default(),
                    format_amount(p.total_cost, currency),
                    p.received_at.format("%Y-%m-%d")
                )
            })
            .collect();
        ctx.say(join_within_limit("**Recent purchases**", &items)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
