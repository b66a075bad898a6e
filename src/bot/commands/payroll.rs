//! Payroll Discord command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            invoice::format_amount,
            payroll::{self, PayPeriod},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const EMBED_COLOR: u32 = 0x0058_65F2;
    /// Discord embed field limit
    const MAX_FIELDS: usize = 25;

    /// Shows what each employee is owed for a month.
    ///
    /// Commission is not included; trip revenue is shown for reference.
    #[poise::command(slash_command)]
    pub async fn payroll(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (default: current month)"] month: Option<String>,
    ) -> Result<()> {
        let period = match month {
            Some(month) => month.parse::<PayPeriod>()?,
            None => PayPeriod::containing(chrono::Utc::now())?,
        };
        let lines = payroll::payroll_for_period(&ctx.data().database, &period).await?;
        if lines.is_empty() {
            ctx.say(format!("No employees on the payroll for {period}."))
                .await?;
            return Ok(());
        }

        let currency = &ctx.data().company.currency_symbol;
        let total: f64 = lines.iter().map(|l| l.net_pay).sum();
        let fields = lines.iter().take(MAX_FIELDS).map(|l| {
            (
                l.name.clone(),
                format!(
                    "Pay **{}**\n{} trip(s), revenue {}",
                    format_amount(l.net_pay, currency),
                    l.finished_trips,
                    format_amount(l.trip_revenue, currency)
                ),
                true,
            )
        });
        let embed = serenity::CreateEmbed::default()
            .title(format!("Payroll {period}"))
            .description(format!("Total **{}**", format_amount(total, currency)))
            .color(EMBED_COLOR)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
