//! Trip Discord commands - start, show, finish, invoice and list.
//!
//! `trip_finish` runs in two steps: without `confirm` it only shows the invoice the
//! trip would get, so the operator can check the figures before closing it.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, MAX_MESSAGE_LEN, handlers::autocomplete, join_within_limit, list_limit,
            parse,
        },
        core::{
            employee, invoice,
            trip::{self, FinishTrip, NewTrip, TripView},
            vehicle,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;

    const EMBED_COLOR: u32 = 0x0058_65F2;

    async fn resolve_vehicle(
        db: &sea_orm::DatabaseConnection,
        registration: &str,
    ) -> Result<crate::entities::vehicle::Model> {
        vehicle::get_vehicle_by_registration(db, registration)
            .await?
            .ok_or_else(|| Error::VehicleNotFound {
                id: registration.to_string(),
            })
    }

    fn summary_embed(view: &TripView, currency: &str) -> serenity::CreateEmbed {
        let money = |amount: f64| invoice::format_amount(amount, currency);
        let products = if view.products.is_empty() {
            "Nothing on board".to_string()
        } else {
            view.products
                .iter()
                .map(|l| {
                    format!(
                        "#{} {}: out {}/{}, back {}/{}, sold {}",
                        l.entity_id,
                        l.designation,
                        l.total_out_boxes,
                        l.total_out_units,
                        l.returned_boxes,
                        l.returned_units,
                        l.units_sold
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut embed = serenity::CreateEmbed::default()
            .title(format!(
                "Trip #{} - {} ({})",
                view.trip_id, view.vehicle_registration, view.status
            ))
            .color(EMBED_COLOR)
            .field("Products", products, false);

        if !view.crates.is_empty() {
            let crates = view
                .crates
                .iter()
                .map(|l| {
                    format!(
                        "#{} {}: previous {}, issued {}, returned {}",
                        l.entity_id,
                        l.designation,
                        l.previous_remaining,
                        l.issued_boxes,
                        l.returned_boxes
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            embed = embed.field("Crates", crates, false);
        }

        embed = embed
            .field("Expected", money(view.totals.expected_amount), true)
            .field("Net expected", money(view.totals.net_expected), true);
        if let Some(difference) = view.totals.difference {
            embed = embed.field("Difference", money(difference), true);
        }
        embed
    }

    async fn send_invoice(
        ctx: poise::Context<'_, BotData, Error>,
        view: &TripView,
        heading: &str,
    ) -> Result<()> {
        let text = invoice::render_invoice(view, &ctx.data().company);
        let reply = if text.len() <= MAX_MESSAGE_LEN {
            poise::CreateReply::default().content(format!("{heading}\n```text\n{text}\n```"))
        } else {
            poise::CreateReply::default()
                .content(heading.to_string())
                .attachment(serenity::CreateAttachment::bytes(
                    text.into_bytes(),
                    format!("trip-{}.txt", view.trip_id),
                ))
        };
        ctx.send(reply).await?;
        Ok(())
    }

    /// Starts a trip: loads a vehicle with products and crates.
    ///
    /// If the vehicle still has an active trip, it is rolled over and its stock is
    /// carried into the new one.
    #[poise::command(slash_command)]
    pub async fn trip_start(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Vehicle registration"]
        #[autocomplete = "autocomplete::autocomplete_vehicle_registration"]
        vehicle: String,
        #[description = "Products issued, as id:boxes/units (e.g., 3:12/4, 7:2)"] products: Option<
            String,
        >,
        #[description = "Crates issued, as id:boxes"] crates: Option<String>,
        #[description = "Driver or seller"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        driver: Option<String>,
    ) -> Result<()> {
        let product_issues = parse::parse_issue_lines(products.as_deref().unwrap_or_default())?;
        let crate_issues = parse::parse_issue_lines(crates.as_deref().unwrap_or_default())?;

        let db = &ctx.data().database;
        let found = resolve_vehicle(db, &vehicle).await?;
        let employee_id = match driver {
            Some(name) => Some(
                employee::get_employee_by_name(db, &name)
                    .await?
                    .ok_or(Error::EmployeeNotFound { id: name })?
                    .id,
            ),
            None => None,
        };
        let rolled = trip::get_active_trip_for_vehicle(db, found.id).await?;

        let started = trip::start_trip(
            db,
            NewTrip {
                vehicle_id: found.id,
                employee_id,
                product_issues,
                crate_issues,
            },
        )
        .await?;
        let view = trip::load_trip_view(db, started.id).await?;

        let mut reply = poise::CreateReply::default()
            .embed(summary_embed(&view, &ctx.data().company.currency_symbol));
        if let Some(rolled) = rolled {
            reply = reply.content(format!(
                "↪️ Trip #{} was still active and has been rolled over into this one.",
                rolled.id
            ));
        }
        ctx.send(reply).await?;
        Ok(())
    }

    /// Shows the current figures of a trip.
    #[poise::command(slash_command)]
    pub async fn trip_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Trip number"] trip_id: i64,
    ) -> Result<()> {
        let view = trip::load_trip_view(&ctx.data().database, trip_id).await?;
        ctx.send(
            poise::CreateReply::default()
                .embed(summary_embed(&view, &ctx.data().company.currency_symbol)),
        )
        .await?;
        Ok(())
    }

    /// Finishes a trip with its returns, waste, charges and the cash handed in.
    ///
    /// Without `confirm`, only previews the invoice.
    #[poise::command(slash_command)]
    #[allow(clippy::too_many_arguments)]
    pub async fn trip_finish(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Trip number"] trip_id: i64,
        #[description = "Cash handed in by the driver"] received: f64,
        #[description = "Products returned, as id:boxes/units"] returns: Option<String>,
        #[description = "Crates returned, as id:boxes"] crate_returns: Option<String>,
        #[description = "Waste, as id:units"] waste: Option<String>,
        #[description = "Charges, as label=amount"] charges: Option<String>,
        #[description = "Set to true to close the trip"] confirm: Option<bool>,
    ) -> Result<()> {
        let finish = FinishTrip {
            product_returns: parse::parse_return_lines(returns.as_deref().unwrap_or_default())?,
            crate_returns: parse::parse_return_lines(
                crate_returns.as_deref().unwrap_or_default(),
            )?,
            waste: parse::parse_waste(waste.as_deref().unwrap_or_default())?,
            charges: parse::parse_charges(charges.as_deref().unwrap_or_default())?,
            received_amount: received,
        };
        let db = &ctx.data().database;

        if confirm.unwrap_or(false) {
            let view = trip::finish_trip(db, trip_id, finish).await?;
            send_invoice(ctx, &view, &format!("✅ Trip #{trip_id} finished.")).await
        } else {
            let view = trip::preview_finish(db, trip_id, &finish).await?;
            send_invoice(
                ctx,
                &view,
                "🔎 Preview only. Run the command again with `confirm: True` to close the trip.",
            )
            .await
        }
    }

    /// Prints the invoice of a trip.
    #[poise::command(slash_command)]
    pub async fn trip_invoice(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Trip number"] trip_id: i64,
    ) -> Result<()> {
        let view = trip::load_trip_view(&ctx.data().database, trip_id).await?;
        send_invoice(ctx, &view, &format!("🧾 Invoice of trip #{trip_id}")).await
    }

    /// Lists recent trips, optionally for one vehicle.
    #[poise::command(slash_command)]
    pub async fn trip_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only trips of this vehicle"]
        #[autocomplete = "autocomplete::autocomplete_vehicle_registration"]
        vehicle: Option<String>,
        #[description = "How many trips to show (default 10, at most 25)"] limit: Option<u64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let vehicle_id = match vehicle {
            Some(registration) => Some(resolve_vehicle(db, &registration).await?.id),
            None => None,
        };

        let trips = trip::list_trips(db, vehicle_id, list_limit(limit)).await?;
        if trips.is_empty() {
            ctx.say("No trips recorded yet.").await?;
            return Ok(());
        }

        let mut registrations: HashMap<i64, String> = HashMap::new();
        for t in &trips {
            if !registrations.contains_key(&t.vehicle_id) {
                let registration = vehicle::get_vehicle_by_id(db, t.vehicle_id)
                    .await?
                    .map_or_else(|| "UNKNOWN".to_string(), |v| v.registration);
                registrations.insert(t.vehicle_id, registration);
            }
        }

        let items: Vec<String> = trips
            .iter()
            .map(|t| {
                format!(
                    "• #{} {} {}- {} since {}",
                    t.id,
                    registrations
                        .get(&t.vehicle_id)
                        .map_or("UNKNOWN", String::as_str),
                    t.driver
                        .as_deref()
                        .map(|d| format!("({d}) "))
                        .unwrap_or_default(),
                    t.status,
                    t.started_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect();
        ctx.say(join_within_limit("**Recent trips**", &items)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
