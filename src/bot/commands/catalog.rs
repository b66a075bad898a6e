//! Catalog Discord commands - `product_manage`, `crate_manage` and `vehicle_manage`.
//!
//! Lists show record ids, which are what the trip and purchase line arguments use.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, is_unique_violation},
        core::{crate_box, product, vehicle},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const EMBED_COLOR: u32 = 0x0058_65F2;

    /// Parent command for managing the products sold from the trucks.
    #[poise::command(
        slash_command,
        subcommands("product_add", "product_list", "product_price", "product_delete")
    )]
    pub async fn product_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Product management command. Available subcommands:\n\
            `/product_manage add` - Add a new product\n\
            `/product_manage list` - List all products\n\
            `/product_manage price` - Change a product's unit price\n\
            `/product_manage delete` - Delete a product";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new product to the catalog.
    #[poise::command(slash_command, rename = "add")]
    pub async fn product_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique designation (e.g., 'Cola 33cl')"] designation: String,
        #[description = "Selling price of one unit"] unit_price: f64,
        #[description = "Units per box (0 if sold by the unit only)"] capacity_per_box: u32,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().company.currency_symbol;

        match product::create_product(db, designation.clone(), unit_price, capacity_per_box).await
        {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Product #{} '{}' added at **{:.2} {currency}** per unit, {} per box.",
                    created.id, created.designation, created.unit_price, created.capacity_per_box
                ))
                .await?;
            }
            Err(e) if is_unique_violation(&e) => {
                ctx.say(format!(
                    "⚠️ A product named '{}' already exists. Designations must be unique.",
                    designation.trim()
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all active products with their ids, prices and box capacities.
    #[poise::command(slash_command, rename = "list")]
    pub async fn product_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().company.currency_symbol;

        let products = product::get_all_active_products(db).await?;
        if products.is_empty() {
            ctx.say("No products have been defined yet. Use `/product_manage add` to create some!")
                .await?;
            return Ok(());
        }

        let fields = products.into_iter().map(|p| {
            (
                format!("#{} {}", p.id, p.designation),
                format!("{:.2} {currency} per unit, {} per box", p.unit_price, p.capacity_per_box),
                false,
            )
        });
        let embed = serenity::CreateEmbed::default()
            .title("**Product List**")
            .color(EMBED_COLOR)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Changes the unit price of a product. Finished trips are not repriced.
    #[poise::command(slash_command, rename = "price")]
    pub async fn product_price(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to reprice"]
        #[autocomplete = "autocomplete::autocomplete_product_designation"]
        designation: String,
        #[description = "New selling price of one unit"] unit_price: f64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = product::get_product_by_designation(db, &designation).await? else {
            return Err(Error::ProductNotFound { id: designation });
        };
        let updated = product::update_product_price(db, found.id, unit_price).await?;

        ctx.say(format!(
            "✅ Price for '{}' updated to **{:.2} {}** per unit.",
            updated.designation, updated.unit_price, ctx.data().company.currency_symbol
        ))
        .await?;
        Ok(())
    }

    /// Deletes a product. Past trips keep showing it.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn product_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to delete"]
        #[autocomplete = "autocomplete::autocomplete_product_designation"]
        designation: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = product::get_product_by_designation(db, &designation).await? else {
            return Err(Error::ProductNotFound { id: designation });
        };
        product::delete_product(db, found.id).await?;

        ctx.say(format!("✅ Product '{}' has been deleted.", found.designation))
            .await?;
        Ok(())
    }

    /// Parent command for managing crate types.
    #[poise::command(
        slash_command,
        subcommands("crate_add", "crate_list", "crate_delete")
    )]
    pub async fn crate_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Crate management command. Available subcommands:\n\
            `/crate_manage add` - Add a crate type\n\
            `/crate_manage list` - List crate types\n\
            `/crate_manage delete` - Delete a crate type",
        )
        .await?;
        Ok(())
    }

    /// Adds a new crate type.
    #[poise::command(slash_command, rename = "add")]
    pub async fn crate_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique designation (e.g., 'Plastic 24')"] designation: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        match crate_box::create_crate(db, designation.clone()).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Crate type #{} '{}' added.",
                    created.id, created.designation
                ))
                .await?;
            }
            Err(e) if is_unique_violation(&e) => {
                ctx.say(format!(
                    "⚠️ A crate type named '{}' already exists.",
                    designation.trim()
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all active crate types.
    #[poise::command(slash_command, rename = "list")]
    pub async fn crate_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let crates = crate_box::get_all_active_crates(&ctx.data().database).await?;
        if crates.is_empty() {
            ctx.say("No crate types have been defined yet.").await?;
            return Ok(());
        }

        let list = crates
            .iter()
            .map(|c| format!("• #{} {}", c.id, c.designation))
            .collect::<Vec<_>>()
            .join("\n");
        ctx.say(format!("**Crate types**\n{list}")).await?;
        Ok(())
    }

    /// Deletes a crate type by id.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn crate_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Id of the crate type, as shown by /crate_manage list"] id: i64,
    ) -> Result<()> {
        let deleted = crate_box::delete_crate(&ctx.data().database, id).await?;
        ctx.say(format!("✅ Crate type '{}' has been deleted.", deleted.designation))
            .await?;
        Ok(())
    }

    /// Parent command for managing the fleet.
    #[poise::command(
        slash_command,
        subcommands("vehicle_add", "vehicle_list", "vehicle_delete")
    )]
    pub async fn vehicle_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Vehicle management command. Available subcommands:\n\
            `/vehicle_manage add` - Register a vehicle\n\
            `/vehicle_manage list` - List vehicles\n\
            `/vehicle_manage delete` - Remove a vehicle",
        )
        .await?;
        Ok(())
    }

    /// Registers a new vehicle.
    #[poise::command(slash_command, rename = "add")]
    pub async fn vehicle_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration plate"] registration: String,
        #[description = "Optional label (e.g., 'Blue van')"] label: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        match vehicle::create_vehicle(db, &registration, label).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Vehicle #{} '{}' registered.",
                    created.id, created.registration
                ))
                .await?;
            }
            Err(e) if is_unique_violation(&e) => {
                ctx.say(format!(
                    "⚠️ Vehicle '{}' is already registered.",
                    vehicle::normalize_registration(&registration)
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all active vehicles.
    #[poise::command(slash_command, rename = "list")]
    pub async fn vehicle_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let vehicles = vehicle::get_all_active_vehicles(&ctx.data().database).await?;
        if vehicles.is_empty() {
            ctx.say("No vehicles have been registered yet.").await?;
            return Ok(());
        }

        let list = vehicles
            .iter()
            .map(|v| match &v.label {
                Some(label) => format!("• #{} {} ({label})", v.id, v.registration),
                None => format!("• #{} {}", v.id, v.registration),
            })
            .collect::<Vec<_>>()
            .join("\n");
        ctx.say(format!("**Vehicles**\n{list}")).await?;
        Ok(())
    }

    /// Removes a vehicle from the fleet. Refused while it has an active trip.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn vehicle_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Registration plate"]
        #[autocomplete = "autocomplete::autocomplete_vehicle_registration"]
        registration: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = vehicle::get_vehicle_by_registration(db, &registration).await? else {
            return Err(Error::VehicleNotFound { id: registration });
        };
        vehicle::delete_vehicle(db, found.id).await?;

        ctx.say(format!("✅ Vehicle '{}' has been removed.", found.registration))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
