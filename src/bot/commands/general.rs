//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Trip desk help**\n\
        Stock lines are typed as `id:boxes/units`, separated by commas (e.g. `3:12/4, 7:2`).\n\
        Waste is `id:units`, charges are `label=amount`.\n\n\
        **Trips**\n\
        • `/trip_start <vehicle> [products] [crates] [driver]` - Loads a truck and starts a trip; the driver is an employee.\n\
        • `/trip_show <trip>` - Shows the running figures of a trip.\n\
        • `/trip_finish <trip> <received> [returns] [crate_returns] [waste] [charges] [confirm]` - Previews, then closes a trip.\n\
        • `/trip_invoice <trip>` - Prints the invoice of a trip.\n\
        • `/trip_list [vehicle] [limit]` - Lists recent trips.\n\n\
        **Purchases**\n\
        • `/purchase_record <supplier> <lines> [reference]` - Records goods received (`id:boxes/units@unit_cost`).\n\
        • `/purchase_list [limit]` - Lists recent purchases.\n\n\
        **Catalog**\n\
        • `/product_manage <add|list|price|delete>` - Manage products.\n\
        • `/crate_manage <add|list|delete>` - Manage crate types.\n\
        • `/vehicle_manage <add|list|delete>` - Manage vehicles.\n\
        • `/supplier_manage <add|list|delete>` - Manage suppliers.\n\
        • `/employee_manage <add|list|salary|delete>` - Manage drivers and sellers.\n\
        • `/payroll [month]` - Base pay, trips and revenue per employee for a month (YYYY-MM).\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
