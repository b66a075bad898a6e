//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for dispatch operators: catalog and
//! staff management, trip start and finish, invoices, purchases and payroll, plus
//! autocomplete handlers and bot context management.

/// Discord command implementations (catalog, staff, trip, purchase, payroll, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Parsing of compact line-item arguments
pub mod parse;

use crate::{config::company::CompanyProfile, errors::Error};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Discord rejects messages over 2000 characters; leaves room for a header
pub const MAX_MESSAGE_LEN: usize = 1900;

/// Default number of rows shown by list commands
pub const DEFAULT_LIST_LIMIT: u64 = 10;

/// Largest number of rows a list command will fetch
pub const MAX_LIST_LIMIT: u64 = 25;

/// Clamps a requested list size to `1..=MAX_LIST_LIMIT`.
#[must_use]
pub fn list_limit(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT)
}

/// Joins `items` under `header`, one per line, without going past
/// [`MAX_MESSAGE_LEN`]. Items that do not fit are counted in a final line.
#[must_use]
pub fn join_within_limit(header: &str, items: &[String]) -> String {
    let mut message = header.to_string();
    for (shown, item) in items.iter().enumerate() {
        let remaining = items.len() - shown;
        // Keep room for the "... and N more" line
        let reserve = if remaining > 1 { 32 } else { 0 };
        if message.len() + 1 + item.len() + reserve > MAX_MESSAGE_LEN {
            message.push_str(&format!("\n… and {remaining} more"));
            return message;
        }
        message.push('\n');
        message.push_str(item);
    }
    message
}

/// True for database errors raised by a unique constraint (duplicate name).
#[must_use]
pub fn is_unique_violation(error: &Error) -> bool {
    let message = format!("{error:?}");
    matches!(error, Error::Database(_))
        && (message.contains("UNIQUE") || message.contains("unique"))
}

/// Shared data available to all bot commands.
/// This structure holds the database connection and the company profile
/// used when printing invoices.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Identity printed on invoices
    pub company: CompanyProfile,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, company: CompanyProfile) -> Self {
        Self { database, company }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = if error.is_user_error() {
                warn!(code = error.code(), "Command `{}` rejected: {error}", ctx.command().name);
                format!("❌ {error} (`{}`)", error.code())
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong. Please try again later.".to_string()
            };
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be created or the connection fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> crate::errors::Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::product_manage(),
                commands::crate_manage(),
                commands::vehicle_manage(),
                commands::supplier_manage(),
                commands::employee_manage(),
                commands::trip_start(),
                commands::trip_show(),
                commands::trip_finish(),
                commands::trip_invoice(),
                commands::trip_list(),
                commands::purchase_record(),
                commands::purchase_list(),
                commands::payroll(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_limit_is_capped() {
        assert_eq!(list_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(0)), 1);
        assert_eq!(list_limit(Some(5)), 5);
        assert_eq!(list_limit(Some(10_000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_join_within_limit_fits_one_message() {
        let items: Vec<String> = (0..500)
            .map(|i| format!("• #{i} TRUCK{i:04} - finished since 2026-03-02 07:30"))
            .collect();
        let message = join_within_limit("**Recent trips**", &items);

        assert!(message.len() <= MAX_MESSAGE_LEN);
        assert!(message.starts_with("**Recent trips**\n• #0 TRUCK0000"));
        assert!(message.ends_with("more"));
    }

    #[test]
    fn test_join_within_limit_keeps_short_lists() {
        let items = vec!["• a".to_string(), "• b".to_string()];
        assert_eq!(join_within_limit("List", &items), "List\n• a\n• b");
    }
}
