//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module suggests vehicle registrations, product designations, supplier names
//! and employee names as the operator types.

use crate::{
    bot::BotData,
    core::{employee, product, supplier, vehicle},
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Keeps the candidates containing `partial` (case-insensitive), sorted.
fn matching(candidates: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for vehicle registrations.
pub async fn autocomplete_vehicle_registration(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(vehicles) = vehicle::get_all_active_vehicles(db).await else {
        return Vec::new();
    };

    // Registrations are stored without whitespace
    let partial: String = partial.chars().filter(|c| !c.is_whitespace()).collect();
    matching(vehicles.into_iter().map(|v| v.registration), &partial)
}

/// Provides autocomplete suggestions for product designations.
///
/// Returns just the designation so it matches command parameters exactly.
pub async fn autocomplete_product_designation(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(products) = product::get_all_active_products(db).await else {
        return Vec::new();
    };

    matching(products.into_iter().map(|p| p.designation), partial)
}

/// Provides autocomplete suggestions for supplier names.
pub async fn autocomplete_supplier_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(suppliers) = supplier::get_all_active_suppliers(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(suppliers.into_iter().map(|s| s.name), partial)
}

/// Provides autocomplete suggestions for employee names.
pub async fn autocomplete_employee_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(employees) = employee::get_all_active_employees(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(employees.into_iter().map(|e| e.name), partial)
}
