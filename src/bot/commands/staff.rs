//! Staff Discord commands - `supplier_manage` and `employee_manage`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, is_unique_violation, join_within_limit},
        core::{employee, invoice::format_amount, supplier},
        errors::{Error, Result},
    };

    /// Parent command for managing suppliers.
    #[poise::command(
        slash_command,
        subcommands("supplier_add", "supplier_list", "supplier_delete")
    )]
    pub async fn supplier_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Supplier management command. Available subcommands:\n\
            `/supplier_manage add` - Add a supplier\n\
            `/supplier_manage list` - List suppliers\n\
            `/supplier_manage delete` - Delete a supplier",
        )
        .await?;
        Ok(())
    }

    /// Adds a supplier.
    #[poise::command(slash_command, rename = "add")]
    pub async fn supplier_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name (e.g., 'Bottler SA')"] name: String,
        #[description = "Contact phone"] phone: Option<String>,
    ) -> Result<()> {
        match supplier::create_supplier(&ctx.data().database, &name, phone).await {
            Ok(created) => {
                ctx.say(format!("✅ Supplier #{} '{}' added.", created.id, created.name))
                    .await?;
            }
            Err(e) if is_unique_violation(&e) => {
                ctx.say(format!("⚠️ A supplier named '{}' already exists.", name.trim()))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all active suppliers.
    #[poise::command(slash_command, rename = "list")]
    pub async fn supplier_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let suppliers = supplier::get_all_active_suppliers(&ctx.data().database).await?;
        if suppliers.is_empty() {
            ctx.say("No suppliers have been added yet.").await?;
            return Ok(());
        }

        let items: Vec<String> = suppliers
            .iter()
            .map(|s| match &s.phone {
                Some(phone) => format!("• #{} {} ({phone})", s.id, s.name),
                None => format!("• #{} {}", s.id, s.name),
            })
            .collect();
        ctx.say(join_within_limit("**Suppliers**", &items)).await?;
        Ok(())
    }

    /// Deletes a supplier. Past purchases keep its name.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn supplier_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Supplier to delete"]
        #[autocomplete = "autocomplete::autocomplete_supplier_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(found) = supplier::get_supplier_by_name(db, &name).await? else {
            return Err(Error::SupplierNotFound { id: name });
        };
        supplier::delete_supplier(db, found.id).await?;

        ctx.say(format!("✅ Supplier '{}' has been deleted.", found.name))
            .await?;
        Ok(())
    }

    /// Parent command for managing drivers and sellers.
    #[poise::command(
        slash_command,
        subcommands("employee_add", "employee_list", "employee_salary", "employee_delete")
    )]
    pub async fn employee_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Employee management command. Available subcommands:\n\
            `/employee_manage add` - Add an employee\n\
            `/employee_manage list` - List employees\n\
            `/employee_manage salary` - Change an employee's base salary\n\
            `/employee_manage delete` - Delete an employee",
        )
        .await?;
        Ok(())
    }

    /// Adds an employee.
    #[poise::command(slash_command, rename = "add")]
    pub async fn employee_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name"] name: String,
        #[description = "Fixed monthly pay"] base_salary: f64,
    ) -> Result<()> {
        let currency = &ctx.data().company.currency_symbol;

        match employee::create_employee(&ctx.data().database, &name, base_salary).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Employee #{} '{}' added at **{}** per month.",
                    created.id,
                    created.name,
                    format_amount(created.base_salary, currency)
                ))
                .await?;
            }
            Err(e) if is_unique_violation(&e) => {
                ctx.say(format!("⚠️ An employee named '{}' already exists.", name.trim()))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all active employees with their base salary.
    #[poise::command(slash_command, rename = "list")]
    pub async fn employee_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let currency = &ctx.data().company.currency_symbol;
        let employees = employee::get_all_active_employees(&ctx.data().database).await?;
        if employees.is_empty() {
            ctx.say("No employees have been added yet.").await?;
            return Ok(());
        }

        let items: Vec<String> = employees
            .iter()
            .map(|e| {
                format!(
                    "• #{} {} - {}",
                    e.id,
                    e.name,
                    format_amount(e.base_salary, currency)
                )
            })
            .collect();
        ctx.say(join_within_limit("**Employees**", &items)).await?;
        Ok(())
    }

    /// Changes an employee's base salary.
    #[poise::command(slash_command, rename = "salary")]
    pub async fn employee_salary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: String,
        #[description = "New monthly pay"] base_salary: f64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(found) = employee::get_employee_by_name(db, &name).await? else {
            return Err(Error::EmployeeNotFound { id: name });
        };
        let updated = employee::update_employee_salary(db, found.id, base_salary).await?;

        ctx.say(format!(
            "✅ Base salary of '{}' is now **{}**.",
            updated.name,
            format_amount(updated.base_salary, &ctx.data().company.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Deletes an employee. Trips they drove keep their name.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn employee_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee to delete"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(found) = employee::get_employee_by_name(db, &name).await? else {
            return Err(Error::EmployeeNotFound { id: name });
        };
        employee::delete_employee(db, found.id).await?;

        ctx.say(format!("✅ Employee '{}' has been deleted.", found.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
