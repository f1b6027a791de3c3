// ABOUTME: Token management commands for administrators
// ABOUTME: verify, list, create and delete, all authorized by a volatile admin token

use super::{fail, Runner};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use inquire::Confirm;
use modview_auth::Session;
use modview_cli::output::token_table;
use modview_config::Settings;
use modview_core::{mask_token, ClientError, RequestState};
use modview_tui::TriggerError;

#[derive(Args)]
pub struct AdminArgs {
    /// Admin token (defaults to MODVIEW_ADMIN_TOKEN; never saved)
    #[arg(long, global = true)]
    admin_token: Option<String>,

    #[command(subcommand)]
    command: AdminCommands,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Check that the admin token is accepted
    Verify,
    /// List every issued token
    List,
    /// Issue a new token
    Create {
        /// Give the new token admin scope
        #[arg(long)]
        admin: bool,
    },
    /// Revoke a token
    Delete {
        /// Token to revoke
        target: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl AdminArgs {
    pub async fn execute(&self, settings: &Settings) -> Result<()> {
        let admin_token = self
            .admin_token
            .clone()
            .or_else(|| settings.admin_token.clone())
            .unwrap_or_default();

        match &self.command {
            AdminCommands::Verify => verify_command(settings, &admin_token).await,
            AdminCommands::List => list_command(settings, &admin_token).await,
            AdminCommands::Create { admin } => create_command(settings, &admin_token, *admin).await,
            AdminCommands::Delete { target, yes } => {
                delete_command(settings, &admin_token, target, *yes).await
            }
        }
    }
}

/// Runner whose session holds only the admin token
fn admin_runner(settings: &Settings, admin_token: &str) -> Runner {
    let mut session = Session::in_memory();
    session.set_admin_token(admin_token);
    Runner::new(settings, session)
}

async fn verify_command(settings: &Settings, admin_token: &str) -> Result<()> {
    let mut runner = Runner::new(settings, Session::in_memory());
    if let Err(e) = runner.controller.trigger_authenticate(admin_token) {
        fail(&e.to_string());
    }
    runner.settle().await;

    match runner.controller.authenticate_state() {
        RequestState::Succeeded(()) => {
            println!(
                "{} Admin token {} verified",
                "✓".green().bold(),
                mask_token(admin_token.trim())
            );
            Ok(())
        }
        RequestState::Failed(message) => fail(message),
        _ => fail("Verification did not complete"),
    }
}

async fn list_command(settings: &Settings, admin_token: &str) -> Result<()> {
    let mut runner = admin_runner(settings, admin_token);
    if let Err(e) = runner.controller.trigger_load_tokens() {
        fail(&e.to_string());
    }
    runner.settle().await;

    if let Some(message) = runner.controller.load_state().failure() {
        fail(message);
    }

    let tokens = runner.controller.tokens();
    if tokens.is_empty() {
        println!("{}", "No tokens found".yellow());
        return Ok(());
    }

    println!("{}", token_table(tokens));
    println!("Total: {} tokens", tokens.len().to_string().cyan());
    Ok(())
}

async fn create_command(settings: &Settings, admin_token: &str, is_admin: bool) -> Result<()> {
    let mut runner = admin_runner(settings, admin_token);
    if let Err(e) = runner.controller.trigger_create_token(is_admin) {
        fail(&e.to_string());
    }
    runner.settle().await;

    match runner.controller.create_state() {
        RequestState::Succeeded(record) => {
            let scope = if record.is_admin { "admin" } else { "user" };
            println!("{} Created {} token", "✓".green().bold(), scope);
            println!("  {}", record.token.bold());
            Ok(())
        }
        RequestState::Failed(message) => fail(message),
        _ => fail("Token creation did not complete"),
    }
}

async fn delete_command(settings: &Settings, admin_token: &str, target: &str, yes: bool) -> Result<()> {
    let mut runner = admin_runner(settings, admin_token);

    let confirmed = yes
        || Confirm::new(&format!(
            "Delete token {}? This cannot be undone.",
            mask_token(target.trim())
        ))
        .with_default(false)
        .prompt()?;

    match runner.controller.trigger_delete_token(target, confirmed) {
        Ok(()) => {}
        Err(TriggerError::Invalid(ClientError::NotConfirmed)) => {
            println!("{}", "Deletion cancelled".yellow());
            return Ok(());
        }
        Err(e) => fail(&e.to_string()),
    }
    runner.settle().await;

    match runner.controller.delete_state() {
        RequestState::Succeeded(deleted) => {
            println!("{} Deleted token {}", "✓".green().bold(), mask_token(deleted));
            Ok(())
        }
        RequestState::Failed(message) => fail(message),
        _ => fail("Deletion did not complete"),
    }
}
