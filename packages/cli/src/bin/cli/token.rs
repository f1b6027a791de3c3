// ABOUTME: Commands for the durable user access token
// ABOUTME: set, show and clear the token saved in the credential file

use super::{fail, Runner};
use anyhow::Result;
use clap::Subcommand;
use colored::*;
use modview_auth::{FileTokenStore, Session};
use modview_config::Settings;
use modview_core::mask_token;

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Save the access token used for moderation requests
    Set {
        /// Access token issued by the service
        token: String,
    },
    /// Show the saved access token
    Show {
        /// Print the full token instead of a short prefix
        #[arg(long)]
        reveal: bool,
    },
    /// Remove the saved access token
    Clear,
}

impl TokenCommands {
    pub fn execute(&self, settings: &Settings) -> Result<()> {
        match self {
            TokenCommands::Set { token } => set_command(settings, token),
            TokenCommands::Show { reveal } => show_command(settings, *reveal),
            TokenCommands::Clear => clear_command(settings),
        }
    }
}

fn set_command(settings: &Settings, token: &str) -> Result<()> {
    let mut runner = Runner::with_stored_credentials(settings);

    if runner.controller.submit_user_token(token).is_err() {
        let message = runner
            .controller
            .token_status()
            .map(|status| status.text.clone())
            .unwrap_or_else(|| "Could not save token".to_string());
        fail(&message);
    }

    println!("{} Token set successfully!", "✓".green().bold());
    println!(
        "  {} {}",
        "Saved to".dimmed(),
        settings.credentials_path.display()
    );
    Ok(())
}

fn show_command(settings: &Settings, reveal: bool) -> Result<()> {
    let session = Session::open(FileTokenStore::new(&settings.credentials_path));

    match session.user_token() {
        Some(token) => {
            let shown = if reveal {
                token.to_string()
            } else {
                mask_token(token)
            };
            println!("{} {}", "Token:".cyan().bold(), shown);
            println!(
                "  {} {}",
                "Stored in".dimmed(),
                settings.credentials_path.display()
            );
        }
        None => {
            println!("{}", "No token saved".yellow());
            println!("{}", "Use 'modview token set <TOKEN>' to save one".dimmed());
        }
    }
    Ok(())
}

fn clear_command(settings: &Settings) -> Result<()> {
    let mut session = Session::open(FileTokenStore::new(&settings.credentials_path));
    session.clear_user_token()?;
    println!("{} Token cleared", "✓".green().bold());
    Ok(())
}
