use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use modview_cli::logging::{self, LogTarget};
use modview_config::Settings;
use std::path::PathBuf;
use std::process;
use tracing::debug;

mod cli;

use cli::admin::AdminArgs;
use cli::token::TokenCommands;

#[derive(Parser)]
#[command(name = "modview")]
#[command(about = "Modview - client for the image moderation service")]
#[command(version)]
struct Cli {
    /// Moderation service URL (overrides MODVIEW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui,
    /// Manage the saved access token
    #[command(subcommand)]
    Token(TokenCommands),
    /// Submit an image for moderation
    Moderate {
        /// Image file to classify
        image: PathBuf,
    },
    /// Manage access tokens (requires an admin token)
    Admin(AdminArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(url) = &cli.api_url {
        settings = settings.with_api_url(url)?;
    }

    let target = match cli.command {
        Commands::Tui => LogTarget::File(settings.log_file.clone()),
        _ => LogTarget::Stderr,
    };
    logging::init(&settings.log_filter, target)?;
    debug!(api_url = %settings.api_url, "Starting modview");

    match cli.command {
        Commands::Tui => start_tui(&settings).await,
        Commands::Token(token_cmd) => token_cmd.execute(&settings),
        Commands::Moderate { image } => cli::moderate::execute(&settings, &image).await,
        Commands::Admin(admin_args) => admin_args.execute(&settings).await,
    }
}

async fn start_tui(settings: &Settings) -> Result<()> {
    use crossterm::{execute, terminal};

    let mut app = modview_tui::App::new(settings);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Run the application with proper cleanup
    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if there was an error
    let cleanup_result = (|| -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    })();

    if let Err(cleanup_error) = cleanup_result {
        eprintln!("Terminal cleanup error: {}", cleanup_error);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_delete() {
        let cli = Cli::try_parse_from([
            "modview",
            "--api-url",
            "http://moderation.internal:7000",
            "admin",
            "delete",
            "abc123",
            "--admin-token",
            "root",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://moderation.internal:7000"));
        assert!(matches!(cli.command, Commands::Admin(_)));
    }

    #[test]
    fn test_parse_moderate_requires_image() {
        assert!(Cli::try_parse_from(["modview", "moderate"]).is_err());

        let cli = Cli::try_parse_from(["modview", "moderate", "cat.png"]).unwrap();
        match cli.command {
            Commands::Moderate { image } => assert_eq!(image, PathBuf::from("cat.png")),
            _ => panic!("expected moderate command"),
        }
    }
}
