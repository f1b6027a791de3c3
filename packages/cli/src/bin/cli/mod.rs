pub mod admin;
pub mod moderate;
pub mod token;

use colored::*;
use modview_auth::{FileTokenStore, Session};
use modview_client::{AdminClient, ApiClient, ModerationClient};
use modview_config::Settings;
use modview_tui::{Completion, ViewController};
use std::process;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// A controller wired to the live service, for one-shot commands
pub struct Runner {
    pub controller: ViewController,
    completions: UnboundedReceiver<Completion>,
}

impl Runner {
    pub fn new(settings: &Settings, session: Session) -> Self {
        let api = ApiClient::new(settings.api_url.clone());
        let (sender, completions) = mpsc::unbounded_channel();
        let controller = ViewController::new(
            session,
            Arc::new(ModerationClient::new(api.clone())),
            Arc::new(AdminClient::new(api)),
            sender,
        );
        Self {
            controller,
            completions,
        }
    }

    /// Runner over the on-disk credential file
    pub fn with_stored_credentials(settings: &Settings) -> Self {
        Self::new(
            settings,
            Session::open(FileTokenStore::new(&settings.credentials_path)),
        )
    }

    /// Wait until every started request has been applied
    pub async fn settle(&mut self) {
        self.controller.settle(&mut self.completions).await;
    }
}

/// Print a failure line and exit non-zero
pub fn fail(message: &str) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    process::exit(1);
}
