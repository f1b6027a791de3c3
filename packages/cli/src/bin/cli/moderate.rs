use super::{fail, Runner};
use anyhow::{Context, Result};
use colored::*;
use modview_client::ImageUpload;
use modview_config::Settings;
use modview_core::RequestState;
use modview_cli::output::verdict_report;
use std::path::Path;

/// Submit one image and print the verdict
pub async fn execute(settings: &Settings, image: &Path) -> Result<()> {
    let upload = ImageUpload::from_path(image)
        .with_context(|| format!("Could not read {}", image.display()))?;

    let mut runner = Runner::with_stored_credentials(settings);
    println!("{} {}", "Moderating".cyan().bold(), upload.describe());

    if let Err(e) = runner.controller.trigger_moderation(Some(upload)) {
        fail(&e.to_string());
    }
    runner.settle().await;

    match runner.controller.moderation_state() {
        RequestState::Succeeded(verdict) => {
            println!();
            for line in verdict_report(verdict) {
                println!("{}", line);
            }
            Ok(())
        }
        RequestState::Failed(message) => fail(message),
        RequestState::Idle | RequestState::Pending => fail("Moderation did not complete"),
    }
}
