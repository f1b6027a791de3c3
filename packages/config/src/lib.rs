// ABOUTME: Configuration for the Modview client
// ABOUTME: Resolves service URL, credential path and logging settings from the environment

pub mod constants;
mod settings;

pub use settings::{modview_dir, ConfigError, Settings};
