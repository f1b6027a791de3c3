//! Modview TUI - terminal front end for the image moderation service
//!
//! A two-tab ratatui application: submit images for moderation with a
//! stored access token, and manage access tokens with an admin token.
//! All request lifecycles are owned by [`controller::ViewController`].

pub mod app;
pub mod controller;
pub mod events;
pub mod input;
pub mod state;
pub mod ui;

pub use app::App;
pub use controller::{Completion, StatusLine, TriggerError, ViewController};
pub use state::AppState;
