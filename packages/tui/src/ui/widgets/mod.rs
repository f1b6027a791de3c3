pub mod dialog;
pub mod status_bar;

pub use dialog::{ConfirmationDialog, ConfirmationDialogWidget, DialogFocus, DialogResult};
pub use status_bar::StatusBarWidget;

use ratatui::style::Color;

/// Terminal color for a `#rrggbb` severity color
pub fn severity_color(hex: &str) -> Color {
    hex.parse::<Color>().unwrap_or(Color::Gray)
}
