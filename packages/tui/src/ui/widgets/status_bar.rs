use crate::controller::ViewController;
use crate::state::{AppState, Field, Tab};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Bottom line: activity indicator, location and context-aware shortcuts
pub struct StatusBarWidget<'a> {
    state: &'a AppState,
    controller: &'a ViewController,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a AppState, controller: &'a ViewController) -> Self {
        Self { state, controller }
    }

    /// Shown while any request is in flight
    fn activity(&self) -> Option<(&'static str, Style)> {
        self.controller.any_pending().then(|| {
            (
                "WORKING",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
    }

    fn breadcrumb(&self) -> String {
        match self.state.current_tab {
            Tab::Moderate => match self.controller.session().user_token() {
                Some(_) => " Moderate • token set".to_string(),
                None => " Moderate • no token".to_string(),
            },
            Tab::Admin if self.controller.admin_visible() => {
                format!(" Admin • {} tokens", self.controller.tokens().len())
            }
            Tab::Admin => " Admin • not authenticated".to_string(),
        }
    }

    fn shortcuts(&self) -> &'static str {
        if self.state.is_showing_confirmation_dialog() {
            return "Tab: Switch • Enter: Select • Esc: Cancel ";
        }

        match self.state.focus() {
            Field::UserToken => "Enter: Save token • Tab: Next • F1/F2: Tabs • Ctrl+C: Quit ",
            Field::ImagePath => "Enter: Moderate • Tab: Next • F1/F2: Tabs • Ctrl+C: Quit ",
            Field::AdminToken => "Enter: Authenticate • Tab: Next • F1/F2: Tabs • Ctrl+C: Quit ",
            Field::CreateToken => "Space: Toggle admin • Enter: Create • Tab: Next ",
            Field::TokenList => "↑↓: Select • d: Delete • r: Reload • Tab: Next ",
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let activity = self.activity();
        let shortcuts = self.shortcuts();
        let shortcuts_width = shortcuts.width() as u16;

        let mut constraints = Vec::with_capacity(3);
        if let Some((text, _)) = activity {
            constraints.push(Constraint::Length(text.len() as u16 + 2));
        }
        constraints.push(Constraint::Min(10));
        constraints.push(Constraint::Length(shortcuts_width));

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let mut current_chunk = 0;
        if let Some((text, style)) = activity {
            Paragraph::new(format!(" {} ", text))
                .style(style)
                .render(chunks[current_chunk], buf);
            current_chunk += 1;
        }

        Paragraph::new(self.breadcrumb())
            .style(Style::default().fg(Color::Gray))
            .render(chunks[current_chunk], buf);
        current_chunk += 1;

        Paragraph::new(shortcuts)
            .style(Style::default().fg(Color::DarkGray))
            .render(chunks[current_chunk], buf);
    }
}
