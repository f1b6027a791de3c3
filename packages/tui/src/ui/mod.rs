pub mod admin;
pub mod moderate;
pub mod widgets;

use crate::controller::ViewController;
use crate::input::InputBuffer;
use crate::state::{AppState, Tab};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use widgets::{ConfirmationDialogWidget, StatusBarWidget};

/// Main UI rendering function
pub fn render(frame: &mut Frame, state: &AppState, controller: &ViewController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(3),    // Active tab
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("F{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Modview "))
        .select(state.current_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    match state.current_tab {
        Tab::Moderate => moderate::render_with_area(frame, state, controller, chunks[1]),
        Tab::Admin => admin::render_with_area(frame, state, controller, chunks[1]),
    }

    frame.render_widget(StatusBarWidget::new(state, controller), chunks[2]);

    if let Some(dialog) = &state.confirmation_dialog {
        frame.render_widget(ConfirmationDialogWidget::new(dialog), frame.area());
    }
}

/// Bordered block whose border lights up when focused
pub(crate) fn field_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(border)
}

/// One-line text field; places the terminal cursor when focused
pub(crate) fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &InputBuffer,
    placeholder: &str,
    focused: bool,
) {
    let line = if input.is_empty() {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::raw(input.display_text())
    };
    frame.render_widget(Paragraph::new(line), area);

    if focused && area.width > 0 {
        let column = input.cursor_display_column().min(area.width - 1);
        frame.set_cursor_position((area.x + column, area.y));
    }
}

pub(crate) fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))
}

pub(crate) fn success_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Green),
    ))
}

pub(crate) fn pending_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    ))
}
