use super::{error_line, field_block, pending_line, render_input, success_line};
use crate::controller::ViewController;
use crate::state::{AppState, Field};
use modview_core::{Action, RequestState};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Row, Table, TableState};

pub fn render_with_area(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    if !controller.admin_visible() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);
        render_credential(frame, state, controller, chunks[0]);

        let hint = Paragraph::new(Line::from(Span::styled(
            "Authenticate with an admin token to manage access tokens",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(hint, chunks[1]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Admin token
            Constraint::Length(4), // Create
            Constraint::Min(5),    // Token list
        ])
        .split(area);

    render_credential(frame, state, controller, chunks[0]);
    render_create(frame, state, controller, chunks[1]);
    render_tokens(frame, state, controller, chunks[2]);
}

fn render_credential(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let focused = state.focus() == Field::AdminToken;
    let block = field_block("Admin Token", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    render_input(
        frame,
        rows[0],
        &state.admin_token_input,
        "Enter an admin token, Enter to authenticate",
        focused,
    );

    let status = if let Some(notice) = controller.notice(Action::AuthenticateAdmin) {
        error_line(notice)
    } else {
        match controller.authenticate_state() {
            RequestState::Idle => Line::default(),
            RequestState::Pending => pending_line("Verifying admin token..."),
            RequestState::Succeeded(()) => success_line("Authenticated as admin"),
            RequestState::Failed(message) => error_line(message),
        }
    };
    frame.render_widget(Paragraph::new(status), rows[1]);
}

fn render_create(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let focused = state.focus() == Field::CreateToken;
    let block = field_block("Create Token", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let checkbox = if state.create_as_admin { "[x]" } else { "[ ]" };
    let button_style = if controller.is_busy(Action::CreateToken) {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let controls = Line::from(vec![
        Span::raw(format!("{} Admin token", checkbox)),
        Span::raw("    "),
        Span::styled("[Create]", button_style),
    ]);
    frame.render_widget(Paragraph::new(controls), rows[0]);

    let status = if let Some(notice) = controller.notice(Action::CreateToken) {
        error_line(notice)
    } else {
        match controller.create_state() {
            RequestState::Idle => Line::default(),
            RequestState::Pending => pending_line("Creating token..."),
            RequestState::Succeeded(record) => success_line(&format!(
                "Created {} token: {}",
                if record.is_admin { "admin" } else { "user" },
                record.token
            )),
            RequestState::Failed(message) => error_line(message),
        }
    };
    frame.render_widget(Paragraph::new(status), rows[1]);
}

fn render_tokens(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let focused = state.focus() == Field::TokenList;
    let tokens = controller.tokens();
    let title = if controller.is_busy(Action::LoadTokens) {
        "Tokens (loading...)".to_string()
    } else {
        format!("Tokens ({})", tokens.len())
    };
    let block = field_block(&title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let rows: Vec<Row> = tokens
        .iter()
        .map(|record| {
            let deleting = controller.deleting() == Some(record.token.as_str());
            let scope = if record.is_admin { "Admin" } else { "User" };
            let action = if deleting { "Deleting..." } else { "" };
            let row = Row::new(vec![
                record.token.clone(),
                scope.to_string(),
                record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                action.to_string(),
            ]);
            if deleting {
                row.style(Style::default().fg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["Token", "Type", "Created", ""]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(17),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(state.selected_token());
    frame.render_stateful_widget(table, chunks[0], &mut table_state);

    let status = if let Some(notice) = controller.notice(Action::DeleteToken) {
        error_line(notice)
    } else if let Some(message) = controller.delete_state().failure() {
        error_line(message)
    } else if let Some(message) = controller.load_state().failure() {
        error_line(message)
    } else if let Some(notice) = controller.notice(Action::LoadTokens) {
        error_line(notice)
    } else if let Some(target) = controller.delete_state().succeeded() {
        success_line(&format!("Deleted {}", target))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);
}
