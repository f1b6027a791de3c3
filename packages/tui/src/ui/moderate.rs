use super::{error_line, field_block, pending_line, render_input, success_line};
use super::widgets::severity_color;
use crate::controller::ViewController;
use crate::state::{AppState, Field};
use modview_core::{mask_token, Action, ModerationVerdict, RequestState};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

pub fn render_with_area(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Token
            Constraint::Length(4), // Image
            Constraint::Min(3),    // Result
        ])
        .split(area);

    render_token(frame, state, controller, chunks[0]);
    render_image(frame, state, controller, chunks[1]);
    render_result(frame, controller, chunks[2]);
}

fn render_token(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let focused = state.focus() == Field::UserToken;
    let block = field_block("Access Token", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let placeholder = match controller.session().user_token() {
        Some(token) => format!("Current token {} (Enter a new one to replace)", mask_token(token)),
        None => "Enter your API token".to_string(),
    };
    render_input(frame, rows[0], &state.user_token_input, &placeholder, focused);

    if let Some(status) = controller.token_status() {
        let line = if status.success {
            success_line(&status.text)
        } else {
            error_line(&status.text)
        };
        frame.render_widget(Paragraph::new(line), rows[1]);
    }
}

fn render_image(frame: &mut Frame, state: &AppState, controller: &ViewController, area: Rect) {
    let focused = state.focus() == Field::ImagePath;
    let block = field_block("Image", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    render_input(
        frame,
        rows[0],
        &state.image_path_input,
        "Path to an image file, Enter to moderate",
        focused,
    );

    let detail = if let Some(error) = &state.image_error {
        error_line(error)
    } else if let Some(notice) = controller.notice(Action::ModerateImage) {
        error_line(notice)
    } else if let Some(image) = &state.image {
        Line::from(Span::styled(image.describe(), Style::default().fg(Color::Gray)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(detail), rows[1]);
}

fn render_result(frame: &mut Frame, controller: &ViewController, area: Rect) {
    let block = field_block("Result", false);
    let lines = match controller.moderation_state() {
        RequestState::Idle => vec![Line::from(Span::styled(
            "No image moderated yet",
            Style::default().fg(Color::DarkGray),
        ))],
        RequestState::Pending => vec![pending_line("Moderating...")],
        RequestState::Failed(message) => vec![error_line(message)],
        RequestState::Succeeded(verdict) => verdict_lines(verdict),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Overall safety, confidence and one colored line per category
pub fn verdict_lines(verdict: &ModerationVerdict) -> Vec<Line<'static>> {
    let safety_style = if verdict.is_safe {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
    .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Overall Safety: "),
            Span::styled(verdict.safety_label().to_string(), safety_style),
        ]),
        Line::from(format!("Confidence: {}", verdict.confidence_label())),
        Line::default(),
        Line::from(Span::styled(
            "Categories:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let ratings: Vec<_> = verdict.ratings().collect();
    if ratings.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none reported)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for rating in ratings {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                rating.to_string(),
                Style::default().fg(severity_color(rating.color())),
            ),
        ]));
    }
    lines
}
