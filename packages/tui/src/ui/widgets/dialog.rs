use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Result of user interaction with the confirmation dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    Confirmed,
    Cancelled,
    /// Still waiting for input
    Pending,
}

/// Which button has focus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogFocus {
    /// Default, so a stray Enter never confirms
    Cancel,
    Confirm,
}

/// Modal yes/no prompt guarding an irreversible action on `subject`
#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    /// The item the action applies to, e.g. the token being revoked
    pub subject: String,
    pub confirm_text: String,
    pub focus: DialogFocus,
}

impl ConfirmationDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            subject: subject.into(),
            confirm_text: "Confirm".to_string(),
            focus: DialogFocus::Cancel,
        }
    }

    /// Confirmation prompt for revoking a token
    pub fn delete_token(token: &str) -> Self {
        let mut dialog = Self::new(
            "Delete Token",
            "Are you sure you want to delete this token?",
            token,
        );
        dialog.confirm_text = "Delete".to_string();
        dialog
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            DialogFocus::Cancel => DialogFocus::Confirm,
            DialogFocus::Confirm => DialogFocus::Cancel,
        };
    }

    pub fn handle_key(&mut self, key: KeyCode) -> DialogResult {
        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.next_focus();
                DialogResult::Pending
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                DialogFocus::Cancel => DialogResult::Cancelled,
                DialogFocus::Confirm => DialogResult::Confirmed,
            },
            KeyCode::Char('y') => DialogResult::Confirmed,
            KeyCode::Esc | KeyCode::Char('n') => DialogResult::Cancelled,
            _ => DialogResult::Pending,
        }
    }
}

pub struct ConfirmationDialogWidget<'a> {
    dialog: &'a ConfirmationDialog,
}

impl<'a> ConfirmationDialogWidget<'a> {
    pub fn new(dialog: &'a ConfirmationDialog) -> Self {
        Self { dialog }
    }
}

impl<'a> Widget for ConfirmationDialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = (area.width / 2).max(50).min(area.width.saturating_sub(4));
        let dialog_height = 10.min(area.height.saturating_sub(2));
        let dialog_area = Rect {
            x: area.x + area.width.saturating_sub(dialog_width) / 2,
            y: area.y + area.height.saturating_sub(dialog_height) / 2,
            width: dialog_width,
            height: dialog_height,
        };

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(self.dialog.title.clone())
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(inner);

        let content = vec![
            Line::raw(self.dialog.message.as_str()),
            Line::from(Span::styled(
                self.dialog.subject.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "This action cannot be undone!",
                Style::default().fg(Color::Red),
            )),
        ];
        Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        let focused = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let (cancel_style, confirm_style) = match self.dialog.focus {
            DialogFocus::Cancel => (focused.bg(Color::Blue), Style::default().fg(Color::Red)),
            DialogFocus::Confirm => (Style::default().fg(Color::Gray), focused.bg(Color::Red)),
        };

        let buttons = Line::from(vec![
            Span::styled("[Cancel]", cancel_style),
            Span::raw("   "),
            Span::styled(format!("[{}]", self.dialog.confirm_text), confirm_style),
        ]);
        Paragraph::new(vec![
            buttons,
            Line::from(Span::styled(
                "Tab: Switch • Enter: Select • y/n",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}
