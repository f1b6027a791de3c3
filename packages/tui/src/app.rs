use crate::controller::{Completion, ViewController};
use crate::events::{AppEvent, EventHandler};
use crate::state::{AppState, Field, Tab};
use crate::ui;
use crate::ui::widgets::{ConfirmationDialog, DialogResult};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use modview_auth::{FileTokenStore, Session};
use modview_client::{AdminClient, ApiClient, ModerationClient};
use modview_config::Settings;
use modview_core::Action;
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

const TICK_RATE_MS: u64 = 250;

/// Main TUI application struct
pub struct App {
    pub state: AppState,
    pub controller: ViewController,
    completions: Option<UnboundedReceiver<Completion>>,
    pub should_quit: bool,
}

impl App {
    /// Wire the HTTP clients and the on-disk credential store from settings
    pub fn new(settings: &Settings) -> Self {
        let session = Session::open(FileTokenStore::new(&settings.credentials_path));
        let api = ApiClient::new(settings.api_url.clone());
        let (sender, receiver) = mpsc::unbounded_channel();
        let controller = ViewController::new(
            session,
            Arc::new(ModerationClient::new(api.clone())),
            Arc::new(AdminClient::new(api)),
            sender,
        );
        Self::with_controller(controller, receiver)
    }

    pub fn with_controller(
        controller: ViewController,
        completions: UnboundedReceiver<Completion>,
    ) -> Self {
        Self {
            state: AppState::new(),
            controller,
            completions: Some(completions),
            should_quit: false,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut completions = self
            .completions
            .take()
            .context("Application is already running")?;
        let mut events = EventHandler::new(TICK_RATE_MS);
        info!("Terminal UI started");

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &self.state, &self.controller))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(AppEvent::Key(key)) => self.handle_key(key),
                    Some(AppEvent::Resize(..)) | Some(AppEvent::Tick) => {}
                    None => self.quit(),
                },
                Some(completion) = completions.recv() => self.apply(completion),
            }
        }

        self.completions = Some(completions);
        info!("Terminal UI stopped");
        Ok(())
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Hand a finished request to the controller and re-sync the view
    pub fn apply(&mut self, completion: Completion) {
        self.controller.apply(completion);
        self.sync();
    }

    fn sync(&mut self) {
        self.state.normalize_focus(self.controller.admin_visible());
        self.state.clamp_selection(self.controller.tokens().len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.quit();
            return;
        }

        if self.state.is_showing_confirmation_dialog() {
            self.handle_dialog_key(key.code);
            return;
        }

        let admin_visible = self.controller.admin_visible();
        match key.code {
            KeyCode::F(1) => self.state.switch_tab(Tab::Moderate),
            KeyCode::F(2) => self.state.switch_tab(Tab::Admin),
            KeyCode::Tab => self.state.focus_next(admin_visible),
            KeyCode::BackTab => self.state.focus_previous(admin_visible),
            _ => match self.state.focus() {
                Field::UserToken | Field::ImagePath | Field::AdminToken => {
                    self.handle_input_key(key.code)
                }
                Field::CreateToken => self.handle_create_key(key.code),
                Field::TokenList => self.handle_list_key(key.code),
            },
        }
        self.sync();
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        if code == KeyCode::Enter {
            self.submit_focused();
            return;
        }

        let Some(input) = self.state.focused_input_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => input.insert_char(c),
            KeyCode::Backspace => {
                input.backspace();
            }
            KeyCode::Delete => {
                input.delete_char();
            }
            KeyCode::Left => {
                input.move_left();
            }
            KeyCode::Right => {
                input.move_right();
            }
            KeyCode::Home => input.move_to_start(),
            KeyCode::End => input.move_to_end(),
            KeyCode::Esc => input.clear(),
            _ => {}
        }
    }

    /// Enter on a text field runs that field's action
    fn submit_focused(&mut self) {
        match self.state.focus() {
            Field::UserToken => {
                let raw = self.state.user_token_input.content().to_string();
                if self.controller.submit_user_token(&raw).is_ok() {
                    self.state.user_token_input.clear();
                }
            }
            Field::ImagePath => {
                // Unreadable files are reported next to the field
                if let Ok(upload) = self.state.load_image() {
                    let _ = self.controller.trigger_moderation(upload);
                }
            }
            Field::AdminToken => {
                let raw = self.state.admin_token_input.content().to_string();
                if self.controller.trigger_authenticate(&raw).is_ok() {
                    self.state.admin_token_input.clear();
                }
            }
            Field::CreateToken | Field::TokenList => {}
        }
    }

    fn handle_create_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') | KeyCode::Char('a') => self.state.toggle_create_scope(),
            KeyCode::Enter => {
                let _ = self.controller.trigger_create_token(self.state.create_as_admin);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.controller.tokens().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select_next_token(len);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.select_previous_token(len);
            }
            KeyCode::Char('r') => {
                let _ = self.controller.trigger_load_tokens();
            }
            KeyCode::Char('d') | KeyCode::Delete => self.open_delete_dialog(),
            _ => {}
        }
    }

    fn open_delete_dialog(&mut self) {
        if self.controller.is_busy(Action::DeleteToken) {
            return;
        }
        let target = self
            .state
            .selected_token()
            .and_then(|index| self.controller.tokens().get(index))
            .map(|record| record.token.clone());

        if let Some(target) = target {
            debug!("Asking for confirmation before deleting a token");
            self.state.confirmation_dialog = Some(ConfirmationDialog::delete_token(&target));
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        let Some(dialog) = self.state.confirmation_dialog.as_mut() else {
            return;
        };

        match dialog.handle_key(code) {
            DialogResult::Pending => {}
            DialogResult::Cancelled => {
                debug!("Token deletion cancelled");
                self.state.confirmation_dialog = None;
            }
            DialogResult::Confirmed => {
                let target = dialog.subject.clone();
                self.state.confirmation_dialog = None;
                let _ = self.controller.trigger_delete_token(&target, true);
            }
        }
    }
}
