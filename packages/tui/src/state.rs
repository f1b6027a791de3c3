use crate::input::InputBuffer;
use crate::ui::widgets::ConfirmationDialog;
use modview_client::ImageUpload;
use std::io;
use tracing::debug;

/// Top-level views. Switching between them never issues a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Moderate,
    Admin,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Moderate, Tab::Admin];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Moderate => "Moderate",
            Tab::Admin => "Admin",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Moderate => 0,
            Tab::Admin => 1,
        }
    }

    /// Focusable fields in display order. Admin controls beyond the token
    /// field only exist while an admin credential is held.
    pub fn fields(self, admin_visible: bool) -> Vec<Field> {
        match self {
            Tab::Moderate => vec![Field::UserToken, Field::ImagePath],
            Tab::Admin if admin_visible => {
                vec![Field::AdminToken, Field::CreateToken, Field::TokenList]
            }
            Tab::Admin => vec![Field::AdminToken],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserToken,
    ImagePath,
    AdminToken,
    CreateToken,
    TokenList,
}

/// Presentation state: inputs, focus, selection and the open dialog.
/// Request lifecycles live in the controller.
#[derive(Debug)]
pub struct AppState {
    pub current_tab: Tab,
    focus: Field,
    pub user_token_input: InputBuffer,
    pub image_path_input: InputBuffer,
    pub admin_token_input: InputBuffer,
    /// Scope flag for the next created token
    pub create_as_admin: bool,
    selected_token: Option<usize>,
    pub confirmation_dialog: Option<ConfirmationDialog>,
    /// Image read from the path field, shown as a preview
    pub image: Option<ImageUpload>,
    pub image_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            current_tab: Tab::Moderate,
            focus: Field::UserToken,
            user_token_input: InputBuffer::secret(),
            image_path_input: InputBuffer::new(),
            admin_token_input: InputBuffer::secret(),
            create_as_admin: false,
            selected_token: None,
            confirmation_dialog: None,
            image: None,
            image_error: None,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            debug!("Switching to {} tab", tab.title());
            self.current_tab = tab;
            self.focus = tab.fields(false)[0];
        }
    }

    pub fn next_tab(&mut self) {
        let next = match self.current_tab {
            Tab::Moderate => Tab::Admin,
            Tab::Admin => Tab::Moderate,
        };
        self.switch_tab(next);
    }

    pub fn focus_next(&mut self, admin_visible: bool) {
        self.step_focus(admin_visible, 1);
    }

    pub fn focus_previous(&mut self, admin_visible: bool) {
        let len = self.current_tab.fields(admin_visible).len();
        self.step_focus(admin_visible, len.saturating_sub(1));
    }

    fn step_focus(&mut self, admin_visible: bool, offset: usize) {
        let fields = self.current_tab.fields(admin_visible);
        let position = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(position + offset) % fields.len()];
    }

    /// Move focus off fields that disappeared, e.g. after admin auth failed
    pub fn normalize_focus(&mut self, admin_visible: bool) {
        let fields = self.current_tab.fields(admin_visible);
        if !fields.contains(&self.focus) {
            self.focus = fields[0];
        }
        if !admin_visible {
            self.confirmation_dialog = None;
        }
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut InputBuffer> {
        match self.focus {
            Field::UserToken => Some(&mut self.user_token_input),
            Field::ImagePath => Some(&mut self.image_path_input),
            Field::AdminToken => Some(&mut self.admin_token_input),
            Field::CreateToken | Field::TokenList => None,
        }
    }

    pub fn toggle_create_scope(&mut self) {
        self.create_as_admin = !self.create_as_admin;
    }

    pub fn selected_token(&self) -> Option<usize> {
        self.selected_token
    }

    pub fn select_next_token(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.selected_token = Some(match self.selected_token {
            Some(index) if index + 1 < len => index + 1,
            _ => 0,
        });
        true
    }

    pub fn select_previous_token(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.selected_token = Some(match self.selected_token {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        });
        true
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_token = match self.selected_token {
            _ if len == 0 => None,
            Some(index) if index >= len => Some(len - 1),
            other => other,
        };
    }

    /// Read the image named in the path field.
    ///
    /// A blank path yields `Ok(None)`; an unreadable one records the error
    /// for display.
    pub fn load_image(&mut self) -> io::Result<Option<ImageUpload>> {
        self.image_error = None;
        let path = self.image_path_input.content().trim().to_string();
        if path.is_empty() {
            self.image = None;
            return Ok(None);
        }

        match ImageUpload::from_path(&path) {
            Ok(upload) => {
                self.image = Some(upload.clone());
                Ok(Some(upload))
            }
            Err(e) => {
                self.image = None;
                self.image_error = Some(format!("Could not read {}: {}", path, e));
                Err(e)
            }
        }
    }

    pub fn is_showing_confirmation_dialog(&self) -> bool {
        self.confirmation_dialog.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tab_switch_resets_focus() {
        let mut state = AppState::new();
        state.focus_next(false);
        assert_eq!(state.focus(), Field::ImagePath);

        state.next_tab();
        assert_eq!(state.current_tab, Tab::Admin);
        assert_eq!(state.focus(), Field::AdminToken);

        state.switch_tab(Tab::Admin);
        assert_eq!(state.focus(), Field::AdminToken);
    }

    #[test]
    fn test_admin_fields_follow_visibility() {
        let mut state = AppState::new();
        state.switch_tab(Tab::Admin);

        state.focus_next(false);
        assert_eq!(state.focus(), Field::AdminToken);

        state.focus_next(true);
        assert_eq!(state.focus(), Field::CreateToken);
        state.focus_next(true);
        assert_eq!(state.focus(), Field::TokenList);
        state.focus_previous(true);
        assert_eq!(state.focus(), Field::CreateToken);

        state.confirmation_dialog = Some(ConfirmationDialog::delete_token("abc"));
        state.normalize_focus(false);
        assert_eq!(state.focus(), Field::AdminToken);
        assert!(!state.is_showing_confirmation_dialog());
    }

    #[test]
    fn test_token_selection_wraps_and_clamps() {
        let mut state = AppState::new();
        assert!(!state.select_next_token(0));
        assert_eq!(state.selected_token(), None);

        state.select_next_token(3);
        assert_eq!(state.selected_token(), Some(0));
        state.select_previous_token(3);
        assert_eq!(state.selected_token(), Some(2));
        state.select_next_token(3);
        assert_eq!(state.selected_token(), Some(0));

        state.select_previous_token(3);
        state.clamp_selection(2);
        assert_eq!(state.selected_token(), Some(1));
        state.clamp_selection(0);
        assert_eq!(state.selected_token(), None);
    }

    #[test]
    fn test_load_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cat.png");
        std::fs::write(&path, b"png").unwrap();

        let mut state = AppState::new();
        assert!(state.load_image().unwrap().is_none());

        state.image_path_input.set_content(&path.to_string_lossy());
        let upload = state.load_image().unwrap().unwrap();
        assert_eq!(upload.file_name, "cat.png");
        assert!(state.image.is_some());

        state
            .image_path_input
            .set_content(&temp_dir.path().join("missing.png").to_string_lossy());
        assert!(state.load_image().is_err());
        assert!(state.image.is_none());
        assert!(state.image_error.as_deref().unwrap().starts_with("Could not read"));
    }
}
