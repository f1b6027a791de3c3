use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Glyph shown in place of each grapheme of a secret field
const MASK_GLYPH: char = '•';

/// Single-line text input with grapheme-aware cursor movement
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    /// The actual text content
    content: String,
    /// Cursor position as byte index in the content string
    cursor_position: usize,
    /// Render as mask glyphs instead of the text
    secret: bool,
}

impl InputBuffer {
    /// Create a new empty input buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// An input whose content is never drawn, e.g. a token field
    pub fn secret() -> Self {
        Self {
            secret: true,
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Current cursor position (byte index)
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Length in graphemes, not bytes
    pub fn len(&self) -> usize {
        self.content.graphemes(true).count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }

    /// Replace the content and put the cursor at the end
    pub fn set_content(&mut self, content: &str) {
        self.content = single_line(content);
        self.cursor_position = self.content.len();
    }

    /// Insert a character at the cursor. Line breaks are ignored.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.content.insert(self.cursor_position, ch);
        self.cursor_position += ch.len_utf8();
    }

    /// Insert pasted text at the cursor, dropping line breaks
    pub fn insert_str(&mut self, s: &str) {
        let text = single_line(s);
        self.content.insert_str(self.cursor_position, &text);
        self.cursor_position += text.len();
    }

    /// Delete the grapheme at the cursor (Delete key behavior)
    pub fn delete_char(&mut self) -> bool {
        let end = match self.next_boundary() {
            Some(end) => end,
            None => return false,
        };
        self.content.drain(self.cursor_position..end);
        true
    }

    /// Delete the grapheme before the cursor (Backspace key behavior)
    pub fn backspace(&mut self) -> bool {
        let start = match self.previous_boundary() {
            Some(start) => start,
            None => return false,
        };
        self.content.drain(start..self.cursor_position);
        self.cursor_position = start;
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.previous_boundary() {
            Some(start) => {
                self.cursor_position = start;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.next_boundary() {
            Some(end) => {
                self.cursor_position = end;
                true
            }
            None => false,
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor_position = self.content.len();
    }

    /// Text to draw: the content, or one mask glyph per grapheme for secrets
    pub fn display_text(&self) -> String {
        if self.secret {
            std::iter::repeat(MASK_GLYPH).take(self.len()).collect()
        } else {
            self.content.clone()
        }
    }

    /// Cursor position as a display column, accounting for wide characters
    pub fn cursor_display_column(&self) -> u16 {
        let before = &self.content[..self.cursor_position];
        if self.secret {
            before.graphemes(true).count() as u16
        } else {
            before.width() as u16
        }
    }

    fn previous_boundary(&self) -> Option<usize> {
        if self.cursor_position == 0 {
            return None;
        }
        self.content
            .grapheme_indices(true)
            .map(|(idx, _)| idx)
            .take_while(|idx| *idx < self.cursor_position)
            .last()
    }

    fn next_boundary(&self) -> Option<usize> {
        if self.cursor_position >= self.content.len() {
            return None;
        }
        self.content
            .grapheme_indices(true)
            .find(|(idx, _)| *idx >= self.cursor_position)
            .map(|(idx, grapheme)| idx + grapheme.len())
    }
}

fn single_line(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = InputBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.cursor_position(), 0);
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("Hello");

        assert!(buffer.backspace());
        assert_eq!(buffer.content(), "Hell");
        assert_eq!(buffer.cursor_position(), 4);

        buffer.move_to_start();
        assert!(!buffer.backspace());
        assert!(buffer.delete_char());
        assert_eq!(buffer.content(), "ell");
    }

    #[test]
    fn test_cursor_movement() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("Hello");

        assert!(buffer.move_left());
        assert_eq!(buffer.cursor_position(), 4);

        buffer.move_to_start();
        assert!(!buffer.move_left());

        buffer.move_to_end();
        assert_eq!(buffer.cursor_position(), 5);
        assert!(!buffer.move_right());
    }

    #[test]
    fn test_unicode_handling() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("🦀rust");

        // The crab is 4 bytes but 1 grapheme
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.cursor_position(), 8);

        buffer.move_left();
        buffer.insert_char('!');
        assert_eq!(buffer.content(), "🦀rus!t");

        buffer.move_to_start();
        assert!(buffer.delete_char());
        assert_eq!(buffer.content(), "rus!t");
    }

    #[test]
    fn test_line_breaks_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("abc\r\n123\n");
        buffer.insert_char('\n');
        assert_eq!(buffer.content(), "abc123");

        buffer.set_content("x\ny");
        assert_eq!(buffer.content(), "xy");
        assert_eq!(buffer.cursor_position(), 2);
    }

    #[test]
    fn test_secret_display() {
        let mut buffer = InputBuffer::secret();
        buffer.insert_str("abc123");
        buffer.move_left();

        assert_eq!(buffer.display_text(), "••••••");
        assert_eq!(buffer.cursor_display_column(), 5);
        assert_eq!(buffer.content(), "abc123");
    }
}
