//! Multi-line input state for the send box.
//!
//! The rendering layer binds its input value to [`Composer::set_text`] and
//! routes Enter presses here: Shift+Enter inserts a literal newline, a bare
//! Enter submits the pending text and clears the box.

/// Pending input of the send box.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending text (input binding).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Handle the Enter key.
    ///
    /// With `shift` held the composer stays in edit mode and gains a literal
    /// newline; otherwise the pending text is handed to the caller for
    /// sending and the box is cleared.
    pub fn key_enter(&mut self, shift: bool) -> Option<String> {
        if shift {
            self.text.push('\n');
            None
        } else {
            Some(std::mem::take(&mut self.text))
        }
    }

    /// Rendered row count, derived from the newline count on every call.
    pub fn row_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Whether the pending text would be rejected by `send`.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_enter_inserts_a_newline_and_keeps_editing() {
        let mut composer = Composer::new();
        composer.set_text("first line");

        assert_eq!(composer.key_enter(true), None);
        assert_eq!(composer.text(), "first line\n");

        composer.set_text(format!("{}second line", composer.text()));
        assert_eq!(composer.row_count(), 2);
    }

    #[test]
    fn bare_enter_submits_and_clears() {
        let mut composer = Composer::new();
        composer.set_text("hello");

        assert_eq!(composer.key_enter(false), Some("hello".to_string()));
        assert_eq!(composer.text(), "");
        assert_eq!(composer.row_count(), 1);
    }

    #[test]
    fn row_count_follows_the_current_text() {
        let mut composer = Composer::new();
        assert_eq!(composer.row_count(), 1);

        composer.set_text("a\nb\nc");
        assert_eq!(composer.row_count(), 3);

        composer.clear();
        assert_eq!(composer.row_count(), 1);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        let mut composer = Composer::new();
        assert!(composer.is_blank());

        composer.set_text("  \n  ");
        assert!(composer.is_blank());

        composer.set_text("  x  ");
        assert!(!composer.is_blank());
    }
}
