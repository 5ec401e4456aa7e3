//! Input accumulator - line buffer, focus and submit detection.
//!
//! Consumes key events one at a time:
//! - Printable characters are appended to the [`InputBuffer`]
//! - Backspace removes the last character
//! - Enter produces [`InputAction::Submit`] carrying the whole line
//! - Ctrl+C (always) and Ctrl+D (on an empty line) request quit
//!
//! Editing only happens while the [`FocusState`] is focused. Quit chords are
//! honoured regardless of focus so a blurred session can still be left.

use super::parser::{KeyCode, KeyEvent, Modifier};

// =============================================================================
// InputBuffer
// =============================================================================

/// The not-yet-submitted command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove the last character. Returns it, or `None` when empty.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
}

// =============================================================================
// FocusState
// =============================================================================

/// Whether the buffer accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    focused: bool,
}

impl FocusState {
    pub fn focused() -> Self {
        Self { focused: true }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl Default for FocusState {
    fn default() -> Self {
        Self::focused()
    }
}

// =============================================================================
// Accumulator
// =============================================================================

/// What a single key event did to the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// The buffer changed.
    Edited,
    /// A line terminator arrived; carries the buffer contents at that point.
    Submit(String),
    /// The user asked to leave the shell.
    Quit,
    /// Nothing happened (unfocused, non-printable, or a no-op edit).
    Ignored,
}

/// Accumulates keystrokes into a line.
#[derive(Debug, Default)]
pub struct Accumulator {
    buffer: InputBuffer,
    focus: FocusState,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusState {
        &mut self.focus
    }

    /// Empty the buffer. Called by the dispatcher after every submit.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Handle one key event.
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        if key.is_ctrl('c') {
            return InputAction::Quit;
        }
        if key.is_ctrl('d') && self.buffer.is_empty() {
            return InputAction::Quit;
        }

        if !self.focus.is_focused() {
            return InputAction::Ignored;
        }

        match key.code {
            KeyCode::Char(ch) => {
                if key.modifiers.intersects(Modifier::CTRL | Modifier::ALT) || ch.is_control() {
                    return InputAction::Ignored;
                }
                self.buffer.push(ch);
                InputAction::Edited
            }
            KeyCode::Backspace => match self.buffer.pop() {
                Some(_) => InputAction::Edited,
                None => InputAction::Ignored,
            },
            KeyCode::Enter => InputAction::Submit(self.buffer.as_str().to_string()),
            _ => InputAction::Ignored,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
