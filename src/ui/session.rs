//! Selection session state machine.
//!
//! The session owns the suggestions, the highlighted row and the edit buffer.
//! It consumes abstract [`Key`]s so it can be driven by the terminal or by
//! tests without touching a TTY.

use crate::llm::Suggestion;

/// Keyboard input the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    /// Ctrl+C.
    Interrupt,
    Char(char),
}

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Select,
    Edit,
}

/// Final outcome of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Commit { message: String, body: String },
    Cancelled,
}

impl Decision {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Decision::Cancelled)
    }

    /// Subject line, empty when cancelled.
    pub fn message(&self) -> &str {
        match self {
            Decision::Commit { message, .. } => message,
            Decision::Cancelled => "",
        }
    }

    /// Body of the chosen suggestion, empty when cancelled or absent.
    pub fn body(&self) -> &str {
        match self {
            Decision::Commit { body, .. } => body,
            Decision::Cancelled => "",
        }
    }

    /// Message and body joined the way `git commit -m` expects.
    ///
    /// The body is separated by a blank line and omitted when blank.
    pub fn full_message(&self) -> String {
        crate::commit::full_message(self.message(), self.body())
    }
}

/// Interactive selection over a ranked list of suggestions.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    suggestions: Vec<Suggestion>,
    cursor: usize,
    mode: Mode,
    edit_buffer: String,
    /// Byte offset into `edit_buffer`, always on a char boundary.
    edit_cursor: usize,
    decision: Option<Decision>,
}

impl SelectionSession {
    /// Start a session in select mode with the first suggestion highlighted.
    ///
    /// # Panics
    ///
    /// Panics if `suggestions` is empty. Callers must check first.
    pub fn new(suggestions: Vec<Suggestion>) -> Self {
        assert!(
            !suggestions.is_empty(),
            "selection session needs at least one suggestion"
        );

        Self {
            suggestions,
            cursor: 0,
            mode: Mode::Select,
            edit_buffer: String::new(),
            edit_cursor: 0,
            decision: None,
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn edit_cursor(&self) -> usize {
        self.edit_cursor
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.decision.is_some()
    }

    /// Consume the session, returning its decision if one was reached.
    pub fn into_decision(self) -> Option<Decision> {
        self.decision
    }

    /// Apply one key press. Keys after a decision are ignored.
    pub fn handle_key(&mut self, key: Key) {
        if self.is_done() {
            return;
        }

        match self.mode {
            Mode::Select => self.handle_select(key),
            Mode::Edit => self.handle_edit(key),
        }
    }

    fn handle_select(&mut self, key: Key) {
        match key {
            Key::Up | Key::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.suggestions.len() {
                    self.cursor += 1;
                }
            }
            Key::Char(digit @ '1'..='3') => {
                let idx = digit as usize - '1' as usize;
                if idx < self.suggestions.len() {
                    self.cursor = idx;
                }
            }
            Key::Char('e') => {
                self.edit_buffer = self.suggestions[self.cursor].message.clone();
                self.edit_cursor = self.edit_buffer.len();
                self.mode = Mode::Edit;
            }
            Key::Enter => {
                let chosen = &self.suggestions[self.cursor];
                self.decision = Some(Decision::Commit {
                    message: chosen.message.clone(),
                    body: chosen.body.clone(),
                });
            }
            Key::Char('q') | Key::Esc | Key::Interrupt => {
                self.decision = Some(Decision::Cancelled);
            }
            _ => {}
        }
    }

    fn handle_edit(&mut self, key: Key) {
        match key {
            Key::Enter => {
                let message = self.edit_buffer.trim();
                if message.is_empty() {
                    return;
                }
                self.decision = Some(Decision::Commit {
                    message: message.to_string(),
                    body: self.suggestions[self.cursor].body.clone(),
                });
            }
            Key::Esc => {
                self.mode = Mode::Select;
                self.edit_buffer.clear();
                self.edit_cursor = 0;
            }
            Key::Interrupt => {
                self.decision = Some(Decision::Cancelled);
            }
            Key::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.edit_buffer.remove(prev);
                    self.edit_cursor = prev;
                }
            }
            Key::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.edit_cursor = prev;
                }
            }
            Key::Right => {
                if let Some(ch) = self.edit_buffer[self.edit_cursor..].chars().next() {
                    self.edit_cursor += ch.len_utf8();
                }
            }
            Key::Home => self.edit_cursor = 0,
            Key::End => self.edit_cursor = self.edit_buffer.len(),
            Key::Char(ch) => {
                self.edit_buffer.insert(self.edit_cursor, ch);
                self.edit_cursor += ch.len_utf8();
            }
            Key::Up | Key::Down => {}
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.edit_buffer[..self.edit_cursor]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }
}
