//! Crossterm driver for the selection session.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::debug;

use crate::error::UiError;
use crate::llm::Suggestion;

use super::render::render;
use super::session::{Decision, Key, SelectionSession};

/// Restores the terminal when dropped, including on early returns and panics.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self, UiError> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }
        Ok(Self { stdout })
    }

    fn draw(&mut self, screen: &str) -> Result<(), UiError> {
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        // Raw mode does not translate newlines into carriage returns
        self.stdout.write_all(screen.replace('\n', "\r\n").as_bytes())?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive selector until the user commits or aborts.
pub fn run_selection(suggestions: Vec<Suggestion>) -> Result<Decision, UiError> {
    let mut session = SelectionSession::new(suggestions);
    let mut term = TerminalGuard::enter()?;

    term.draw(&render(&session))?;

    loop {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                let Some(key) = map_key_event(key_event) else {
                    continue;
                };
                session.handle_key(key);
                if let Some(decision) = session.decision() {
                    debug!("Selection finished: {:?}", decision);
                    return Ok(decision.clone());
                }
                term.draw(&render(&session))?;
            }
            Event::Resize(_, _) => term.draw(&render(&session))?,
            _ => {}
        }
    }
}

/// Translate a crossterm key event into a session key.
pub fn map_key_event(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

    let key = match event.code {
        KeyCode::Char('c') if ctrl => Key::Interrupt,
        KeyCode::Char('a') if ctrl => Key::Home,
        KeyCode::Char('e') if ctrl => Key::End,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };

    Some(key)
}
