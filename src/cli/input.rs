//! Keystroke input handling using crossterm
//!
//! Features:
//! - Non-blocking keystroke capture
//! - Per-screen key mapping
//! - Ctrl+C graceful exit

use crate::session::{PitchResult, PitchType, Screen};
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result as IoResult;
use std::time::Duration;

/// What a keystroke means on the current screen
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Quit,
    /// Text entry (session name, note)
    Type(char),
    Erase,
    Submit,
    Back,
    Up,
    Down,
    EditName,
    OpenHistory,
    ClearAll,
    Confirm,
    PickType(PitchType),
    PickResult(PitchResult),
    Hit(bool),
    EditNote,
    Undo,
    End,
    CopySummary,
    ExportCsv,
    Save,
    Delete,
}

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for poll operations (milliseconds)
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler with default timeout (50ms for responsive input)
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::from_millis(50),
        }
    }

    /// Enable raw mode for terminal input
    pub fn enable_raw_mode() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()
    }

    /// Disable raw mode and restore terminal
    pub fn disable_raw_mode() -> IoResult<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// Poll for keystroke with timeout (non-blocking)
    /// Returns Some(KeyEvent) if key pressed, None if timeout
    pub fn read_key(&self) -> IoResult<Option<KeyEvent>> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                event::Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Ctrl+C always exits
    pub fn is_exit(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL))
    }

    /// Plain character without Ctrl/Alt
    pub fn key_to_char(key: &KeyEvent) -> Option<char> {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Map a key to a command; `text_entry` routes characters to `Type`
    pub fn command(screen: Screen, text_entry: bool, key: &KeyEvent) -> Option<Command> {
        if Self::is_exit(key) {
            return Some(Command::Quit);
        }

        match key.code {
            KeyCode::Enter => return Some(Command::Submit),
            KeyCode::Esc => return Some(Command::Back),
            KeyCode::Backspace if text_entry => return Some(Command::Erase),
            KeyCode::Up => return Some(Command::Up),
            KeyCode::Down => return Some(Command::Down),
            _ => {}
        }

        let c = Self::key_to_char(key)?;
        if text_entry {
            return Some(Command::Type(c));
        }

        match (screen, c) {
            (_, 'q') => Some(Command::Quit),
            (Screen::Setup, 'n') => Some(Command::EditName),
            (Screen::Setup, 'h') => Some(Command::OpenHistory),
            (Screen::Setup, 'X') => Some(Command::ClearAll),
            (Screen::Setup, 'y') => Some(Command::Confirm),
            (Screen::Logging, '1'..='6') => {
                let idx = c as usize - '1' as usize;
                Some(Command::PickType(PitchType::KNOWN[idx].clone()))
            }
            (Screen::Logging, 's') => Some(Command::PickResult(PitchResult::Strike)),
            (Screen::Logging, 'b') => Some(Command::PickResult(PitchResult::Ball)),
            (Screen::Logging, 'y') => Some(Command::Hit(true)),
            (Screen::Logging, 'n') => Some(Command::Hit(false)),
            (Screen::Logging, '/') => Some(Command::EditNote),
            (Screen::Logging, 'u') => Some(Command::Undo),
            (Screen::Logging, 'e') => Some(Command::End),
            (Screen::Report, 'c') => Some(Command::CopySummary),
            (Screen::Report, 'x') => Some(Command::ExportCsv),
            (Screen::Report, 'w') => Some(Command::Save),
            (Screen::History, 'd') => Some(Command::Delete),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_logging_keys() {
        assert_eq!(
            InputHandler::command(Screen::Logging, false, &key('1')),
            Some(Command::PickType(PitchType::Fastball))
        );
        assert_eq!(
            InputHandler::command(Screen::Logging, false, &key('6')),
            Some(Command::PickType(PitchType::Curve))
        );
        assert_eq!(
            InputHandler::command(Screen::Logging, false, &key('s')),
            Some(Command::PickResult(PitchResult::Strike))
        );
        assert_eq!(InputHandler::command(Screen::Logging, false, &key('7')), None);
    }

    #[test]
    fn test_text_entry_swallows_letters() {
        assert_eq!(
            InputHandler::command(Screen::Setup, true, &key('q')),
            Some(Command::Type('q'))
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            InputHandler::command(Screen::Setup, true, &ctrl_c),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_keys_are_screen_scoped() {
        assert_eq!(InputHandler::command(Screen::Setup, false, &key('u')), None);
        assert_eq!(
            InputHandler::command(Screen::Report, false, &key('w')),
            Some(Command::Save)
        );
    }
}
