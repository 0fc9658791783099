//! Non-blocking keyboard polling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use crate::utils::CTRL_C;

/// Zero-timeout access to pending keyboard input
pub trait KeyPoll {
    /// Whether input is queued; never blocks
    fn pending(&mut self) -> io::Result<bool>;

    /// One queued key, or `None` without blocking when nothing is queued.
    /// Queued non-character events are consumed and also yield `None`.
    fn read_one(&mut self) -> io::Result<Option<char>>;
}

/// [`KeyPoll`] over crossterm's event queue on stdin
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeyPoll for CrosstermKeys {
    fn pending(&mut self) -> io::Result<bool> {
        event::poll(Duration::ZERO)
    }

    fn read_one(&mut self) -> io::Result<Option<char>> {
        if !self.pending()? {
            return Ok(None);
        }
        Ok(key_char(event::read()?))
    }
}

/// Character carried by a key press. Raw mode swallows the terminal's
/// interrupt character, so Ctrl+C is handed back as the byte it would be.
fn key_char(event: Event) -> Option<char> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => {
            if modifiers.contains(KeyModifiers::CONTROL) && c.eq_ignore_ascii_case(&'c') {
                Some(CTRL_C)
            } else {
                Some(c)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, modifiers, kind))
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(key_char(key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Press)), Some('q'));
        assert_eq!(key_char(key(KeyCode::Char('Q'), KeyModifiers::SHIFT, KeyEventKind::Press)), Some('Q'));
    }

    #[test]
    fn test_ctrl_c_becomes_etx() {
        assert_eq!(
            key_char(key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press)),
            Some('\u{3}')
        );
    }

    #[test]
    fn test_non_character_events_are_ignored() {
        assert_eq!(key_char(key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press)), None);
        assert_eq!(key_char(key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release)), None);
        assert_eq!(key_char(Event::Resize(80, 24)), None);
        assert_eq!(key_char(Event::FocusGained), None);
    }
}
