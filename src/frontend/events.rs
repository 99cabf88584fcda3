//! Frontend-agnostic input events.
//!
//! Individual frontends translate their native event streams (crossterm,
//! signals) into this enum so the main loop only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Application quit signal
    Quit,
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a resize event
    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Create a quit event
    pub fn quit() -> Self {
        Self::Quit
    }

    /// `q`, `Esc`, `Ctrl+C` or an explicit quit
    pub fn is_quit(&self) -> bool {
        match self {
            Self::Quit => true,
            Self::Key { code, modifiers } => match code {
                KeyCode::Esc => true,
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    modifiers.is_empty() || *modifiers == KeyModifiers::SHIFT
                }
                KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
                _ => false,
            },
            Self::Resize { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let key_event = FrontendEvent::key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(key_event, FrontendEvent::Key { .. }));

        let resize_event = FrontendEvent::resize(120, 40);
        assert!(matches!(
            resize_event,
            FrontendEvent::Resize {
                width: 120,
                height: 40
            }
        ));

        let quit_event = FrontendEvent::quit();
        assert!(matches!(quit_event, FrontendEvent::Quit));
    }

    #[test]
    fn test_quit_keys() {
        assert!(FrontendEvent::quit().is_quit());
        assert!(FrontendEvent::key(KeyCode::Esc, KeyModifiers::NONE).is_quit());
        assert!(FrontendEvent::key(KeyCode::Char('q'), KeyModifiers::NONE).is_quit());
        assert!(FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::CONTROL).is_quit());

        assert!(!FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::NONE).is_quit());
        assert!(!FrontendEvent::key(KeyCode::Char('q'), KeyModifiers::ALT).is_quit());
        assert!(!FrontendEvent::resize(80, 24).is_quit());
    }
}
