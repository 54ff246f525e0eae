//! Event handling for the tab strip TUI.
//!
//! Terminal input is read on a dedicated tokio task and delivered to the
//! app loop as a stream of [`Event`]s, interleaved with regular ticks.

pub mod handler;

pub use handler::EventHandler;

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Default tick interval.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Mouse click or wheel
    Mouse(MouseEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Regular tick event for animations
    Tick,
}

impl Event {
    /// Map a raw terminal event. Key releases and focus or paste events
    /// are dropped.
    pub fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    #[test]
    fn releases_are_dropped() {
        let press = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert_eq!(Event::from_terminal(CrosstermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(Event::from_terminal(CrosstermEvent::Key(release)), None);
        assert_eq!(Event::from_terminal(CrosstermEvent::FocusGained), None);
        assert_eq!(
            Event::from_terminal(CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        );
    }
}
