use crate::app::{Action, KeyContext};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Handles terminal events and maps them to application `Action`s.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self { tick_rate: Duration::from_millis(250) }
    }

    /// Blocks until a key event is received or the tick interval elapses.
    pub fn next(&self, context: KeyContext) -> Result<Action> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key, context));
                }
            }
        }
        Ok(Action::Tick)
    }
}

/// Maps a `KeyEvent` to an `Action` under the given key map.
pub fn map_key(key: KeyEvent, context: KeyContext) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    match context {
        KeyContext::TextInput => match key.code {
            KeyCode::Enter => Action::CommitInput,
            KeyCode::Esc => Action::CancelInput,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(ch) => Action::InputChar(ch),
            _ => Action::Tick,
        },
        KeyContext::ConfirmClear => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::ConfirmClear,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::CancelClear,
            _ => Action::Tick,
        },
        KeyContext::Normal => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab | KeyCode::BackTab => Action::CycleTab,
            KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
            KeyCode::Up | KeyCode::Char('k') => Action::SelectPrev,
            KeyCode::Enter => Action::Activate,
            KeyCode::Right | KeyCode::Char(' ') => Action::CycleValue { forward: true },
            KeyCode::Left => Action::CycleValue { forward: false },
            KeyCode::Char('s') => Action::Submit,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('c') => Action::RequestClearHistory,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Esc => Action::Dismiss,
            _ => Action::Tick,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_are_text_while_typing() {
        assert_eq!(map_key(press(KeyCode::Char('q')), KeyContext::Normal), Action::Quit);
        assert_eq!(
            map_key(press(KeyCode::Char('q')), KeyContext::TextInput),
            Action::InputChar('q')
        );
        assert_eq!(map_key(press(KeyCode::Enter), KeyContext::TextInput), Action::CommitInput);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for context in [KeyContext::Normal, KeyContext::TextInput, KeyContext::ConfirmClear] {
            assert_eq!(map_key(key, context), Action::Quit);
        }
    }

    #[test]
    fn confirmation_only_accepts_yes_or_no() {
        assert_eq!(map_key(press(KeyCode::Char('y')), KeyContext::ConfirmClear), Action::ConfirmClear);
        assert_eq!(map_key(press(KeyCode::Esc), KeyContext::ConfirmClear), Action::CancelClear);
        assert_eq!(map_key(press(KeyCode::Char('s')), KeyContext::ConfirmClear), Action::Tick);
    }
}
