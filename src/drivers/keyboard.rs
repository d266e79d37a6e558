// `KeyboardNormalizer` filters raw terminal key events before they reach the
// key bindings. It is not a driver on its own; queueing and polling live in
// `console.rs`.

use crossterm::event::{Event, KeyCode, KeyEventKind};

#[derive(Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops key releases. Repeats are kept so that a held arrow key keeps
    /// requesting moves; the navigator's debounce paces them. On Windows a
    /// held Esc reports a press per repeat, only the first one is kept.
    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    if key.code == KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return None;
                }
                if cfg!(windows) && key.code == KeyCode::Esc {
                    if self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
