use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use super::keyboard::KeyboardNormalizer;
use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Keyboard input from the controlling terminal, normalised before it
/// reaches the session.
#[derive(Default)]
pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputDriver for ConsoleInputDriver {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(None);
            }
            // Releases and duplicate Esc repeats are swallowed here; keep
            // waiting out the rest of the timeout for a real key.
            if let Some(evt) = self.normalizer.normalize(event::read()?) {
                return Ok(Some(evt));
            }
        }
    }
}

/// Alternate-screen output. The terminal exists only between `enter` and
/// `exit`, so the overview never leaves raw mode behind.
#[derive(Default)]
pub struct ConsoleOutputDriver {
    terminal: Option<DefaultTerminal>,
}

impl ConsoleOutputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_entered(&self) -> bool {
        self.terminal.is_some()
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.terminal.is_some() {
            return Ok(());
        }
        let mut terminal = ratatui::try_init()?;
        terminal.clear()?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        match self.terminal.take() {
            Some(_) => ratatui::try_restore(),
            None => Ok(()),
        }
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        let terminal = self
            .terminal
            .as_mut()
            .ok_or_else(|| io::Error::other("overview drawn before the terminal was entered"))?;
        terminal.draw(move |frame| f(UiFrame::new(frame)))?;
        Ok(())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
