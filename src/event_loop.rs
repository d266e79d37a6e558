use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Serial event pump of the overview.
///
/// Key events and repaint ticks are delivered one at a time on the calling
/// thread, so the session never sees two inputs at once. The handler is
/// called with:
/// - `Some(event)` for every input event, draining bursts before the next
///   repaint so held keys do not queue up behind frames.
/// - `None` once per poll interval, which is where the presenter repaints.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            let mut timeout = self.poll_interval;
            while let Some(event) = self.driver.next_event(timeout)? {
                if let ControlFlow::Quit = handler(Some(event))? {
                    return Ok(());
                }
                timeout = Duration::ZERO;
            }
        }
        Ok(())
    }
}
