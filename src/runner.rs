use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use tracing::{debug, info, trace};

use crate::activate::CommandActivator;
use crate::config::Config;
use crate::constants::FRAME_INTERVAL;
use crate::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use crate::drivers::{InputDriver, OutputDriver};
use crate::error::ExposeError;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::focus::Navigator;
use crate::keybindings::KeyBindings;
use crate::presenter::Presenter;
use crate::session::{Session, SessionOutcome, SessionStatus};
use crate::snapshot::Snapshot;

/// Drive `session` until it finishes: repaint on every tick and feed bound
/// keys into it. Unbound keys and non-key events are ignored.
///
/// The output driver is expected to be entered already; this never exits it.
pub fn run_session<I, O>(
    session: &mut Session,
    presenter: &mut Presenter,
    bindings: &KeyBindings,
    input: I,
    output: &mut O,
    poll_interval: Duration,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    if let SessionStatus::Finished(_) = session.status() {
        return Ok(());
    }
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.run(|event| {
        match event {
            None => {
                output.draw(|mut frame| presenter.render(&mut frame, &session.frame()))?;
            }
            Some(Event::Key(key)) => {
                let Some(action) = bindings.action_for_key(&key) else {
                    trace!(?key, "unbound key");
                    return Ok(ControlFlow::Continue);
                };
                trace!(%action, "key action");
                if let SessionStatus::Finished(outcome) =
                    session.handle(action.session_input(), Instant::now())
                {
                    debug!(?outcome, "leaving event loop");
                    return Ok(ControlFlow::Quit);
                }
            }
            Some(_) => {}
        }
        Ok(ControlFlow::Continue)
    })
}

/// Full overview run: read the snapshot, show it on the terminal, and
/// activate the chosen window once the terminal has been restored.
pub fn run(config: &Config) -> Result<SessionOutcome, ExposeError> {
    let snapshot = Snapshot::load(&config.state_dir, &config.monitor_file)?;
    // Parse the command before taking over the terminal so a bad template
    // fails fast.
    let activator = CommandActivator::new(&config.activate_command, config.activate_delay)?;
    let mut presenter = match config.thumbnails {
        Some(mode) => Presenter::with_thumbnails(&snapshot, mode),
        None => Presenter::new(),
    };
    let mut session = Session::new(
        snapshot.windows,
        snapshot.canvas,
        &config.engine,
        Navigator::new(config.debounce),
    );

    let mut output = ConsoleOutputDriver::new();
    output.enter()?;
    let result = run_session(
        &mut session,
        &mut presenter,
        &KeyBindings::default(),
        ConsoleInputDriver::new(),
        &mut output,
        FRAME_INTERVAL,
    );
    output.exit()?;
    result?;

    let outcome = session.conclude(activator)?;
    info!(?outcome, "overview closed");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::ui::UiFrame;
    use crate::window::{CanvasGeometry, WindowRecord};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            Ok(self.0.pop_front())
        }
    }

    struct BufferOutput {
        buffer: Buffer,
        draws: usize,
    }

    impl OutputDriver for BufferOutput {
        fn enter(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            self.draws += 1;
            let area = self.buffer.area;
            f(UiFrame::from_parts(area, &mut self.buffer));
            Ok(())
        }
    }

    fn keys(codes: &[KeyCode]) -> Scripted {
        Scripted(
            codes
                .iter()
                .map(|code| Event::Key(KeyEvent::new(*code, KeyModifiers::NONE)))
                .collect(),
        )
    }

    fn session() -> Session {
        Session::new(
            vec![
                WindowRecord::new(1, "one", 800, 600),
                WindowRecord::new(2, "two", 800, 600),
            ],
            CanvasGeometry::new(1920, 1080),
            &LayoutEngine::default(),
            Navigator::default(),
        )
    }

    #[test]
    fn enter_finishes_with_focused_window() {
        let mut session = session();
        let mut output = BufferOutput {
            buffer: Buffer::empty(Rect::new(0, 0, 40, 12)),
            draws: 0,
        };
        run_session(
            &mut session,
            &mut Presenter::new(),
            &KeyBindings::default(),
            keys(&[KeyCode::Char('x'), KeyCode::Enter]),
            &mut output,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(output.draws, 1);
        assert_eq!(
            session.status(),
            SessionStatus::Finished(SessionOutcome::Activated(session.windows()[0].id))
        );
    }

    #[test]
    fn escape_cancels() {
        let mut session = session();
        let mut output = BufferOutput {
            buffer: Buffer::empty(Rect::new(0, 0, 40, 12)),
            draws: 0,
        };
        run_session(
            &mut session,
            &mut Presenter::new(),
            &KeyBindings::default(),
            keys(&[KeyCode::Esc]),
            &mut output,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(
            session.status(),
            SessionStatus::Finished(SessionOutcome::Cancelled)
        );
    }

    #[test]
    fn finished_session_does_not_draw() {
        let mut session = session();
        session.handle(crate::session::SessionInput::Cancel, Instant::now());
        let mut output = BufferOutput {
            buffer: Buffer::empty(Rect::new(0, 0, 10, 4)),
            draws: 0,
        };
        run_session(
            &mut session,
            &mut Presenter::new(),
            &KeyBindings::default(),
            keys(&[]),
            &mut output,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(output.draws, 0);
    }
}
