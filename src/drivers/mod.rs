pub mod console;
pub mod keyboard;

use ::crossterm::event::Event;
use std::io;
use std::time::Duration;

use crate::ui::UiFrame;

/// Source of already-normalised input events.
pub trait InputDriver {
    /// Waits up to `timeout` for the next event. `Ok(None)` means the
    /// timeout elapsed with nothing to deliver.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        (**self).next_event(timeout)
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}

impl<T: OutputDriver + ?Sized> OutputDriver for &mut T {
    fn enter(&mut self) -> io::Result<()> {
        (**self).enter()
    }

    fn exit(&mut self) -> io::Result<()> {
        (**self).exit()
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        (**self).draw(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct OneKey(Option<KeyCode>);
    impl InputDriver for OneKey {
        fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            Ok(self
                .0
                .take()
                .map(|code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE))))
        }
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        let mut d = OneKey(Some(KeyCode::Left));
        let mut r = &mut d;
        let ev = <&mut OneKey as InputDriver>::next_event(&mut r, Duration::ZERO).unwrap();
        assert!(matches!(ev, Some(Event::Key(k)) if k.code == KeyCode::Left));
        assert!(r.next_event(Duration::ZERO).unwrap().is_none());
    }
}
