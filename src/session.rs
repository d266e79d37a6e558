//! One overview session: a fixed window set, its layout (computed once) and
//! the focus state that key presses move around.
//!
//! The session is an explicit value owned by the runner; nothing here is
//! global. It ends either through [`SessionInput::Activate`] or
//! [`SessionInput::Cancel`], after which [`Session::conclude`] consumes it and
//! hands the focused window to the [`Activator`] at most once.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ActivationError;
use crate::focus::{Direction, FocusState, Navigator};
use crate::layout::{LayoutEngine, LayoutResult, packing_order};
use crate::window::{CanvasGeometry, Placement, ScreenRect, WindowId, WindowRecord};

/// External collaborator that focuses a window in the compositor.
pub trait Activator {
    fn activate(&mut self, id: WindowId) -> Result<(), ActivationError>;
}

impl<T: Activator + ?Sized> Activator for &mut T {
    fn activate(&mut self, id: WindowId) -> Result<(), ActivationError> {
        (**self).activate(id)
    }
}

/// Decoded input the presenter forwards to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Navigate(Direction),
    Activate,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Activated(WindowId),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(SessionOutcome),
}

/// What the presenter needs to paint one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem<'a> {
    pub id: WindowId,
    pub title: &'a str,
    pub placement: Placement,
    pub rect: ScreenRect,
}

/// Everything the presenter needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView<'a> {
    pub canvas: CanvasGeometry,
    pub items: Vec<DrawItem<'a>>,
    pub focused: Option<usize>,
    pub ring_visible: bool,
}

#[derive(Debug)]
pub struct Session {
    canvas: CanvasGeometry,
    windows: Vec<WindowRecord>,
    layout: LayoutResult,
    rects: Vec<ScreenRect>,
    navigator: Navigator,
    focus: FocusState,
    outcome: Option<SessionOutcome>,
}

impl Session {
    /// Puts the windows in packing order (tallest cell first, then widest,
    /// then highest id), lays them out once and focuses the first one.
    ///
    /// Directional ties are broken in this order too, since
    /// [`nearest_in_direction`](crate::focus::nearest_in_direction) keeps the
    /// first of equally distant candidates.
    pub fn new(
        windows: Vec<WindowRecord>,
        canvas: CanvasGeometry,
        engine: &LayoutEngine,
        navigator: Navigator,
    ) -> Self {
        let order = packing_order(&windows, canvas, engine.params().margin_ratio);
        let mut slots: Vec<Option<WindowRecord>> = windows.into_iter().map(Some).collect();
        let windows: Vec<WindowRecord> = order.iter().filter_map(|&i| slots[i].take()).collect();
        let layout = engine.layout(&windows, canvas);
        let rects = layout.rects(&windows);
        info!(windows = windows.len(), strategy = ?engine.strategy(), "session started");
        Self {
            canvas,
            windows,
            layout,
            rects,
            navigator,
            focus: FocusState::new(0),
            outcome: None,
        }
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn rects(&self) -> &[ScreenRect] {
        &self.rects
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn focused_window(&self) -> Option<&WindowRecord> {
        self.windows.get(self.focus.focused_index())
    }

    pub fn status(&self) -> SessionStatus {
        match self.outcome {
            Some(outcome) => SessionStatus::Finished(outcome),
            None => SessionStatus::Running,
        }
    }

    /// Feeds one input into the session. Input after the session finished is
    /// ignored.
    pub fn handle(&mut self, input: SessionInput, now: Instant) -> SessionStatus {
        if self.outcome.is_some() {
            return self.status();
        }
        match input {
            SessionInput::Navigate(direction) => {
                self.focus = self
                    .navigator
                    .navigate(self.focus, &self.rects, direction, now);
            }
            SessionInput::Activate => {
                let outcome = match self.focused_window() {
                    Some(window) => SessionOutcome::Activated(window.id),
                    None => {
                        warn!("activation requested with no windows");
                        SessionOutcome::Cancelled
                    }
                };
                debug!(?outcome, "session finished");
                self.outcome = Some(outcome);
            }
            SessionInput::Cancel => {
                debug!("session cancelled");
                self.outcome = Some(SessionOutcome::Cancelled);
            }
        }
        self.status()
    }

    pub fn frame(&self) -> FrameView<'_> {
        let items = self
            .windows
            .iter()
            .zip(&self.layout.placements)
            .zip(&self.rects)
            .map(|((window, placement), rect)| DrawItem {
                id: window.id,
                title: &window.title,
                placement: *placement,
                rect: *rect,
            })
            .collect();
        FrameView {
            canvas: self.canvas,
            items,
            focused: (!self.windows.is_empty()).then_some(self.focus.focused_index()),
            ring_visible: self.focus.ring_visible(),
        }
    }

    /// Ends the session. Calls `activator` exactly once if the session was
    /// finished through activation, never otherwise. A session that is still
    /// running is treated as cancelled.
    pub fn conclude<A: Activator>(self, mut activator: A) -> Result<SessionOutcome, ActivationError> {
        let outcome = self.outcome.unwrap_or(SessionOutcome::Cancelled);
        if let SessionOutcome::Activated(id) = outcome {
            info!(%id, "activating window");
            activator.activate(id)?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutParams, LayoutStrategy};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<WindowId>,
    }

    impl Activator for Recorder {
        fn activate(&mut self, id: WindowId) -> Result<(), ActivationError> {
            self.calls.push(id);
            Ok(())
        }
    }

    fn session(windows: Vec<WindowRecord>) -> Session {
        Session::new(
            windows,
            CanvasGeometry::new(1920, 1080),
            &LayoutEngine::new(LayoutStrategy::Strip, LayoutParams::default()),
            Navigator::default(),
        )
    }

    #[test]
    fn activation_emits_exactly_one_call_with_focused_id() {
        let mut s = session(vec![WindowRecord::new(42, "answer", 800, 600)]);
        let status = s.handle(SessionInput::Activate, Instant::now());
        assert_eq!(status, SessionStatus::Finished(SessionOutcome::Activated(WindowId(42))));
        // Further input is ignored once finished.
        s.handle(SessionInput::Activate, Instant::now());
        let mut rec = Recorder::default();
        let outcome = s.conclude(&mut rec).unwrap();
        assert_eq!(outcome, SessionOutcome::Activated(WindowId(42)));
        assert_eq!(rec.calls, vec![WindowId(42)]);
    }

    #[test]
    fn cancel_emits_no_call() {
        let mut s = session(vec![WindowRecord::new(42, "answer", 800, 600)]);
        s.handle(SessionInput::Cancel, Instant::now());
        s.handle(SessionInput::Activate, Instant::now());
        let mut rec = Recorder::default();
        assert_eq!(s.conclude(&mut rec).unwrap(), SessionOutcome::Cancelled);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn empty_session_renders_nothing_and_never_activates() {
        let mut s = session(Vec::new());
        let frame = s.frame();
        assert!(frame.items.is_empty());
        assert_eq!(frame.focused, None);
        s.handle(SessionInput::Navigate(Direction::Left), Instant::now());
        s.handle(SessionInput::Activate, Instant::now());
        let mut rec = Recorder::default();
        assert_eq!(s.conclude(&mut rec).unwrap(), SessionOutcome::Cancelled);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn frame_reports_ring_after_first_direction() {
        let mut s = session(vec![
            WindowRecord::new(1, "a", 800, 600),
            WindowRecord::new(2, "b", 800, 600),
        ]);
        assert!(!s.frame().ring_visible);
        s.handle(SessionInput::Navigate(Direction::Right), Instant::now());
        let frame = s.frame();
        assert!(frame.ring_visible);
        assert_eq!(frame.focused, Some(0));
        assert_eq!(frame.items.len(), 2);
        // Equal sizes: the higher id comes first.
        assert_eq!(frame.items[0].title, "b");
        assert_eq!(frame.items[1].title, "a");
    }

    #[test]
    fn initial_focus_is_first_in_packing_order() {
        let s = session(vec![
            WindowRecord::new(1, "small", 400, 300),
            WindowRecord::new(2, "large", 1600, 900),
        ]);
        assert_eq!(s.focused_window().map(|w| w.id), Some(WindowId(2)));
        let ids: Vec<WindowId> = s.windows().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![WindowId(2), WindowId(1)]);
        assert_eq!(s.frame().items[0].id, WindowId(2));
    }

    #[test]
    fn navigation_candidates_follow_packing_order() {
        // Equal cells sort by descending id, so 9 precedes 4 wherever
        // nearest_in_direction breaks a distance tie.
        let s = session(vec![
            WindowRecord::new(4, "left", 600, 400),
            WindowRecord::new(9, "right", 600, 400),
            WindowRecord::new(1, "top", 1200, 500),
        ]);
        let ids: Vec<WindowId> = s.windows().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![WindowId(1), WindowId(9), WindowId(4)]);
        assert_eq!(s.rects().len(), 3);
        assert_eq!(s.focused_window().map(|w| w.id), Some(WindowId(1)));
    }
}
