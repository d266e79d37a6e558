//! Directional focus navigation over a packed layout.
//!
//! [`nearest_in_direction`] is the pure geometric search. [`Navigator`] wraps
//! it in the session's state machine: the first directional press only arms
//! the focus ring, requests arriving while a move is in flight are dropped,
//! and moves closer together than the debounce interval are dropped too.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::constants::DEFAULT_DEBOUNCE;
use crate::window::ScreenRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Reentrancy guard of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    #[default]
    Idle,
    Navigating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    focused: usize,
    ring_visible: bool,
    phase: NavPhase,
    last_transition: Option<Instant>,
}

impl FocusState {
    pub fn new(focused: usize) -> Self {
        Self {
            focused,
            ..Self::default()
        }
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn ring_visible(&self) -> bool {
        self.ring_visible
    }

    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    pub fn last_transition(&self) -> Option<Instant> {
        self.last_transition
    }
}

/// Why a navigation request did not move the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    NoWindows,
    Reentrant,
    Debounced,
}

/// Index of the window closest to `from` in `direction`, if any qualifies.
///
/// For up/down a candidate must overlap `from` horizontally and have its
/// centre strictly above/below; left/right is the transposed test. The
/// nearest centre wins, ties keep the first candidate in window order.
pub fn nearest_in_direction(
    rects: &[ScreenRect],
    from: usize,
    direction: Direction,
) -> Option<usize> {
    let origin = rects.get(from)?;
    let (ox, oy) = origin.center();
    let mut best: Option<(usize, f64)> = None;

    for (i, rect) in rects.iter().enumerate() {
        if i == from {
            continue;
        }
        let (cx, cy) = rect.center();
        let qualifies = match direction {
            Direction::Up => rect.overlaps_horizontally(origin) && cy < oy,
            Direction::Down => rect.overlaps_horizontally(origin) && cy > oy,
            Direction::Left => rect.overlaps_vertically(origin) && cx < ox,
            Direction::Right => rect.overlaps_vertically(origin) && cx > ox,
        };
        if !qualifies {
            continue;
        }
        let dist = (cx - ox).powi(2) + (cy - oy).powi(2);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Debounced, reentrancy-guarded focus transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    debounce: Duration,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Navigator {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Applies one directional request and returns the next state.
    pub fn navigate(
        &self,
        state: FocusState,
        rects: &[ScreenRect],
        direction: Direction,
        now: Instant,
    ) -> FocusState {
        match self.try_navigate(state, rects, direction, now) {
            Ok(next) => next,
            Err(reason) => {
                trace!(?reason, %direction, "navigation request dropped");
                state
            }
        }
    }

    /// Like [`Navigator::navigate`] but reports why a request was dropped.
    pub fn try_navigate(
        &self,
        mut state: FocusState,
        rects: &[ScreenRect],
        direction: Direction,
        now: Instant,
    ) -> Result<FocusState, Dropped> {
        if rects.is_empty() {
            return Err(Dropped::NoWindows);
        }
        if !state.ring_visible {
            state.ring_visible = true;
            debug!("focus ring armed");
            return Ok(state);
        }
        if state.phase == NavPhase::Navigating {
            return Err(Dropped::Reentrant);
        }
        if let Some(last) = state.last_transition
            && now.saturating_duration_since(last) < self.debounce
        {
            return Err(Dropped::Debounced);
        }

        state.phase = NavPhase::Navigating;
        if let Some(next) = nearest_in_direction(rects, state.focused, direction)
            && next != state.focused
        {
            debug!(from = state.focused, to = next, %direction, "focus moved");
            state.focused = next;
        }
        state.last_transition = Some(now);
        state.phase = NavPhase::Idle;
        Ok(state)
    }
}
