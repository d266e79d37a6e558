//! Shared crate-wide constants.

use std::time::Duration;

/// Padding added around every window's packing footprint, as a fraction of
/// its (canvas-clamped) size on each side.
///
/// A cell is `min(natural, canvas) * (1 + 2 * MARGIN_RATIO)`. The padding
/// only influences packing; the rendered thumbnail keeps its natural aspect
/// and is centred inside the cell.
pub const MARGIN_RATIO: f64 = 0.06;

/// Fraction of the canvas' limiting dimension the packed block may occupy
/// after the final scale is applied. The remainder is left as a border.
pub const PACK_RATIO: f64 = 0.8;

/// Convergence tolerance of the strip-width search.
///
/// The geometric bisection stops once `W_max / W_min <= 1 + SEARCH_TOLERANCE`.
/// Larger values converge faster at the cost of a looser aspect match.
pub const SEARCH_TOLERANCE: f64 = 0.2;

/// Minimum time between two accepted focus moves when the compositor did
/// not report a key-repeat delay.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Upper bound accepted for a configured debounce interval.
pub const MAX_DEBOUNCE: Duration = Duration::from_millis(5_000);

/// Delay between tearing down the overview and focusing the chosen window,
/// so the compositor hands focus to the target rather than to our surface.
pub const ACTIVATION_DELAY: Duration = Duration::from_millis(360);

/// Command run to focus the chosen window. `{id}` is replaced by the
/// window's stable id in every argument.
pub const DEFAULT_ACTIVATE_COMMAND: &str = "swaymsg [con_id={id}] focus";

/// Number of candidate spots the radial strategy tries per window before it
/// settles for the least-overlapping one.
pub const RADIAL_ATTEMPTS: usize = 64;

/// Name of the monitor geometry file inside the state directory.
pub const MONITOR_FILE_NAME: &str = "output";

/// Interval at which the presenter repaints when no input arrives.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
