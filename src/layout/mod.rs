//! Layout engine: assigns a position and a scale to every window so that the
//! whole set fits the canvas.
//!
//! Three strategies solve the same contract with different trade-offs:
//!
//! - [`StripPacking`] searches a strip width whose NFDH packing matches the
//!   canvas aspect ratio. Overlap-free.
//! - [`GridPacking`] puts every window in its own cell of a near-square grid.
//!   Overlap-free, but wastes space when sizes vary widely.
//! - [`RadialPacking`] spirals windows around the canvas centre with bounded
//!   collision retries. May leave residual overlap.
//!
//! Every strategy is deterministic for a given input order and terminates in
//! bounded time. Placements are always reported in input order.

pub mod grid;
pub mod radial;
pub mod strip;

pub use grid::GridPacking;
pub use radial::RadialPacking;
pub use strip::{PackedBlock, StripPacking, packing_order};

use clap::ValueEnum;
use tracing::debug;

use crate::constants::{MARGIN_RATIO, PACK_RATIO, RADIAL_ATTEMPTS, SEARCH_TOLERANCE};
use crate::window::{CanvasGeometry, Placement, ScreenRect, WindowRecord};

/// Tunables shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub margin_ratio: f64,
    pub pack_ratio: f64,
    pub tolerance: f64,
    pub radial_attempts: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            margin_ratio: MARGIN_RATIO,
            pack_ratio: PACK_RATIO,
            tolerance: SEARCH_TOLERANCE,
            radial_attempts: RADIAL_ATTEMPTS,
        }
    }
}

/// Output of a layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    /// One placement per input window, in input order.
    pub placements: Vec<Placement>,
    /// Packed block before it was scaled onto the canvas. Only the strip
    /// strategy produces one.
    pub packed: Option<PackedBlock>,
}

impl LayoutResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Scaled, positioned rectangles in input order.
    pub fn rects(&self, windows: &[WindowRecord]) -> Vec<ScreenRect> {
        debug_assert_eq!(windows.len(), self.placements.len());
        self.placements
            .iter()
            .zip(windows)
            .map(|(placement, window)| placement.rect(window))
            .collect()
    }

    /// Sum of pairwise intersection areas. Zero for overlap-free layouts.
    pub fn overlap_area(&self, windows: &[WindowRecord]) -> f64 {
        let rects = self.rects(windows);
        let mut total = 0.0;
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                total += a.intersection_area(b);
            }
        }
        total
    }
}

/// A packing algorithm behind the common layout contract.
pub trait Packer {
    fn layout(&self, windows: &[WindowRecord], canvas: CanvasGeometry) -> LayoutResult;
}

/// Strategy selector exposed through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LayoutStrategy {
    /// Aspect-matching NFDH strip packing.
    #[default]
    Strip,
    /// Near-square grid.
    Grid,
    /// Radial placement with collision retries.
    Radial,
}

impl LayoutStrategy {
    pub fn packer(self, params: LayoutParams) -> Box<dyn Packer> {
        match self {
            LayoutStrategy::Strip => Box::new(StripPacking::new(params)),
            LayoutStrategy::Grid => Box::new(GridPacking::new(params)),
            LayoutStrategy::Radial => Box::new(RadialPacking::new(params)),
        }
    }
}

/// Runs the configured strategy. Callers never pick an algorithm directly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutEngine {
    strategy: LayoutStrategy,
    params: LayoutParams,
}

impl LayoutEngine {
    pub fn new(strategy: LayoutStrategy, params: LayoutParams) -> Self {
        Self { strategy, params }
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn params(&self) -> LayoutParams {
        self.params
    }

    pub fn layout(&self, windows: &[WindowRecord], canvas: CanvasGeometry) -> LayoutResult {
        if windows.is_empty() {
            debug!("layout: no windows, empty result");
            return LayoutResult::empty();
        }
        let result = self.strategy.packer(self.params).layout(windows, canvas);
        debug!(
            strategy = ?self.strategy,
            windows = windows.len(),
            canvas_w = canvas.width,
            canvas_h = canvas.height,
            "layout computed"
        );
        result
    }
}

/// Ordering shared by the strategies that sort: larger first, larger id
/// breaks the final tie.
pub(crate) fn descending<K: Ord>(a: (K, u64), b: (K, u64)) -> std::cmp::Ordering {
    b.0.cmp(&a.0).then(b.1.cmp(&a.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<WindowRecord> {
        vec![
            WindowRecord::new(3, "editor", 1200, 800),
            WindowRecord::new(7, "browser", 1600, 1000),
            WindowRecord::new(9, "term", 640, 480),
            WindowRecord::new(12, "chat", 400, 900),
        ]
    }

    #[test]
    fn empty_input_yields_empty_result_for_every_strategy() {
        let canvas = CanvasGeometry::new(1920, 1080);
        for strategy in [
            LayoutStrategy::Strip,
            LayoutStrategy::Grid,
            LayoutStrategy::Radial,
        ] {
            let engine = LayoutEngine::new(strategy, LayoutParams::default());
            let result = engine.layout(&[], canvas);
            assert!(result.is_empty());
            assert!(result.packed.is_none());
        }
    }

    #[test]
    fn every_strategy_places_every_window_inside_the_canvas() {
        let canvas = CanvasGeometry::new(1920, 1080);
        let windows = sample();
        for strategy in [
            LayoutStrategy::Strip,
            LayoutStrategy::Grid,
            LayoutStrategy::Radial,
        ] {
            let engine = LayoutEngine::new(strategy, LayoutParams::default());
            let result = engine.layout(&windows, canvas);
            assert_eq!(result.len(), windows.len(), "{strategy:?}");
            for rect in result.rects(&windows) {
                assert!(rect.width > 0.0 && rect.height > 0.0);
                assert!(rect.x >= -1e-6, "{strategy:?} {rect:?}");
                assert!(rect.y >= -1e-6, "{strategy:?} {rect:?}");
                assert!(rect.right() <= canvas.width as f64 + 1e-6, "{strategy:?} {rect:?}");
                assert!(rect.bottom() <= canvas.height as f64 + 1e-6, "{strategy:?} {rect:?}");
            }
        }
    }

    #[test]
    fn overlap_free_strategies_report_zero_overlap() {
        let canvas = CanvasGeometry::new(1920, 1080);
        let windows = sample();
        for strategy in [LayoutStrategy::Strip, LayoutStrategy::Grid] {
            let result = LayoutEngine::new(strategy, LayoutParams::default()).layout(&windows, canvas);
            assert!(result.overlap_area(&windows) < 1e-6, "{strategy:?}");
        }
    }

    #[test]
    fn descending_breaks_ties_by_larger_id() {
        use std::cmp::Ordering;
        assert_eq!(descending((5u32, 1), (5u32, 2)), Ordering::Greater);
        assert_eq!(descending((6u32, 1), (5u32, 2)), Ordering::Less);
    }
}
