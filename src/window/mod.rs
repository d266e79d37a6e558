//! Window records and the geometry types shared by the layout engine, the
//! focus navigator and the presenter.

use std::fmt;

/// Stable external identifier of a window (the compositor's container id).
///
/// Only used for the final activation call and as the last packing
/// tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Size of the output the overview covers, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
}

impl CanvasGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "canvas must have positive size");
        Self { width, height }
    }

    /// Target aspect ratio of the packing, `height / width`.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

/// Packing footprint of a window: natural size clamped to the canvas and
/// padded by the margin ratio on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

/// One window of the session. Immutable once the snapshot is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowRecord {
    pub fn new(id: u64, title: impl Into<String>, width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "window must have positive size");
        Self {
            id: WindowId(id),
            title: title.into(),
            width,
            height,
        }
    }

    pub fn cell_size(&self, canvas: CanvasGeometry, margin_ratio: f64) -> CellSize {
        let pad = |natural: u32, limit: u32| {
            let clamped = natural.min(limit) as f64;
            (clamped * (1.0 + 2.0 * margin_ratio)) as u32
        };
        CellSize {
            width: pad(self.width, canvas.width),
            height: pad(self.height, canvas.height),
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Final placement of a window: top-left anchor in canvas pixels plus the
/// scale applied to its natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Placement {
    pub fn rect(&self, window: &WindowRecord) -> ScreenRect {
        ScreenRect {
            x: self.x,
            y: self.y,
            width: window.width as f64 * self.scale,
            height: window.height as f64 * self.scale,
        }
    }
}

/// Axis-aligned rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Open-interval overlap of the horizontal projections.
    pub fn overlaps_horizontally(&self, other: &ScreenRect) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// Open-interval overlap of the vertical projections.
    pub fn overlaps_vertically(&self, other: &ScreenRect) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn intersection_area(&self, other: &ScreenRect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_size_clamps_then_pads() {
        let canvas = CanvasGeometry::new(1000, 500);
        let w = WindowRecord::new(1, "big", 2000, 400);
        let cell = w.cell_size(canvas, 0.25);
        assert_eq!(cell, CellSize { width: 1500, height: 600 });
    }

    #[test]
    fn cell_size_without_margin_is_clamped_natural() {
        let canvas = CanvasGeometry::new(800, 600);
        let w = WindowRecord::new(1, "t", 300, 900);
        assert_eq!(w.cell_size(canvas, 0.0), CellSize { width: 300, height: 600 });
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = ScreenRect::new(0.0, 0.0, 100.0, 100.0);
        let b = ScreenRect::new(100.0, 0.0, 100.0, 100.0);
        assert!(!a.overlaps_horizontally(&b));
        assert!(a.overlaps_vertically(&b));
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn intersection_area_of_offset_squares() {
        let a = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        let b = ScreenRect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&b), 25.0);
    }
}
