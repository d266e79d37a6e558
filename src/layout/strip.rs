//! Aspect-matching strip packing.
//!
//! Windows are sorted by decreasing cell height and packed with Next-Fit
//! Decreasing Height into a strip whose width is searched so that the packed
//! block has the canvas' aspect ratio. The block is then centred row by row,
//! scaled onto the canvas and flipped vertically: the first packed row ends
//! up nearest the bottom edge of the screen.

use std::ops::Range;

use tracing::{debug, trace};

use super::{LayoutParams, LayoutResult, Packer, descending};
use crate::window::{CanvasGeometry, CellSize, Placement, WindowRecord};

/// Width and height of the packed block in cell space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedBlock {
    pub width: f64,
    pub height: f64,
}

/// A window as seen by the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    /// Position of the window in the caller's input.
    pub index: usize,
    pub id: u64,
    pub natural_width: u32,
    pub natural_height: u32,
    pub cell: CellSize,
}

/// Result of one NFDH pass at a fixed strip width.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfPacking {
    /// Top-left corner of every cell, aligned with the packed items.
    pub origins: Vec<(f64, f64)>,
    /// Item ranges sharing a shelf, top to bottom.
    pub rows: Vec<Range<usize>>,
    pub height: f64,
}

/// Outcome of the strip-width search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripSearch {
    pub block: PackedBlock,
    /// Number of bisection steps taken; zero when a bound was accepted as is.
    pub iterations: u32,
    /// Final `(W_min, W_max)` bracket the width was chosen from.
    pub bracket: (f64, f64),
}

/// Builds packing items and sorts them by `(cell_height, cell_width, id)`,
/// all descending.
pub fn sort_for_packing(
    windows: &[WindowRecord],
    canvas: CanvasGeometry,
    margin_ratio: f64,
) -> Vec<PackItem> {
    let mut items: Vec<PackItem> = windows
        .iter()
        .enumerate()
        .map(|(index, w)| PackItem {
            index,
            id: w.id.0,
            natural_width: w.width,
            natural_height: w.height,
            cell: w.cell_size(canvas, margin_ratio),
        })
        .collect();
    items.sort_by(|a, b| {
        descending(
            ((a.cell.height, a.cell.width), a.id),
            ((b.cell.height, b.cell.width), b.id),
        )
    });
    items
}

/// Input indices in packing order: the order [`sort_for_packing`] puts the
/// windows in.
pub fn packing_order(
    windows: &[WindowRecord],
    canvas: CanvasGeometry,
    margin_ratio: f64,
) -> Vec<usize> {
    sort_for_packing(windows, canvas, margin_ratio)
        .into_iter()
        .map(|item| item.index)
        .collect()
}

/// Next-Fit Decreasing Height at `strip_width`.
///
/// Items are placed left to right; a new shelf starts only when the next
/// cell would cross the strip edge. A cell wider than the strip still gets a
/// shelf of its own.
pub fn nfdh(items: &[PackItem], strip_width: f64) -> ShelfPacking {
    let mut origins = Vec::with_capacity(items.len());
    let mut rows = Vec::new();
    let (mut x, mut y, mut shelf_height) = (0.0_f64, 0.0_f64, 0.0_f64);
    let mut shelf_start = 0;

    for (i, item) in items.iter().enumerate() {
        let w = item.cell.width as f64;
        let h = item.cell.height as f64;
        if x > 0.0 && x + w > strip_width {
            rows.push(shelf_start..i);
            shelf_start = i;
            x = 0.0;
            y += shelf_height;
            shelf_height = 0.0;
        }
        origins.push((x, y));
        x += w;
        shelf_height = shelf_height.max(h);
    }
    if !items.is_empty() {
        rows.push(shelf_start..items.len());
    }

    ShelfPacking {
        origins,
        rows,
        height: y + shelf_height,
    }
}

/// Searches a strip width whose packing has aspect `target` (height over
/// width).
///
/// The bracket starts at `[max(natural_width), sum(natural_width)]`. Either
/// bound is returned directly if it already satisfies the target from its
/// side; otherwise the bracket is bisected geometrically until
/// `W_max / W_min <= 1 + tolerance`, and the bound whose ratio lies closer to
/// the target wins. The geometric mean of two distinct positive bounds lies
/// strictly between them, so the bracket shrinks on every step.
pub fn search_strip_width(items: &[PackItem], target: f64, tolerance: f64) -> StripSearch {
    debug_assert!(tolerance > 0.0);
    let mut w_min = items
        .iter()
        .map(|it| it.natural_width as f64)
        .fold(0.0, f64::max);
    let mut w_max: f64 = items.iter().map(|it| it.natural_width as f64).sum();

    let h_min = nfdh(items, w_min).height;
    let mut ratio_high = h_min / w_min;
    if ratio_high <= target {
        return StripSearch {
            block: PackedBlock {
                width: w_min,
                height: h_min,
            },
            iterations: 0,
            bracket: (w_min, w_max),
        };
    }

    let h_max = nfdh(items, w_max).height;
    let mut ratio_low = h_max / w_max;
    if ratio_low >= target {
        return StripSearch {
            block: PackedBlock {
                width: w_max,
                height: h_max,
            },
            iterations: 0,
            bracket: (w_min, w_max),
        };
    }

    let mut iterations = 0;
    while w_max / w_min > 1.0 + tolerance {
        let width = (w_min * w_max).sqrt();
        let ratio = nfdh(items, width).height / width;
        trace!(width, ratio, target, "strip search step");
        if ratio > target {
            ratio_high = ratio;
            w_min = width;
        } else {
            ratio_low = ratio;
            w_max = width;
        }
        iterations += 1;
    }

    let width = if ratio_high - target < target - ratio_low {
        w_min
    } else {
        w_max
    };
    StripSearch {
        block: PackedBlock {
            width,
            height: nfdh(items, width).height,
        },
        iterations,
        bracket: (w_min, w_max),
    }
}

/// Centres every shelf horizontally within the block width and every cell
/// vertically within its shelf.
pub fn center_rows(items: &[PackItem], packing: &mut ShelfPacking, block_width: f64) {
    for row in &packing.rows {
        let mut used = 0.0_f64;
        let mut band = 0.0_f64;
        for i in row.clone() {
            used = used.max(packing.origins[i].0 + items[i].cell.width as f64);
            band = band.max(items[i].cell.height as f64);
        }
        let shift = (block_width - used) * 0.5;
        for i in row.clone() {
            let (x, y) = packing.origins[i];
            packing.origins[i] = (x + shift, y + (band - items[i].cell.height as f64) * 0.5);
        }
    }
}

/// Scale that fits the block inside `pack_ratio` of the canvas along its
/// limiting dimension.
pub fn block_scale(block: PackedBlock, canvas: CanvasGeometry, pack_ratio: f64) -> f64 {
    let width_ratio = block.width / canvas.width as f64;
    let height_ratio = block.height / canvas.height as f64;
    if width_ratio > height_ratio {
        canvas.width as f64 * pack_ratio / block.width
    } else {
        canvas.height as f64 * pack_ratio / block.height
    }
}

/// NFDH strip packing behind the [`Packer`] contract.
#[derive(Debug, Clone, Copy)]
pub struct StripPacking {
    params: LayoutParams,
}

impl StripPacking {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

impl Packer for StripPacking {
    fn layout(&self, windows: &[WindowRecord], canvas: CanvasGeometry) -> LayoutResult {
        if windows.is_empty() {
            return LayoutResult::empty();
        }
        let items = sort_for_packing(windows, canvas, self.params.margin_ratio);
        let search = search_strip_width(&items, canvas.aspect(), self.params.tolerance);
        let block = search.block;
        let mut packing = nfdh(&items, block.width);
        center_rows(&items, &mut packing, block.width);

        let scale = block_scale(block, canvas, self.params.pack_ratio);
        let canvas_w = canvas.width as f64;
        let canvas_h = canvas.height as f64;
        let left = (canvas_w - block.width * scale) * 0.5;
        // Bottom edge of the scaled block; cell-space y grows upwards from it.
        let bottom = canvas_h - (canvas_h - block.height * scale) * 0.5;

        let mut placements = vec![
            Placement {
                x: 0.0,
                y: 0.0,
                scale,
            };
            windows.len()
        ];
        for (item, &(cx, cy)) in items.iter().zip(&packing.origins) {
            let cell_w = item.cell.width as f64;
            let cell_h = item.cell.height as f64;
            let content_left = cx + (cell_w - item.natural_width as f64) * 0.5;
            let content_bottom = cy + cell_h - (cell_h - item.natural_height as f64) * 0.5;
            placements[item.index] = Placement {
                x: left + content_left * scale,
                y: bottom - content_bottom * scale,
                scale,
            };
        }

        debug!(
            block_w = block.width,
            block_h = block.height,
            rows = packing.rows.len(),
            iterations = search.iterations,
            scale,
            "strip packing"
        );
        LayoutResult {
            placements,
            packed: Some(block),
        }
    }
}
