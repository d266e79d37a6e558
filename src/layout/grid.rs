//! Grid packing: `ceil(sqrt(n))` columns, every window fitted into its own
//! cell and a short last row centred.

use tracing::debug;

use super::{LayoutParams, LayoutResult, Packer};
use crate::window::{CanvasGeometry, Placement, WindowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return Self {
                columns: 0,
                rows: 0,
            };
        }
        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        Self { columns, rows }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridPacking {
    params: LayoutParams,
}

impl GridPacking {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

impl Packer for GridPacking {
    fn layout(&self, windows: &[WindowRecord], canvas: CanvasGeometry) -> LayoutResult {
        if windows.is_empty() {
            return LayoutResult::empty();
        }
        let shape = GridShape::for_count(windows.len());
        let usable_w = canvas.width as f64 * self.params.pack_ratio;
        let usable_h = canvas.height as f64 * self.params.pack_ratio;
        let origin_x = (canvas.width as f64 - usable_w) * 0.5;
        let origin_y = (canvas.height as f64 - usable_h) * 0.5;
        let cell_w = usable_w / shape.columns as f64;
        let cell_h = usable_h / shape.rows as f64;
        let padding = 1.0 + 2.0 * self.params.margin_ratio;

        let last_row = shape.rows - 1;
        let last_row_len = windows.len() - last_row * shape.columns;

        let placements = windows
            .iter()
            .enumerate()
            .map(|(idx, window)| {
                let row = idx / shape.columns;
                let col = idx % shape.columns;
                let row_offset = if row == last_row {
                    (shape.columns - last_row_len) as f64 * cell_w * 0.5
                } else {
                    0.0
                };
                let scale = (cell_w / padding / window.width as f64)
                    .min(cell_h / padding / window.height as f64);
                let w = window.width as f64 * scale;
                let h = window.height as f64 * scale;
                Placement {
                    x: origin_x + row_offset + col as f64 * cell_w + (cell_w - w) * 0.5,
                    y: origin_y + row as f64 * cell_h + (cell_h - h) * 0.5,
                    scale,
                }
            })
            .collect();

        debug!(
            columns = shape.columns,
            rows = shape.rows,
            cell_w,
            cell_h,
            "grid packing"
        );
        LayoutResult {
            placements,
            packed: None,
        }
    }
}
