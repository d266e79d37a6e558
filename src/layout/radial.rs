//! Radial placement around the canvas centre.
//!
//! The largest window takes the centre. Every other window walks a spiral of
//! candidate spots (golden-angle offset per window, evenly spaced slots per
//! ring, rings growing outwards while the window shrinks) and takes the first
//! spot that collides with nothing placed so far. When the attempt budget
//! runs out the least-overlapping spot is kept, so the result may overlap.

use std::f64::consts::{PI, TAU};

use tracing::{debug, warn};

use super::{LayoutParams, LayoutResult, Packer, descending};
use crate::window::{CanvasGeometry, Placement, ScreenRect, WindowRecord};

const SLOTS_PER_RING: usize = 8;
const RING_SHRINK: f64 = 0.85;
/// Share of the usable area the windows cover at their starting scale.
const FILL: f64 = 0.45;

#[derive(Debug, Clone, Copy)]
pub struct RadialPacking {
    params: LayoutParams,
}

impl RadialPacking {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    rect: ScreenRect,
    scale: f64,
    overlap: f64,
}

impl Packer for RadialPacking {
    fn layout(&self, windows: &[WindowRecord], canvas: CanvasGeometry) -> LayoutResult {
        if windows.is_empty() {
            return LayoutResult::empty();
        }
        let usable = ScreenRect::new(
            canvas.width as f64 * (1.0 - self.params.pack_ratio) * 0.5,
            canvas.height as f64 * (1.0 - self.params.pack_ratio) * 0.5,
            canvas.width as f64 * self.params.pack_ratio,
            canvas.height as f64 * self.params.pack_ratio,
        );
        let (cx, cy) = usable.center();
        let total_area: f64 = windows.iter().map(|w| w.area() as f64).sum();
        let base_scale = (FILL * usable.area() / total_area).sqrt().min(1.0);

        let mut order: Vec<usize> = (0..windows.len()).collect();
        order.sort_by(|&a, &b| {
            descending(
                (windows[a].area(), windows[a].id.0),
                (windows[b].area(), windows[b].id.0),
            )
        });

        let mut placed: Vec<ScreenRect> = Vec::with_capacity(windows.len());
        let mut placements = vec![
            Placement {
                x: 0.0,
                y: 0.0,
                scale: base_scale,
            };
            windows.len()
        ];
        let mut residual = 0.0;

        for (rank, &idx) in order.iter().enumerate() {
            let window = &windows[idx];
            let fit = fit_scale(window, &usable);
            let best = if rank == 0 {
                let scale = base_scale.min(fit);
                Candidate {
                    rect: centered(window, scale, cx, cy, &usable),
                    scale,
                    overlap: 0.0,
                }
            } else {
                let anchor = placed[0];
                self.spiral_search(window, rank, anchor, fit, base_scale, &usable, &placed)
            };
            if best.overlap > 0.0 {
                residual += best.overlap;
            }
            placed.push(best.rect);
            placements[idx] = Placement {
                x: best.rect.x,
                y: best.rect.y,
                scale: best.scale,
            };
        }

        if residual > 0.0 {
            warn!(
                residual,
                attempts = self.params.radial_attempts,
                "radial packing exhausted its attempts, keeping overlapping placement"
            );
        }
        debug!(windows = windows.len(), base_scale, "radial packing");
        LayoutResult {
            placements,
            packed: None,
        }
    }
}

impl RadialPacking {
    #[allow(clippy::too_many_arguments)]
    fn spiral_search(
        &self,
        window: &WindowRecord,
        rank: usize,
        anchor: ScreenRect,
        fit: f64,
        base_scale: f64,
        usable: &ScreenRect,
        placed: &[ScreenRect],
    ) -> Candidate {
        let (ax, ay) = anchor.center();
        let anchor_radius = anchor.width.hypot(anchor.height) * 0.5;
        let golden = PI * (3.0 - 5.0_f64.sqrt());
        let mut best: Option<Candidate> = None;

        for attempt in 0..self.params.radial_attempts.max(1) {
            let ring = attempt / SLOTS_PER_RING;
            let slot = attempt % SLOTS_PER_RING;
            let scale = (base_scale * RING_SHRINK.powi(ring as i32)).min(fit);
            let own_radius = (window.width as f64).hypot(window.height as f64) * scale * 0.5;
            let radius = (anchor_radius + own_radius) * (1.0 + ring as f64 * 0.5) * 0.75;
            let angle = rank as f64 * golden + slot as f64 * TAU / SLOTS_PER_RING as f64;
            let rect = centered(
                window,
                scale,
                ax + radius * angle.cos(),
                ay + radius * angle.sin(),
                usable,
            );
            let overlap: f64 = placed.iter().map(|p| p.intersection_area(&rect)).sum();
            let candidate = Candidate {
                rect,
                scale,
                overlap,
            };
            if overlap == 0.0 {
                return candidate;
            }
            if best.is_none_or(|b| overlap < b.overlap) {
                best = Some(candidate);
            }
        }
        best.unwrap_or(Candidate {
            rect: centered(window, fit.min(base_scale), ax, ay, usable),
            scale: fit.min(base_scale),
            overlap: f64::INFINITY,
        })
    }
}

/// Largest scale at which the window still fits the usable region.
fn fit_scale(window: &WindowRecord, usable: &ScreenRect) -> f64 {
    (usable.width / window.width as f64).min(usable.height / window.height as f64)
}

/// Rectangle of `window` at `scale` centred on `(cx, cy)`, pushed back
/// inside `usable`.
fn centered(window: &WindowRecord, scale: f64, cx: f64, cy: f64, usable: &ScreenRect) -> ScreenRect {
    let w = window.width as f64 * scale;
    let h = window.height as f64 * scale;
    let x = (cx - w * 0.5).clamp(usable.x, (usable.right() - w).max(usable.x));
    let y = (cy - h * 0.5).clamp(usable.y, (usable.bottom() - h).max(usable.y));
    ScreenRect::new(x, y, w, h)
}
