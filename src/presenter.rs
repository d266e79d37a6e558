//! Terminal rendering of a session frame.
//!
//! The monitor canvas is mapped linearly onto the terminal area. Each window
//! becomes a bordered block with its title on the bottom edge and, when a
//! screenshot was captured, a thumbnail inside. The focused window gets a
//! thick accent border while the focus ring is visible.

use std::collections::HashMap;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tracing::{debug, trace};

use crate::components::{RenderMode, ThumbnailComponent};
use crate::session::{DrawItem, FrameView};
use crate::snapshot::Snapshot;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{CanvasGeometry, ScreenRect, WindowId};

const EMPTY_MESSAGE: &str = "No windows";

/// Map a rectangle in canvas pixels onto terminal cells inside `area`.
///
/// Edges are rounded independently so neighbouring windows keep their gap;
/// the result is at least one cell in each direction and never leaves `area`.
pub fn canvas_to_cells(rect: &ScreenRect, canvas: CanvasGeometry, area: Rect) -> Rect {
    if canvas.width == 0 || canvas.height == 0 || area.width == 0 || area.height == 0 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let sx = area.width as f64 / canvas.width as f64;
    let sy = area.height as f64 / canvas.height as f64;
    let to_col = |v: f64| (v * sx).round().clamp(0.0, area.width as f64) as u16;
    let to_row = |v: f64| (v * sy).round().clamp(0.0, area.height as f64) as u16;

    let x0 = to_col(rect.x).min(area.width - 1);
    let y0 = to_row(rect.y).min(area.height - 1);
    let x1 = to_col(rect.right()).max(x0 + 1);
    let y1 = to_row(rect.bottom()).max(y0 + 1);
    Rect::new(area.x + x0, area.y + y0, x1 - x0, y1 - y0)
}

#[derive(Default)]
pub struct Presenter {
    thumbnails: HashMap<WindowId, ThumbnailComponent>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every screenshot the snapshot directory holds. Missing or
    /// undecodable images leave that window without a thumbnail.
    pub fn with_thumbnails(snapshot: &Snapshot, mode: RenderMode) -> Self {
        let mut presenter = Self::new();
        for window in &snapshot.windows {
            let path = snapshot.screenshot_path(window.id);
            if !path.is_file() {
                trace!(id = %window.id, "no screenshot");
                continue;
            }
            match ThumbnailComponent::from_png(&path) {
                Ok(mut thumbnail) => {
                    thumbnail.set_render_mode(mode);
                    presenter.insert_thumbnail(window.id, thumbnail);
                }
                Err(err) => debug!(id = %window.id, %err, "screenshot skipped"),
            }
        }
        debug!(loaded = presenter.thumbnails.len(), "thumbnails ready");
        presenter
    }

    pub fn insert_thumbnail(&mut self, id: WindowId, thumbnail: ThumbnailComponent) {
        self.thumbnails.insert(id, thumbnail);
    }

    pub fn has_thumbnail(&self, id: WindowId) -> bool {
        self.thumbnails.contains_key(&id)
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, view: &FrameView<'_>) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::backdrop_bg())),
            area,
        );
        if view.items.is_empty() {
            let line = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
            frame.render_widget(
                Paragraph::new(EMPTY_MESSAGE)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(theme::placeholder_fg())),
                line,
            );
            return;
        }

        let ring = view.focused.filter(|_| view.ring_visible);
        // The ringed window is painted last so overlapping neighbours never cover it.
        for (index, item) in view.items.iter().enumerate() {
            if Some(index) != ring {
                self.render_item(frame, view.canvas, item, false);
            }
        }
        if let Some(item) = ring.and_then(|index| view.items.get(index)) {
            self.render_item(frame, view.canvas, item, true);
        }
    }

    fn render_item(
        &mut self,
        frame: &mut UiFrame<'_>,
        canvas: CanvasGeometry,
        item: &DrawItem<'_>,
        ringed: bool,
    ) {
        let rect = canvas_to_cells(&item.rect, canvas, frame.area());
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let (border_type, border_style, title_style) = if ringed {
            (
                BorderType::Thick,
                Style::default().fg(theme::focus_ring()),
                Style::default()
                    .fg(theme::frame_title_focused())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                BorderType::Plain,
                Style::default().fg(theme::frame_border()),
                Style::default().fg(theme::frame_title()),
            )
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style)
            .title_bottom(Line::styled(item.title, title_style).centered());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if let Some(thumbnail) = self.thumbnails.get_mut(&item.id) {
            thumbnail.render(frame, inner);
        }
    }
}
