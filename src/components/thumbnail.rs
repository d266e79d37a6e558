use std::path::Path;

use ratatui::layout::Rect;
use ratatui::style::Style;
use resvg::tiny_skia;

use crate::ui::UiFrame;

const DEFAULT_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CachedCell {
    ch: char,
    fg: Option<(u8, u8, u8)>,
    bg: Option<(u8, u8, u8)>,
}

const BLANK: CachedCell = CachedCell {
    ch: ' ',
    fg: None,
    bg: None,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Luma ramp, two source rows per cell.
    Ascii,
    /// Half-block cells: top pixel in the foreground, bottom pixel in the background.
    #[default]
    HalfBlock,
}

/// Downsampled window screenshot drawn inside a window frame.
pub struct ThumbnailComponent {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    cached: Vec<Vec<CachedCell>>,
    cached_area: Rect,
    dirty: bool,
    keep_aspect: bool,
    render_mode: RenderMode,
}

impl ThumbnailComponent {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            rgba: Vec::new(),
            cached: Vec::new(),
            cached_area: Rect::default(),
            dirty: true,
            keep_aspect: true,
            render_mode: RenderMode::default(),
        }
    }

    pub fn from_png<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let mut thumbnail = Self::new();
        thumbnail.load_png_from_path(path)?;
        Ok(thumbnail)
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.rgba.clear();
        self.cached.clear();
        self.dirty = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_keep_aspect(&mut self, keep: bool) {
        self.keep_aspect = keep;
        self.dirty = true;
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        self.dirty = true;
    }

    /// Replace the image with straight (non-premultiplied) RGBA pixels.
    /// Mismatched buffers clear the thumbnail.
    pub fn set_rgba8(&mut self, width: u32, height: u32, rgba: Vec<u8>) {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(4))
            .map(|v| v as usize);
        if width == 0 || height == 0 || expected != Some(rgba.len()) {
            self.clear();
            return;
        }
        self.width = width;
        self.height = height;
        self.rgba = rgba;
        self.dirty = true;
    }

    pub fn load_png_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), String> {
        let pixmap = tiny_skia::Pixmap::load_png(path).map_err(|err| err.to_string())?;
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        self.set_rgba8(pixmap.width(), pixmap.height(), rgba);
        Ok(())
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let area = area.intersection(frame.area());
        if area.width == 0 || area.height == 0 || !self.is_loaded() {
            return;
        }
        if self.dirty || self.cached_area != area {
            self.rebuild_cache(area);
        }
        let buffer = frame.buffer_mut();
        for (row, line) in self.cached.iter().enumerate() {
            let y = area.y.saturating_add(row as u16);
            for (col, cell) in line.iter().enumerate() {
                if *cell == BLANK {
                    continue;
                }
                let x = area.x.saturating_add(col as u16);
                if let Some(buf_cell) = buffer.cell_mut((x, y)) {
                    let mut style = Style::default();
                    if let Some(rgb) = cell.fg {
                        style = style.fg(crate::theme::rgb_to_color(rgb));
                    }
                    if let Some(rgb) = cell.bg {
                        style = style.bg(crate::theme::rgb_to_color(rgb));
                    }
                    let mut buf = [0u8; 4];
                    buf_cell.set_symbol(cell.ch.encode_utf8(&mut buf)).set_style(style);
                }
            }
        }
    }

    fn rebuild_cache(&mut self, area: Rect) {
        self.cached_area = area;
        self.dirty = false;
        let mut cached = vec![vec![BLANK; area.width as usize]; area.height as usize];

        // Both modes treat a cell as one pixel wide and two pixels tall.
        let avail_w = area.width as u32;
        let avail_h = area.height as u32 * 2;
        let (target_w, target_h, offset_x, offset_y) = if self.keep_aspect {
            let scale_w = avail_w as f32 / self.width as f32;
            let scale_h = avail_h as f32 / self.height as f32;
            let scale = scale_w.min(scale_h);
            let tw = ((self.width as f32 * scale).round().max(1.0) as u32).min(avail_w);
            let th = ((self.height as f32 * scale).round().max(1.0) as u32).min(avail_h);
            (tw, th, (avail_w - tw) / 2, (avail_h - th) / 2)
        } else {
            (avail_w, avail_h, 0, 0)
        };
        let sample = |px: u32, py: u32| -> Option<(u8, u8, u8)> {
            if px < offset_x
                || py < offset_y
                || px >= offset_x + target_w
                || py >= offset_y + target_h
            {
                return None;
            }
            let sx = (px - offset_x) * self.width / target_w;
            let sy = (py - offset_y) * self.height / target_h;
            self.sample_rgb(sx, sy)
        };

        for row in 0..area.height as u32 {
            for col in 0..area.width as u32 {
                let top = sample(col, row * 2);
                let bottom = sample(col, row * 2 + 1);
                let cell = match self.render_mode {
                    RenderMode::HalfBlock => match (top, bottom) {
                        (Some(top), Some(bottom)) => CachedCell {
                            ch: UPPER_HALF,
                            fg: Some(top),
                            bg: Some(bottom),
                        },
                        (Some(top), None) => CachedCell {
                            ch: UPPER_HALF,
                            fg: Some(top),
                            bg: None,
                        },
                        (None, Some(bottom)) => CachedCell {
                            ch: LOWER_HALF,
                            fg: Some(bottom),
                            bg: None,
                        },
                        (None, None) => continue,
                    },
                    RenderMode::Ascii => {
                        let rgb = match (top, bottom) {
                            (Some(a), Some(b)) => average_rgb(a, b),
                            (Some(only), None) | (None, Some(only)) => only,
                            (None, None) => continue,
                        };
                        let idx = luma(rgb) as usize * (DEFAULT_RAMP.len() - 1) / 255;
                        CachedCell {
                            ch: DEFAULT_RAMP[idx],
                            fg: Some(rgb),
                            bg: None,
                        }
                    }
                };
                if let Some(slot) = cached
                    .get_mut(row as usize)
                    .and_then(|r| r.get_mut(col as usize))
                {
                    *slot = cell;
                }
            }
        }
        self.cached = cached;
    }

    /// Pixel color composited over black; `None` for fully transparent pixels.
    fn sample_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let chunk = self.rgba.get(idx..idx + 4)?;
        let alpha = chunk[3] as u16;
        if alpha == 0 {
            return None;
        }
        let r = (chunk[0] as u16 * alpha / 255) as u8;
        let g = (chunk[1] as u16 * alpha / 255) as u8;
        let b = (chunk[2] as u16 * alpha / 255) as u8;
        Some((r, g, b))
    }
}

impl Default for ThumbnailComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn luma((r, g, b): (u8, u8, u8)) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

fn average_rgb(a: (u8, u8, u8), b: (u8, u8, u8)) -> (u8, u8, u8) {
    (
        ((a.0 as u16 + b.0 as u16) / 2) as u8,
        ((a.1 as u16 + b.1 as u16) / 2) as u8,
        ((a.2 as u16 + b.2 as u16) / 2) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat((width * height) as usize)
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma((0, 0, 0)), 0);
        assert_eq!(luma((255, 255, 255)), 255);
        assert_eq!(luma((255, 0, 0)), 76);
    }

    #[test]
    fn mismatched_buffer_clears() {
        let mut thumb = ThumbnailComponent::new();
        thumb.set_rgba8(1, 1, vec![1, 2, 3, 255]);
        assert!(thumb.is_loaded());
        thumb.set_rgba8(2, 2, vec![0; 3]);
        assert!(!thumb.is_loaded());
        assert_eq!(thumb.dimensions(), (0, 0));
    }

    #[test]
    fn half_block_stretches_without_aspect() {
        let mut thumb = ThumbnailComponent::new();
        thumb.set_keep_aspect(false);
        thumb.set_rgba8(2, 2, solid(2, 2, [255, 0, 0, 255]));
        let area = Rect::new(0, 0, 3, 2);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        thumb.render(&mut frame, area);
        for y in 0..2 {
            for x in 0..3 {
                let cell = &buffer[(x, y)];
                assert_eq!(cell.symbol(), "▀");
                assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
                assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
            }
        }
    }

    #[test]
    fn keep_aspect_centers_wide_image() {
        // 4x1 image in a 4x2 cell area: four pixel rows available, one used.
        let mut thumb = ThumbnailComponent::new();
        thumb.set_rgba8(4, 1, solid(4, 1, [0, 0, 255, 255]));
        let area = Rect::new(0, 0, 4, 2);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        thumb.render(&mut frame, area);
        for x in 0..4 {
            assert_eq!(buffer[(x, 0)].symbol(), "▄");
            assert_eq!(buffer[(x, 0)].fg, Color::Rgb(0, 0, 255));
            assert_eq!(buffer[(x, 1)].symbol(), " ");
        }
    }

    #[test]
    fn ascii_mode_uses_luma_ramp() {
        let mut thumb = ThumbnailComponent::new();
        thumb.set_keep_aspect(false);
        thumb.set_render_mode(RenderMode::Ascii);
        thumb.set_rgba8(2, 1, vec![255, 255, 255, 255, 255, 0, 0, 255]);
        let area = Rect::new(0, 0, 2, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        thumb.render(&mut frame, area);
        assert_eq!(buffer[(0, 0)].symbol(), "@");
        assert_eq!(buffer[(1, 0)].symbol(), ":");
        assert_eq!(buffer[(1, 0)].fg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn transparent_pixels_leave_cells_untouched() {
        let mut thumb = ThumbnailComponent::new();
        thumb.set_keep_aspect(false);
        thumb.set_rgba8(1, 1, vec![255, 255, 255, 0]);
        let area = Rect::new(0, 0, 2, 2);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        thumb.render(&mut frame, area);
        assert_eq!(buffer, Buffer::empty(area));
    }

    #[test]
    fn render_is_clipped_to_frame() {
        let mut thumb = ThumbnailComponent::new();
        thumb.set_keep_aspect(false);
        thumb.set_rgba8(1, 1, vec![0, 255, 0, 255]);
        let area = Rect::new(0, 0, 2, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        thumb.render(&mut frame, Rect::new(1, 0, 5, 5));
        assert_eq!(buffer[(0, 0)].symbol(), " ");
        assert_eq!(buffer[(1, 0)].symbol(), "▀");
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("7.png");
        let mut pixmap = tiny_skia::Pixmap::new(3, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        pixmap.save_png(&path).unwrap();

        let thumb = ThumbnailComponent::from_png(&path).unwrap();
        assert_eq!(thumb.dimensions(), (3, 2));
        assert_eq!(thumb.sample_rgb(2, 1), Some((10, 20, 30)));
    }

    #[test]
    fn missing_png_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ThumbnailComponent::from_png(dir.path().join("nope.png")).is_err());
    }
}
