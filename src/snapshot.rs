//! Reader for the state directory the window-watching daemon maintains.
//!
//! Layout of the directory:
//!
//! - `output`: geometry of the focused monitor, `WIDTH HEIGHT`.
//! - `<id>`: one file per window, first line `X,Y WIDTHxHEIGHT TITLE`.
//! - `<id>.png`: last captured screenshot of that window (optional).
//!
//! Anything else in the directory is ignored. Zero-sized geometry is
//! rejected here so the layout core only ever sees positive dimensions.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::SnapshotError;
use crate::window::{CanvasGeometry, WindowId, WindowRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub canvas: CanvasGeometry,
    /// Sorted by ascending id.
    pub windows: Vec<WindowRecord>,
    pub state_dir: PathBuf,
}

impl Snapshot {
    pub fn load(state_dir: &Path, monitor_file: &Path) -> Result<Self, SnapshotError> {
        let canvas = read_monitor(monitor_file)?;
        let windows = read_windows(state_dir)?;
        debug!(
            windows = windows.len(),
            width = canvas.width,
            height = canvas.height,
            dir = %state_dir.display(),
            "snapshot loaded"
        );
        Ok(Self {
            canvas,
            windows,
            state_dir: state_dir.to_path_buf(),
        })
    }

    pub fn screenshot_path(&self, id: WindowId) -> PathBuf {
        self.state_dir.join(format!("{id}.png"))
    }
}

pub fn read_monitor(path: &Path) -> Result<CanvasGeometry, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) =
        parse_monitor(&text).ok_or_else(|| SnapshotError::MalformedMonitor {
            path: path.to_path_buf(),
        })?;
    if width == 0 || height == 0 {
        return Err(SnapshotError::DegenerateGeometry {
            path: path.to_path_buf(),
            width,
            height,
        });
    }
    Ok(CanvasGeometry::new(width, height))
}

pub fn read_windows(dir: &Path) -> Result<Vec<WindowRecord>, SnapshotError> {
    let io_err = |source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut windows = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        let Some(id) = name.to_str().and_then(|n| n.parse::<u64>().ok()) else {
            trace!(entry = ?name, "skipping non-window entry");
            continue;
        };
        let path = entry.path();
        let text = fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        let line = text.lines().next().unwrap_or_default();
        let (width, height, title) =
            parse_window_line(line).ok_or_else(|| SnapshotError::MalformedWindow {
                path: path.clone(),
            })?;
        if width == 0 || height == 0 {
            return Err(SnapshotError::DegenerateGeometry {
                path,
                width,
                height,
            });
        }
        windows.push(WindowRecord::new(id, title, width, height));
    }
    windows.sort_by_key(|w| w.id);
    Ok(windows)
}

/// Parses `WIDTH HEIGHT`; anything after the first two numbers is ignored.
pub fn parse_monitor(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    Some((width, height))
}

/// Parses `X,Y WIDTHxHEIGHT TITLE`. The position is validated but unused.
pub fn parse_window_line(line: &str) -> Option<(u32, u32, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (position, rest) = line.split_once(' ')?;
    let (x, y) = position.split_once(',')?;
    x.parse::<i64>().ok()?;
    y.parse::<i64>().ok()?;
    let (size, title) = rest.split_once(' ')?;
    let (width, height) = size.split_once('x')?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((width.parse().ok()?, height.parse().ok()?, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_line_parses() {
        assert_eq!(parse_monitor("1920 1080"), Some((1920, 1080)));
        assert_eq!(parse_monitor("2560 1440\n"), Some((2560, 1440)));
        assert_eq!(parse_monitor("1920"), None);
        assert_eq!(parse_monitor("wide tall"), None);
    }

    #[test]
    fn window_line_keeps_spaces_in_title() {
        assert_eq!(
            parse_window_line("10,-4 1280x720 vim - notes.md"),
            Some((1280, 720, "vim - notes.md"))
        );
    }

    #[test]
    fn window_line_rejects_garbage() {
        assert_eq!(parse_window_line("1280x720 title"), None);
        assert_eq!(parse_window_line("0,0 1280 title"), None);
        assert_eq!(parse_window_line("0,0 1280x720 "), None);
        assert_eq!(parse_window_line("a,b 1280x720 t"), None);
    }
}
