use term_expose::layout::{LayoutEngine, LayoutParams, LayoutStrategy};
use term_expose::window::{CanvasGeometry, ScreenRect, WindowId, WindowRecord};

const EPS: f64 = 1e-6;

fn workspace() -> Vec<WindowRecord> {
    vec![
        WindowRecord::new(4, "editor", 1920, 1080),
        WindowRecord::new(9, "browser", 1280, 1000),
        WindowRecord::new(11, "term", 640, 480),
        WindowRecord::new(15, "chat", 420, 900),
        WindowRecord::new(21, "dialog", 300, 200),
        WindowRecord::new(22, "video", 1600, 900),
    ]
}

fn engine(strategy: LayoutStrategy) -> LayoutEngine {
    LayoutEngine::new(strategy, LayoutParams::default())
}

fn inside(rect: &ScreenRect, canvas: CanvasGeometry) -> bool {
    rect.x >= -EPS
        && rect.y >= -EPS
        && rect.right() <= canvas.width as f64 + EPS
        && rect.bottom() <= canvas.height as f64 + EPS
}

fn keyed(windows: &[WindowRecord], rects: &[ScreenRect]) -> Vec<(WindowId, ScreenRect)> {
    let mut pairs: Vec<_> = windows.iter().map(|w| w.id).zip(rects.iter().copied()).collect();
    pairs.sort_by_key(|(id, _)| *id);
    pairs
}

#[test]
fn overlap_free_strategies_fit_the_canvas() {
    let canvas = CanvasGeometry::new(1920, 1080);
    let windows = workspace();
    for strategy in [LayoutStrategy::Strip, LayoutStrategy::Grid] {
        let result = engine(strategy).layout(&windows, canvas);
        assert_eq!(result.len(), windows.len(), "{strategy:?}");
        let rects = result.rects(&windows);
        for rect in &rects {
            assert!(inside(rect, canvas), "{strategy:?}: {rect:?} leaves the canvas");
        }
        assert!(result.overlap_area(&windows) <= EPS, "{strategy:?} overlaps");
    }
}

#[test]
fn every_strategy_uses_one_positive_scale() {
    let canvas = CanvasGeometry::new(2560, 1440);
    let windows = workspace();
    for strategy in [LayoutStrategy::Strip, LayoutStrategy::Grid, LayoutStrategy::Radial] {
        let result = engine(strategy).layout(&windows, canvas);
        for placement in &result.placements {
            assert!(placement.scale > 0.0, "{strategy:?}");
            assert!(placement.scale.is_finite(), "{strategy:?}");
        }
    }
    let strip = engine(LayoutStrategy::Strip).layout(&windows, canvas);
    let first = strip.placements[0].scale;
    assert!(strip.placements.iter().all(|p| (p.scale - first).abs() < EPS));
}

#[test]
fn strip_layout_ignores_input_order() {
    let canvas = CanvasGeometry::new(1920, 1080);
    let windows = workspace();
    let mut reversed = windows.clone();
    reversed.reverse();
    let mut rotated = windows.clone();
    rotated.rotate_left(2);

    let engine = engine(LayoutStrategy::Strip);
    let baseline = keyed(&windows, &engine.layout(&windows, canvas).rects(&windows));
    for permuted in [reversed, rotated] {
        let rects = engine.layout(&permuted, canvas).rects(&permuted);
        let got = keyed(&permuted, &rects);
        for ((id_a, a), (id_b, b)) in baseline.iter().zip(&got) {
            assert_eq!(id_a, id_b);
            assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS, "{id_a}");
            assert!((a.width - b.width).abs() < EPS && (a.height - b.height).abs() < EPS);
        }
    }
}

#[test]
fn layouts_are_deterministic() {
    let canvas = CanvasGeometry::new(1366, 768);
    let windows = workspace();
    for strategy in [LayoutStrategy::Strip, LayoutStrategy::Grid, LayoutStrategy::Radial] {
        let engine = engine(strategy);
        assert_eq!(
            engine.layout(&windows, canvas),
            engine.layout(&windows, canvas),
            "{strategy:?}"
        );
    }
}

#[test]
fn empty_workspace_yields_empty_layout() {
    let canvas = CanvasGeometry::new(1920, 1080);
    for strategy in [LayoutStrategy::Strip, LayoutStrategy::Grid, LayoutStrategy::Radial] {
        assert!(engine(strategy).layout(&[], canvas).is_empty());
    }
}
