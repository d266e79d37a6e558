use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use term_expose::focus::Navigator;
use term_expose::layout::{LayoutEngine, LayoutParams, LayoutResult, LayoutStrategy};
use term_expose::presenter::Presenter;
use term_expose::session::Session;
use term_expose::ui::UiFrame;
use term_expose::window::{CanvasGeometry, WindowRecord};

const STRATEGIES: [LayoutStrategy; 3] = [
    LayoutStrategy::Strip,
    LayoutStrategy::Grid,
    LayoutStrategy::Radial,
];

#[derive(Parser, Debug)]
#[command(
    name = "expose-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Layout benchmark comparing packing strategies on random window sets"
)]
struct BenchCli {
    /// Number of windows per generated workspace.
    #[arg(short = 'n', long = "windows", value_name = "COUNT", default_value_t = 12)]
    windows: usize,

    /// Seed for the window generator. Defaults to the clock.
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    seed: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long = "width", value_name = "PX", default_value_t = 1920)]
    canvas_width: u32,

    /// Canvas height in pixels.
    #[arg(long = "height", value_name = "PX", default_value_t = 1080)]
    canvas_height: u32,

    /// Workspaces generated per strategy.
    #[arg(short = 'i', long = "iterations", value_name = "COUNT", default_value_t = 200)]
    iterations: u32,

    /// Terminal size the render pass draws into, as COLSxROWS.
    #[arg(long = "cells", value_name = "COLSxROWS", default_value = "160x48")]
    cells: String,
}

struct BenchConfig {
    windows: usize,
    seed: u64,
    canvas: CanvasGeometry,
    iterations: u32,
    cells: Rect,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=512).contains(&cli.windows) {
            return Err("windows must be between 1 and 512".to_string());
        }
        if cli.canvas_width == 0 || cli.canvas_height == 0 {
            return Err("canvas dimensions must be positive".to_string());
        }
        if !(1..=100_000).contains(&cli.iterations) {
            return Err("iterations must be between 1 and 100000".to_string());
        }
        let (cols, rows) = cli
            .cells
            .split_once('x')
            .and_then(|(c, r)| Some((c.parse::<u16>().ok()?, r.parse::<u16>().ok()?)))
            .filter(|(c, r)| *c > 0 && *r > 0)
            .ok_or_else(|| format!("cells must look like 160x48, got {}", cli.cells))?;
        Ok(Self {
            windows: cli.windows,
            seed: cli.seed.unwrap_or_else(seed_from_clock),
            canvas: CanvasGeometry::new(cli.canvas_width, cli.canvas_height),
            iterations: cli.iterations,
            cells: Rect::new(0, 0, cols, rows),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    for strategy in STRATEGIES {
        let stats = run_benchmark(strategy, &config);
        println!("{}", stats.final_report(&config));
    }
    Ok(())
}

fn run_benchmark(strategy: LayoutStrategy, config: &BenchConfig) -> BenchStats {
    let engine = LayoutEngine::new(strategy, LayoutParams::default());
    // Every strategy sees the same workspaces.
    let mut generator = WindowGenerator::new(config.seed);
    let mut stats = BenchStats::new(strategy);
    let mut buffer = Buffer::empty(config.cells);

    for _ in 0..config.iterations {
        let windows = generator.workspace(config.windows, config.canvas);

        let started = Instant::now();
        let result = engine.layout(&windows, config.canvas);
        let layout_time = started.elapsed();
        stats.record_layout(&result, &windows, config.canvas, layout_time);

        let session = Session::new(windows, config.canvas, &engine, Navigator::default());
        buffer.reset();
        let started = Instant::now();
        let mut frame = UiFrame::from_parts(config.cells, &mut buffer);
        Presenter::new().render(&mut frame, &session.frame());
        stats.record_render(started.elapsed());
    }
    stats
}

struct BenchStats {
    strategy: LayoutStrategy,
    runs: u32,
    total_layout: Duration,
    slowest_layout: Duration,
    total_render: Duration,
    coverage_sum: f64,
    overlap_sum: f64,
    overlapping_runs: u32,
}

impl BenchStats {
    fn new(strategy: LayoutStrategy) -> Self {
        Self {
            strategy,
            runs: 0,
            total_layout: Duration::ZERO,
            slowest_layout: Duration::ZERO,
            total_render: Duration::ZERO,
            coverage_sum: 0.0,
            overlap_sum: 0.0,
            overlapping_runs: 0,
        }
    }

    fn record_layout(
        &mut self,
        result: &LayoutResult,
        windows: &[WindowRecord],
        canvas: CanvasGeometry,
        elapsed: Duration,
    ) {
        let canvas_area = canvas.width as f64 * canvas.height as f64;
        let covered: f64 = result.rects(windows).iter().map(|r| r.area()).sum();
        let overlap = result.overlap_area(windows);
        self.runs = self.runs.saturating_add(1);
        self.total_layout += elapsed;
        self.slowest_layout = self.slowest_layout.max(elapsed);
        self.coverage_sum += covered / canvas_area;
        self.overlap_sum += overlap / canvas_area;
        if overlap > 0.0 {
            self.overlapping_runs += 1;
        }
    }

    fn record_render(&mut self, elapsed: Duration) {
        self.total_render += elapsed;
    }

    fn mean(&self, value: f64) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        value / self.runs as f64
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let coverage = self.mean(self.coverage_sum) * 100.0;
        indoc::formatdoc!(
            r#"
            {strategy:?}: {runs} workspaces of {windows} windows on {w}x{h} (seed {seed})
            Layout: avg {avg:.3} ms | worst {worst:.3} ms
            Render: avg {render:.3} ms into {cols}x{rows} cells
            Coverage: {coverage:.1}% | Slack: {slack:.1}%
            Overlap: avg {overlap:.3}% of canvas | {overlapping} runs with overlap
            "#,
            strategy = self.strategy,
            runs = self.runs,
            windows = config.windows,
            w = config.canvas.width,
            h = config.canvas.height,
            seed = config.seed,
            avg = self.mean(self.total_layout.as_secs_f64()) * 1_000.0,
            worst = self.slowest_layout.as_secs_f64() * 1_000.0,
            render = self.mean(self.total_render.as_secs_f64()) * 1_000.0,
            cols = config.cells.width,
            rows = config.cells.height,
            coverage = coverage,
            slack = 100.0 - coverage,
            overlap = self.mean(self.overlap_sum) * 100.0,
            overlapping = self.overlapping_runs,
        )
    }
}

/// Deterministic workspace generator: a mix of full-screen, half-screen and
/// small dialog-sized windows.
struct WindowGenerator {
    state: u64,
    next_id: u64,
}

impl WindowGenerator {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0xA5A5_A5A5_1234_5678,
            next_id: 1,
        }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn span(&mut self, max: u32, low_pct: u32, high_pct: u32) -> u32 {
        let pct = low_pct + self.next() % (high_pct - low_pct + 1);
        (max * pct / 100).max(1)
    }

    fn workspace(&mut self, count: usize, canvas: CanvasGeometry) -> Vec<WindowRecord> {
        (0..count)
            .map(|_| {
                let (w, h) = match self.next() % 3 {
                    0 => (
                        self.span(canvas.width, 90, 100),
                        self.span(canvas.height, 90, 100),
                    ),
                    1 => (
                        self.span(canvas.width, 40, 60),
                        self.span(canvas.height, 60, 100),
                    ),
                    _ => (
                        self.span(canvas.width, 15, 35),
                        self.span(canvas.height, 15, 40),
                    ),
                };
                let id = self.next_id;
                self.next_id += 1;
                WindowRecord::new(id, format!("window {id}"), w, h)
            })
            .collect()
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
