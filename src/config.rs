//! Command-line configuration.
//!
//! Every flag has an environment or built-in default, so a bare invocation
//! from the daemon's wrapper script only needs `EXPOSWAYDIR` set.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use crate::components::RenderMode;
use crate::constants::{
    ACTIVATION_DELAY, DEFAULT_ACTIVATE_COMMAND, DEFAULT_DEBOUNCE, MARGIN_RATIO, MAX_DEBOUNCE,
    MONITOR_FILE_NAME, PACK_RATIO, RADIAL_ATTEMPTS, SEARCH_TOLERANCE,
};
use crate::error::ConfigError;
use crate::layout::{LayoutEngine, LayoutParams, LayoutStrategy};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "term-expose",
    version = env!("CARGO_PKG_VERSION"),
    about = "Overview of all open windows with keyboard focus switching",
    after_help = indoc! {"
        Keys:
          Arrows, h j k l    move focus (first press shows the focus ring)
          Enter, Space       focus the selected window and exit
          Esc, q, Ctrl+C     exit without changing focus
    "}
)]
pub struct Cli {
    /// Directory the window daemon keeps its snapshot in.
    #[arg(long, value_name = "DIR", env = "EXPOSWAYDIR")]
    state_dir: Option<PathBuf>,

    /// Monitor geometry file. Defaults to `<state-dir>/output`.
    #[arg(long, value_name = "FILE", env = "EXPOSWAYMON")]
    monitor: Option<PathBuf>,

    /// Placement strategy.
    #[arg(long, value_enum, default_value_t = LayoutStrategy::Strip)]
    strategy: LayoutStrategy,

    /// Fraction of the canvas the packed windows may cover.
    #[arg(long, value_name = "RATIO", default_value_t = PACK_RATIO)]
    pack_ratio: f64,

    /// Padding around each window as a fraction of its size.
    #[arg(long, value_name = "RATIO", default_value_t = MARGIN_RATIO)]
    margin_ratio: f64,

    /// Convergence tolerance of the strip-width search.
    #[arg(long, value_name = "RATIO", default_value_t = SEARCH_TOLERANCE)]
    tolerance: f64,

    /// Minimum time between two focus moves, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    repeat_delay_ms: u64,

    /// Command that focuses the chosen window; `{id}` is replaced by its id.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_ACTIVATE_COMMAND)]
    activate_cmd: String,

    /// Pause before running the activation command, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = ACTIVATION_DELAY.as_millis() as u64)]
    activate_delay_ms: u64,

    /// Draw frames and titles only.
    #[arg(long)]
    no_thumbnails: bool,

    /// Render thumbnails with a character ramp instead of half blocks.
    #[arg(long)]
    ascii_thumbnails: bool,

    /// Write debug logs to this file.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub state_dir: PathBuf,
    pub monitor_file: PathBuf,
    pub engine: LayoutEngine,
    pub debounce: Duration,
    pub activate_command: String,
    pub activate_delay: Duration,
    /// `None` disables thumbnails.
    pub thumbnails: Option<RenderMode>,
    pub log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let state_dir = cli.state_dir.clone().ok_or(ConfigError::MissingStateDir)?;
        if !(cli.pack_ratio > 0.0 && cli.pack_ratio <= 1.0) {
            return Err(ConfigError::PackRatio(cli.pack_ratio));
        }
        if !(0.0..0.5).contains(&cli.margin_ratio) {
            return Err(ConfigError::MarginRatio(cli.margin_ratio));
        }
        if !(cli.tolerance > 0.0 && cli.tolerance <= 10.0) {
            return Err(ConfigError::Tolerance(cli.tolerance));
        }
        let debounce = Duration::from_millis(cli.repeat_delay_ms);
        if debounce > MAX_DEBOUNCE {
            return Err(ConfigError::RepeatDelay {
                max_ms: MAX_DEBOUNCE.as_millis(),
                got_ms: debounce.as_millis(),
            });
        }
        let monitor_file = cli
            .monitor
            .clone()
            .unwrap_or_else(|| state_dir.join(MONITOR_FILE_NAME));
        let params = LayoutParams {
            margin_ratio: cli.margin_ratio,
            pack_ratio: cli.pack_ratio,
            tolerance: cli.tolerance,
            radial_attempts: RADIAL_ATTEMPTS,
        };
        let thumbnails = match (cli.no_thumbnails, cli.ascii_thumbnails) {
            (true, _) => None,
            (false, true) => Some(RenderMode::Ascii),
            (false, false) => Some(RenderMode::HalfBlock),
        };
        Ok(Self {
            state_dir,
            monitor_file,
            engine: LayoutEngine::new(cli.strategy, params),
            debounce,
            activate_command: cli.activate_cmd.clone(),
            activate_delay: Duration::from_millis(cli.activate_delay_ms),
            thumbnails,
            log_file: cli.log.clone(),
        })
    }
}
