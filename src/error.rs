//! Error types for the I/O boundaries around the layout and focus core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed monitor file {path}: expected `WIDTH HEIGHT`")]
    MalformedMonitor { path: PathBuf },
    #[error("malformed window file {path}: expected `X,Y WIDTHxHEIGHT TITLE`")]
    MalformedWindow { path: PathBuf },
    #[error("degenerate geometry in {path}: {width}x{height}")]
    DegenerateGeometry {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("invalid activation command: {0}")]
    Template(#[from] shell_words::ParseError),
    #[error("activation command is empty")]
    EmptyCommand,
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no state directory: pass --state-dir or set EXPOSWAYDIR")]
    MissingStateDir,
    #[error("pack ratio must be in (0, 1], got {0}")]
    PackRatio(f64),
    #[error("margin ratio must be in [0, 0.5), got {0}")]
    MarginRatio(f64),
    #[error("search tolerance must be in (0, 10], got {0}")]
    Tolerance(f64),
    #[error("repeat delay must be at most {max_ms} ms, got {got_ms} ms")]
    RepeatDelay { max_ms: u128, got_ms: u128 },
}

#[derive(Debug, Error)]
pub enum ExposeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Activation(#[from] ActivationError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
