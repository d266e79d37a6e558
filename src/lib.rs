//! Expose-style window overview for the terminal.
//!
//! A snapshot of the workspace's windows is packed onto one canvas, drawn
//! with ratatui, and navigated with directional keys until one window is
//! activated or the overview is cancelled.

pub mod activate;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod focus;
pub mod keybindings;
pub mod layout;
pub mod presenter;
pub mod runner;
pub mod session;
pub mod snapshot;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::ExposeError;
