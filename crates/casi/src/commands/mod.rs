//! Command handlers for the casi CLI.

pub mod config_cmd;
pub mod data;
pub mod menu;
pub mod stats;
pub mod util;

use crate::cli::{ColorMode, OutputFormat};

/// Per-invocation rendering context shared by all handlers.
pub struct RenderCtx {
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
}
