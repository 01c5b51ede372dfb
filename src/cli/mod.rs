//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{AnalyzeArgs, Args, Command, ConfigAction, ConvertArgs, PlayArgs, RenderArgs};
pub use commands::{handle_config_action, list_palettes, run_analyze, run_convert, run_play};
pub use enums::Resample;
