//! Edge Helper: validator setup, lifecycle and backup for polygon-sdk nodes.
//!
//! The binary in `main.rs` parses [`cli::Cli`] and hands the selected
//! subcommand to [`commands::run`].

pub mod cli;
pub mod commands;
