//! # skr-cli
//!
//! Command-line interface for skr.
//!
//! ## Commands
//!
//! - `skr list`: Skills visible from the current directory
//! - `skr validate`: Check a skill definition
//! - `skr config`: Show the merged configuration
//! - `skr http serve` / `skr http generate`: Registry UI, live or static
//! - `skr system rm`: Remove an artifact from the local store
//! - `skr completions`: Shell completions

pub mod commands;

pub use commands::Cli;
