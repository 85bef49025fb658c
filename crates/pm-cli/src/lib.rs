//! Process map CLI library.
//!
//! This crate provides the CLI interface, configuration, and event log
//! loading for the process map builder.

mod cli;
pub mod commands;
mod config;
pub mod load;

pub use cli::{Cli, Commands, MapArgs};
pub use config::Config;
