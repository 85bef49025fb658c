//! CLI subcommand implementations.

pub mod map;
pub mod report;
pub mod util;
