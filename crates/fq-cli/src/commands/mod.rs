//! CLI subcommand implementations.

pub mod fields;
pub mod floats;
pub mod history;
pub mod util;
