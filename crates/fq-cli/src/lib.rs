//! Float data explorer CLI library.
//!
//! This crate provides the CLI interface over the `fq-core` query engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, Dataset, FloatsArgs, HistoryArgs, QueryArgs};
pub use config::Config;
