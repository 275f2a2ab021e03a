//! CLI module for formfilter
//!
//! Provides command-line interface for:
//! - serve: Mirror submissions and serve HTTP
//! - seed: Mirror submissions and report counts
//! - query: One-shot query execution
//! - explain: One-shot explain output

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, parse_param_pairs, query, run, run_command, seed, serve};
pub use errors::{CliError, CliResult};
pub use io::{write_json, write_text};
