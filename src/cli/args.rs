//! CLI argument definitions using clap
//!
//! Commands:
//! - formfilter serve --config <path> [--port <port>]
//! - formfilter seed --config <path>
//! - formfilter query --config <path> [--param key=value]...
//! - formfilter explain [--param key=value]...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formfilter - filtered, paginated views over mirrored form submissions
#[derive(Parser, Debug)]
#[command(name = "formfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mirror submissions, then serve filtered responses over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./formfilter.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Mirror submissions from the configured source and report counts
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./formfilter.json")]
        config: PathBuf,
    },

    /// Mirror submissions, run one query and print the result envelope
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./formfilter.json")]
        config: PathBuf,

        /// Raw query parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Print the compiled predicate and aggregation pipeline for a query
    Explain {
        /// Raw query parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
