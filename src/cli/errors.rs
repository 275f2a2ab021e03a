//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::QueryExecutionError;
use crate::ingest::IngestError;
use crate::validation::ValidationError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("FORMFILTER_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// A `--param` argument without `=`
    #[error("FORMFILTER_CLI_INVALID_PARAM: expected KEY=VALUE, got '{0}'")]
    InvalidParam(String),

    #[error("FORMFILTER_CLI_VALIDATION_ERROR: {0}")]
    Validation(#[from] ValidationError),

    /// Neither `seed_file` nor `upstream` is configured
    #[error("FORMFILTER_CLI_NO_SOURCE: configure either 'seed_file' or 'upstream'")]
    NoSource,

    #[error("FORMFILTER_CLI_SEED_FAILED: {0}")]
    Seed(#[from] IngestError),

    #[error("FORMFILTER_CLI_QUERY_FAILED: {0}")]
    Query(#[from] QueryExecutionError),

    #[error("FORMFILTER_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),

    #[error("FORMFILTER_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("FORMFILTER_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
