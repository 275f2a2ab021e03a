//! CLI command implementations
//!
//! Each command loads its configuration, installs logging and drives the
//! async pieces on a dedicated tokio runtime.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::config::Config;
use crate::executor::QueryExecutor;
use crate::http_server::{FormState, HttpServer};
use crate::ingest::{self, JsonFileSource, SeedReport, SubmissionSource, UpstreamSource};
use crate::observability::init_logging;
use crate::planner::{ExplainPlan, QueryPlan};
use crate::store::{mongo, InMemoryStore};
use crate::validation::QueryParams;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Seed { config } => seed(&config),
        Command::Query { config, params } => query(&config, &params),
        Command::Explain { params } => explain(&params),
    }
}

/// Splits `KEY=VALUE` arguments on the first `=`
pub fn parse_param_pairs(pairs: &[String]) -> CliResult<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| CliError::InvalidParam(pair.clone()))
        })
        .collect()
}

fn runtime() -> CliResult<Runtime> {
    Runtime::new()
        .map_err(|e| CliError::BootFailed(format!("Failed to create tokio runtime: {}", e)))
}

/// Source selected by configuration; a seed file wins over upstream
fn source_for(config: &Config) -> CliResult<Box<dyn SubmissionSource>> {
    if let Some(path) = &config.seed_file {
        return Ok(Box::new(JsonFileSource::new(path.clone())));
    }
    if let Some(upstream) = &config.upstream {
        return Ok(Box::new(UpstreamSource::new(upstream, config.form_id.clone())));
    }
    Err(CliError::NoSource)
}

async fn mirror(config: &Config) -> CliResult<(Arc<InMemoryStore>, SeedReport)> {
    let source = source_for(config)?;
    let store = Arc::new(InMemoryStore::new());
    let report = ingest::seed(source.as_ref(), store.as_ref()).await?;
    Ok((store, report))
}

/// Mirror submissions, then serve HTTP until Ctrl-C.
///
/// A failed mirror is logged and the server starts with an empty store.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    let rt = runtime()?;
    rt.block_on(async {
        let store = match mirror(&config).await {
            Ok((store, report)) => {
                info!(
                    inserted = report.inserted,
                    skipped = report.skipped,
                    "initial mirror complete"
                );
                store
            }
            Err(e) => {
                error!(error = %e, "initial mirror failed; serving an empty store");
                Arc::new(InMemoryStore::new())
            }
        };

        let executor = QueryExecutor::new(store).with_timeout(config.query_timeout());
        let state = Arc::new(FormState::new(executor, config.form_id.clone()));

        let mut http = config.http();
        if let Some(port) = port {
            http.port = port;
        }

        HttpServer::new(http, state)
            .start()
            .await
            .map_err(|e| CliError::BootFailed(format!("HTTP server failed: {}", e)))
    })
}

/// Mirror submissions and print the seed report
pub fn seed(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    let rt = runtime()?;
    let (_store, report) = rt.block_on(mirror(&config))?;
    write_json(&report)
}

/// Validate parameters, mirror submissions, run one query and print the envelope
pub fn query(config_path: &Path, params: &[String]) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    let spec = QueryParams::parse(&parse_param_pairs(params)?)?;

    let rt = runtime()?;
    let envelope = rt.block_on(async {
        let (store, _report) = mirror(&config).await?;
        let executor = QueryExecutor::new(store).with_timeout(config.query_timeout());
        executor.orchestrate(&spec).await.map_err(CliError::from)
    })?;

    write_json(&envelope)
}

/// Validate parameters and print the explain tree plus the aggregation pipeline
pub fn explain(params: &[String]) -> CliResult<()> {
    let spec = QueryParams::parse(&parse_param_pairs(params)?)?;
    let plan = QueryPlan::from_spec(&spec);

    write_text(&ExplainPlan::from_plan(&plan).to_string())?;
    write_text("Pipeline:\n")?;
    write_json(&mongo::pipeline(&plan.predicate, &plan.fetch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir, with_seed: bool) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("formfilter.json");
        let mut config = json!({ "form_id": "form-1", "log_level": "warn" });

        if with_seed {
            let seed_path = temp_dir.path().join("responses.json");
            let export = json!({
                "responses": [
                    {
                        "submissionId": "a",
                        "submissionTime": "2024-05-16T10:00:00.000Z",
                        "questions": [{ "id": "q1", "value": 3 }]
                    },
                    {
                        "submissionId": "b",
                        "submissionTime": "2024-05-17T10:00:00.000Z",
                        "questions": [{ "id": "q1", "value": 30 }]
                    }
                ]
            });
            fs::write(&seed_path, export.to_string()).unwrap();
            config["seed_file"] = json!(seed_path.to_string_lossy());
        }

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_parse_param_pairs() {
        let pairs = vec![
            "limit=5".to_string(),
            r#"filters=[{"id":"q1","condition":"equals","value":"a=b"}]"#.to_string(),
        ];
        let params = parse_param_pairs(&pairs).unwrap();

        assert_eq!(params["limit"], "5");
        assert!(params["filters"].ends_with(r#""a=b"}]"#));
    }

    #[test]
    fn test_parse_param_pairs_rejects_bare_key() {
        let result = parse_param_pairs(&["limit".to_string()]);
        assert!(matches!(result, Err(CliError::InvalidParam(_))));
    }

    #[test]
    fn test_seed_requires_source() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, false);

        let result = seed(&config_path);
        assert!(matches!(result, Err(CliError::NoSource)));
    }

    #[test]
    fn test_seed_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, true);

        assert!(seed(&config_path).is_ok());
    }

    #[test]
    fn test_query_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, true);

        let params = vec![
            r#"filters=[{"id":"q1","condition":"greater_than","value":10}]"#.to_string(),
        ];
        assert!(query(&config_path, &params).is_ok());
    }

    #[test]
    fn test_query_rejects_invalid_params_before_seeding() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, false);

        let result = query(&config_path, &["limit=0".to_string()]);
        assert!(matches!(result, Err(CliError::Validation(_))));
    }

    #[test]
    fn test_explain() {
        let params = vec![
            "sort=desc".to_string(),
            r#"filters=[{"id":"q1","condition":"does_not_equal","value":"x"}]"#.to_string(),
        ];
        assert!(explain(&params).is_ok());
    }
}
