use std::path::Path;

use anyhow::{Context, Result};

use dynaload_engine::config::parser;
use dynaload_engine::ExecutionOptions;

/// Execute the `run` command: parse, validate, and run a job file.
pub async fn execute(job_path: &Path, dry_run: bool, limit: Option<u64>) -> Result<()> {
    let config = parser::parse_job(job_path)
        .with_context(|| format!("Failed to parse job: {}", job_path.display()))?;

    let options = ExecutionOptions { dry_run, limit };
    super::execute_job(&config, &options).await
}
