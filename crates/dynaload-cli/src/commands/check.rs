use std::path::Path;

use anyhow::{Context, Result};

use dynaload_engine::config::parser;
use dynaload_engine::config::validator;
use dynaload_engine::resolve_key_schema;

/// Execute the `check` command: validate the job and resolve the table's key schema.
pub async fn execute(job_path: &Path) -> Result<()> {
    let config = parser::parse_job(job_path)
        .with_context(|| format!("Failed to parse job: {}", job_path.display()))?;

    validator::validate_job(&config)?;
    println!("Job structure:     OK");

    if !config.source.path.is_file() {
        anyhow::bail!("CSV file not found: {}", config.source.path.display());
    }
    println!("CSV file:          OK ({})", config.source.path.display());

    let store = super::connect_store(&config).await?;
    let key_schema = resolve_key_schema(&config, &store).await?;
    let origin = if config.destination.primary_key.is_empty() {
        "DescribeTable"
    } else {
        "job file"
    };
    println!(
        "Table '{}':  OK (key: {key_schema}, from {origin})",
        config.destination.table
    );

    println!("\nAll checks passed.");
    Ok(())
}
