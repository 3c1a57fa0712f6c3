pub mod check;
pub mod load;
pub mod run;

use anyhow::{Context, Result};

use dynaload_dynamodb::DynamoStore;
use dynaload_engine::config::types::JobConfig;
use dynaload_engine::config::validator;
use dynaload_engine::{
    resolve_key_schema, run_job, ConsoleStatus, ExecutionOptions, MemoryStore, RunSummary,
};

/// Build the DynamoDB store described by `destination.config`.
pub(crate) async fn connect_store(config: &JobConfig) -> Result<DynamoStore> {
    let store_config = dynaload_dynamodb::Config::from_value(&config.destination.config)?;
    let store = DynamoStore::connect(&store_config).await?;
    Ok(store)
}

/// Validate, resolve the key schema, and load. Shared by `load` and `run`.
pub(crate) async fn execute_job(config: &JobConfig, options: &ExecutionOptions) -> Result<()> {
    validator::validate_job(config)?;

    let mut store = connect_store(config).await?;
    let key_schema = resolve_key_schema(config, &store).await?;

    tracing::info!(
        job = config.job,
        table = config.destination.table,
        mode = %config.destination.mode,
        key = %key_schema,
        dry_run = options.dry_run,
        "Job validated"
    );

    let mut status = ConsoleStatus;
    let result = if options.dry_run {
        let mut memory = MemoryStore::new(key_schema.clone());
        run_job(config, key_schema, &mut memory, options, &mut status).await
    } else {
        run_job(config, key_schema, &mut store, options, &mut status).await
    };
    let summary = result.with_context(|| format!("Job '{}' failed", config.job))?;

    print_summary(&summary, options.dry_run);
    Ok(())
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let counts = &summary.counts;
    if dry_run {
        println!("  (dry run: nothing was written to DynamoDB)");
    }
    println!("  Rows read:          {}", counts.rows_read);
    println!("  Duplicates skipped: {}", counts.duplicates_skipped);
    println!("  Conversion skips:   {}", counts.conversion_skipped);
    println!("  Batches written:    {}", summary.batches_written);
    println!("  Duration:           {:.2}s", summary.duration_secs);
    if summary.duration_secs > 0.0 {
        println!(
            "  Throughput:         {:.0} rows/sec",
            counts.rows_processed as f64 / summary.duration_secs
        );
    }
}
