//! Load orchestration: resolve the key schema, stream rows through the
//! pipeline, and drive the batch writer.

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Instant;

use dynaload_types::{AttributeType, KeySchema};

use crate::batch::BatchWriter;
use crate::config::types::JobConfig;
use crate::convert::ColumnPlan;
use crate::errors::LoadError;
use crate::execution::ExecutionOptions;
use crate::pipeline::{RowOutcome, RowPipeline, RunPolicies};
use crate::reader::{self, RowReader};
use crate::result::RunSummary;
use crate::status::StatusSink;
use crate::store::TableStore;

/// Everything a run needs once configuration and key schema are resolved.
#[derive(Debug, Clone)]
pub struct LoadJob {
    pub table: String,
    pub key_schema: KeySchema,
    pub attribute_types: BTreeMap<String, AttributeType>,
    pub policies: RunPolicies,
    pub batch_size: usize,
    pub limit: Option<u64>,
}

impl LoadJob {
    #[must_use]
    pub fn from_config(config: &JobConfig, key_schema: KeySchema, options: &ExecutionOptions) -> Self {
        Self {
            table: config.destination.table.clone(),
            key_schema,
            attribute_types: config.source.attribute_types.clone(),
            policies: RunPolicies {
                mode: config.destination.mode,
                on_duplicate: config.policies.on_duplicate,
                on_conversion_error: config.policies.on_conversion_error,
            },
            batch_size: config.destination.batch_size,
            limit: options.limit,
        }
    }
}

/// Key schema from the job's `primary_key` override, or from the store.
///
/// # Errors
///
/// Returns [`LoadError::KeySchema`] if the store lookup fails or reports no
/// key attributes.
pub async fn resolve_key_schema<S: TableStore>(
    config: &JobConfig,
    store: &S,
) -> Result<KeySchema, LoadError> {
    let table = &config.destination.table;
    if !config.destination.primary_key.is_empty() {
        let schema = KeySchema::from_names(config.destination.primary_key.as_slice());
        tracing::info!(table = %table, key = %schema, "Using configured primary key");
        return Ok(schema);
    }

    let schema = store
        .key_schema(table)
        .await
        .map_err(|source| LoadError::KeySchema {
            table: table.clone(),
            source,
        })?;
    if schema.is_empty() {
        return Err(LoadError::KeySchema {
            table: table.clone(),
            source: dynaload_types::StoreError::Rejected {
                message: "table reports an empty key schema".to_string(),
            },
        });
    }
    tracing::info!(table = %table, key = %schema, "Resolved table key schema");
    Ok(schema)
}

/// Open the job's CSV input and load it into `store`.
///
/// # Errors
///
/// Returns [`LoadError`] for unreadable input, intolerable row errors, or a
/// failed batch write.
pub async fn run_job<S: TableStore>(
    config: &JobConfig,
    key_schema: KeySchema,
    store: &mut S,
    options: &ExecutionOptions,
    status: &mut dyn StatusSink,
) -> Result<RunSummary, LoadError> {
    let delimiter = config.source.delimiter_byte().ok_or_else(|| {
        LoadError::Config(format!(
            "Delimiter '{}' must be exactly one ASCII character",
            config.source.delimiter.escape_debug()
        ))
    })?;
    let rows = reader::open_path(&config.source.path, delimiter, &config.source.encoding)?;
    let job = LoadJob::from_config(config, key_schema, options);
    run_rows(rows, &job, store, status).await
}

/// Stream `rows` through conversion and dedup into batched writes.
///
/// Rows are handled strictly one after another. On a fatal error the run
/// stops at once: batches already flushed stay written, the partial buffer
/// is dropped.
///
/// # Errors
///
/// Returns the first fatal [`LoadError`].
pub async fn run_rows<R: Read, S: TableStore>(
    rows: RowReader<R>,
    job: &LoadJob,
    store: &mut S,
    status: &mut dyn StatusSink,
) -> Result<RunSummary, LoadError> {
    let started = Instant::now();
    let plan = ColumnPlan::resolve(rows.headers(), &job.attribute_types);
    let key_names: Vec<String> = job.key_schema.names().map(str::to_string).collect();
    let mut pipeline = RowPipeline::new(plan, key_names, job.policies);
    let mut writer = BatchWriter::new(store, job.table.clone(), job.batch_size);

    tracing::info!(
        table = %job.table,
        mode = %job.policies.mode,
        batch_size = writer.limit(),
        track_duplicates = job.policies.tracks_duplicates(),
        "Starting load"
    );

    for row in rows {
        if job.limit.is_some_and(|limit| pipeline.counts().rows_read >= limit) {
            tracing::info!(limit = job.limit, "Row limit reached");
            break;
        }
        let row = row?;
        match pipeline.process(&row)? {
            RowOutcome::Emit(op) => {
                writer.push(op).await?;
                if let Some(processed) = pipeline.record_emitted() {
                    status.line(&format!("{processed} rows processed"));
                }
            }
            RowOutcome::Skip(notice) => {
                tracing::warn!(line = row.line(), "{notice}");
                status.line(&notice.to_string());
            }
        }
    }

    let stats = writer.finish().await?;
    let summary = RunSummary {
        table: job.table.clone(),
        mode: job.policies.mode,
        counts: pipeline.counts(),
        batches_written: stats.batches_written,
        duration_secs: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        table = %summary.table,
        rows = summary.counts.rows_processed,
        batches = summary.batches_written,
        "Load finished"
    );
    status.line(&summary.finished_line());
    Ok(summary)
}
