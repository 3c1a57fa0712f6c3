use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dynaload_engine::config::types::{
    DataErrorPolicy, DestinationConfig, DuplicatePolicy, JobConfig, JobPolicies, SourceConfig,
    DEFAULT_BATCH_SIZE,
};
use dynaload_engine::ExecutionOptions;
use dynaload_types::{AttributeType, LoadMode};

/// Flags for a one-off load without a job file.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Path to the CSV file
    #[arg(long)]
    pub csv_file: PathBuf,
    /// CSV delimiter
    #[arg(long, default_value = ",")]
    pub csv_delimiter: String,
    /// DynamoDB table name
    #[arg(long)]
    pub dynamodb_table_name: String,
    /// Delete the rows' keys instead of inserting items
    #[arg(long)]
    pub delete_mode: bool,
    /// JSON object mapping attributes to types, e.g. '{"age": "number", "is_active": "boolean"}'
    #[arg(long)]
    pub attribute_types: Option<String>,
    /// Skip rows whose primary key was already seen
    #[arg(long)]
    pub ignore_duplicates: bool,
    /// Skip rows with conversion errors instead of aborting
    #[arg(long)]
    pub ignore_conversion_errors: bool,
    /// Primary key attribute names; skips the DescribeTable lookup
    #[arg(long, value_delimiter = ',')]
    pub primary_key: Vec<String>,
    /// Input encoding label, or "auto" to detect
    #[arg(long, default_value = "auto")]
    pub encoding: String,
    /// Items per BatchWriteItem request (1-25)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    /// AWS Access Key ID
    #[arg(long)]
    pub aws_access_key: Option<String>,
    /// AWS Secret Access Key
    #[arg(long)]
    pub aws_secret_key: Option<String>,
    /// AWS Session Token
    #[arg(long)]
    pub aws_session_token: Option<String>,
    /// AWS Region
    #[arg(long)]
    pub aws_region: Option<String>,
    /// Custom DynamoDB endpoint, e.g. http://localhost:8000
    #[arg(long)]
    pub endpoint_url: Option<String>,
    /// Resolve the key schema but write to an in-memory table
    #[arg(long)]
    pub dry_run: bool,
    /// Maximum rows to read from the CSV file
    #[arg(long)]
    pub limit: Option<u64>,
}

/// Execute the `load` command.
pub async fn execute(args: &LoadArgs) -> Result<()> {
    let config = job_from_args(args)?;
    let options = ExecutionOptions {
        dry_run: args.dry_run,
        limit: args.limit,
    };
    super::execute_job(&config, &options).await
}

/// Translate flags into the same job shape a YAML file produces.
fn job_from_args(args: &LoadArgs) -> Result<JobConfig> {
    let attribute_types: BTreeMap<String, AttributeType> = match &args.attribute_types {
        Some(json) => serde_json::from_str(json)
            .context("--attribute-types must be a JSON object of attribute name to type")?,
        None => BTreeMap::new(),
    };

    let mut store = serde_json::Map::new();
    let optional = [
        ("region", &args.aws_region),
        ("endpoint_url", &args.endpoint_url),
        ("access_key_id", &args.aws_access_key),
        ("secret_access_key", &args.aws_secret_key),
        ("session_token", &args.aws_session_token),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            store.insert(name.to_string(), serde_json::Value::String(value.clone()));
        }
    }

    Ok(JobConfig {
        version: "1.0".to_string(),
        job: format!("load_{}", args.dynamodb_table_name),
        source: SourceConfig {
            path: args.csv_file.clone(),
            delimiter: args.csv_delimiter.clone(),
            encoding: args.encoding.clone(),
            attribute_types,
        },
        destination: DestinationConfig {
            table: args.dynamodb_table_name.clone(),
            mode: if args.delete_mode {
                LoadMode::Delete
            } else {
                LoadMode::Insert
            },
            batch_size: args.batch_size,
            primary_key: args.primary_key.clone(),
            config: serde_json::Value::Object(store),
        },
        policies: JobPolicies {
            on_duplicate: if args.ignore_duplicates {
                DuplicatePolicy::Skip
            } else {
                DuplicatePolicy::Keep
            },
            on_conversion_error: if args.ignore_conversion_errors {
                DataErrorPolicy::Skip
            } else {
                DataErrorPolicy::Fail
            },
        },
    })
}
