//! Integration tests for job parsing, validation, and full load runs.
//!
//! Runs use real fixture files and an in-memory table store.

use std::path::PathBuf;

use dynaload_engine::config::parser;
use dynaload_engine::config::types::{DataErrorPolicy, DuplicatePolicy};
use dynaload_engine::config::validator;
use dynaload_engine::{resolve_key_schema, run_job, ExecutionOptions, LoadError, MemoryStore};
use dynaload_types::{KeySchema, LoadMode, PrimaryKey, StoreError, TypedValue, WriteOp};

fn fixture(relative: &str) -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures")
        .join(relative)
}

fn key(id: &str) -> PrimaryKey {
    PrimaryKey::new(vec![("id".into(), id.into())])
}

/// Test parsing and validating the insert job fixture.
#[test]
fn test_parse_and_validate_fixture_job() {
    std::env::set_var("DL_TEST_TABLE", "users");

    let config = parser::parse_job(&fixture("jobs/users_insert.yaml"))
        .expect("Failed to parse fixture job");

    assert_eq!(config.job, "users_insert");
    assert_eq!(config.destination.table, "users");
    assert_eq!(config.destination.mode, LoadMode::Insert);
    assert_eq!(config.destination.batch_size, 2);
    assert_eq!(config.destination.config["region"], "us-east-1");
    assert_eq!(config.policies.on_duplicate, DuplicatePolicy::Skip);
    assert_eq!(config.policies.on_conversion_error, DataErrorPolicy::Skip);
    assert!(config.source.path.ends_with("jobs/../data/users.csv"));

    validator::validate_job(&config).expect("Validation should pass");

    std::env::remove_var("DL_TEST_TABLE");
}

/// Test that an unknown load mode fails at parse time.
#[test]
fn test_parse_invalid_fixture() {
    let result = parser::parse_job(&fixture("jobs/invalid_job.yaml"));
    let err = format!("{:#}", result.expect_err("invalid job should fail to parse"));
    assert!(
        err.contains("unknown variant") && err.contains("Failed to parse job YAML"),
        "Expected serde enum parse error, got: {err}"
    );
}

/// Tolerant insert run: one conversion failure and one duplicate are skipped.
#[tokio::test]
async fn test_insert_job_skips_bad_and_duplicate_rows() {
    let mut config = parser::parse_job_str(
        r#"
version: "1.0"
job: inline_insert
source:
  path: placeholder.csv
  attribute_types:
    age: number
    active: boolean
    profile: json
destination:
  table: users
  batch_size: 2
  primary_key: [id]
policies:
  on_duplicate: skip
  on_conversion_error: skip
"#,
    )
    .unwrap();
    config.source.path = fixture("data/users.csv");
    validator::validate_job(&config).unwrap();

    let mut store = MemoryStore::new(KeySchema::from_names(&["id"]));
    let schema = resolve_key_schema(&config, &store).await.unwrap();
    let mut lines: Vec<String> = Vec::new();
    let summary = run_job(
        &config,
        schema,
        &mut store,
        &ExecutionOptions::default(),
        &mut lines,
    )
    .await
    .unwrap();

    assert_eq!(summary.counts.rows_read, 5);
    assert_eq!(summary.counts.rows_processed, 3);
    assert_eq!(summary.counts.conversion_skipped, 1);
    assert_eq!(summary.counts.duplicates_skipped, 1);
    assert_eq!(summary.batches_written, 2);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(
        "Error converting attribute age to type number. Error converting attribute: n/a to type number."
    ));
    assert!(lines[0].ends_with(r#"Skipping item: {"id":"2"}"#));
    assert_eq!(lines[1], r#"Skipping duplicate item: {"id":"1"}"#);
    assert_eq!(
        lines[2],
        "Finished: 3 rows processed and inserted into DynamoDB table users"
    );

    let alice = store.get(&key("1")).unwrap();
    assert_eq!(alice.get("name"), Some(&TypedValue::Text("alice".into())));
    let TypedValue::Json(profile) = alice.get("profile").unwrap() else {
        panic!("profile should be json");
    };
    assert_eq!(profile["tier"], "gold");
    assert_eq!(profile["score"].to_string(), "1.50");

    let dave = store.get(&key("4")).unwrap();
    assert_eq!(
        dave.get("age").and_then(TypedValue::number_text).as_deref(),
        Some("41.0")
    );
    assert_eq!(dave.get("active"), Some(&TypedValue::Boolean(false)));
    assert_eq!(dave.get("profile"), Some(&TypedValue::Json(serde_json::Value::Null)));
}

/// Delete fixture: five rows with one repeated key become four deletes.
#[tokio::test]
async fn test_delete_job_emits_distinct_keys() {
    let config = parser::parse_job(&fixture("jobs/users_delete.yaml")).unwrap();
    validator::validate_job(&config).unwrap();

    let mut store = MemoryStore::new(KeySchema::from_names(&["id"]));
    let schema = resolve_key_schema(&config, &store).await.unwrap();
    let mut lines: Vec<String> = Vec::new();
    let summary = run_job(
        &config,
        schema,
        &mut store,
        &ExecutionOptions::default(),
        &mut lines,
    )
    .await
    .unwrap();

    assert_eq!(summary.counts.rows_processed, 4);
    assert_eq!(summary.counts.duplicates_skipped, 1);
    let deleted: Vec<String> = store
        .batches()
        .iter()
        .flatten()
        .map(|op| match op {
            WriteOp::Delete(key) => key.to_string(),
            WriteOp::Put(_) => panic!("delete run emitted a put"),
        })
        .collect();
    assert_eq!(
        deleted,
        vec![
            r#"{"id":"1"}"#,
            r#"{"id":"2"}"#,
            r#"{"id":"3"}"#,
            r#"{"id":"4"}"#
        ]
    );
    assert_eq!(
        lines.last().unwrap(),
        "Finished: 4 rows processed and deleted into DynamoDB table users"
    );
}

/// Strict run aborts on the first unconvertible row.
#[tokio::test]
async fn test_strict_conversion_aborts_run() {
    let mut config = parser::parse_job_str(
        r#"
version: "1.0"
job: strict
source:
  path: placeholder.csv
  attribute_types:
    age: number
destination:
  table: users
  batch_size: 1
  primary_key: [id]
"#,
    )
    .unwrap();
    config.source.path = fixture("data/users.csv");

    let mut store = MemoryStore::new(KeySchema::from_names(&["id"]));
    let schema = resolve_key_schema(&config, &store).await.unwrap();
    let err = run_job(
        &config,
        schema,
        &mut store,
        &ExecutionOptions::default(),
        &mut Vec::<String>::new(),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, LoadError::Conversion { line: 3, ref attribute, .. } if attribute == "age"),
        "got: {err}"
    );
    // Row 1 went out in its own batch before the failure.
    assert_eq!(store.item_count(), 1);
}

/// A throttled batch fails the run instead of being dropped.
#[tokio::test]
async fn test_backend_failure_escalates() {
    let config = parser::parse_job(&fixture("jobs/users_delete.yaml")).unwrap();
    let mut store = MemoryStore::new(KeySchema::from_names(&["id"])).failing_at(
        0,
        StoreError::Throttled {
            message: "ProvisionedThroughputExceededException: rate exceeded".into(),
        },
    );
    let schema = resolve_key_schema(&config, &store).await.unwrap();
    let err = run_job(
        &config,
        schema,
        &mut store,
        &ExecutionOptions::default(),
        &mut Vec::<String>::new(),
    )
    .await
    .unwrap_err();

    assert!(err.is_throttling());
    assert!(err.to_string().contains("batch write to table 'users' failed"));
    assert!(store.batches().is_empty());
}

/// A missing input file is an i/o error, not a panic.
#[tokio::test]
async fn test_missing_input_file() {
    let mut config = parser::parse_job(&fixture("jobs/users_delete.yaml")).unwrap();
    config.source.path = fixture("data/does_not_exist.csv");
    let mut store = MemoryStore::new(KeySchema::from_names(&["id"]));
    let err = run_job(
        &config,
        KeySchema::from_names(&["id"]),
        &mut store,
        &ExecutionOptions::default(),
        &mut Vec::<String>::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}
