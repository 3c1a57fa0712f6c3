//! Core load pipeline for dynaload.
//!
//! Reads CSV rows, converts cells to typed attributes, suppresses duplicate
//! primary keys when asked to, and submits put/delete operations to a
//! [`TableStore`] in bounded batches.

pub mod batch;
pub mod config;
pub mod convert;
pub mod dedup;
pub(crate) mod encoding;
pub mod errors;
pub mod execution;
pub mod key;
pub mod orchestrator;
pub mod pipeline;
pub mod reader;
pub mod result;
pub mod status;
pub mod store;

// Re-export public API for convenience
pub use errors::LoadError;
pub use execution::ExecutionOptions;
pub use orchestrator::{resolve_key_schema, run_job, run_rows, LoadJob};
pub use result::{RunCounts, RunSummary};
pub use status::{ConsoleStatus, StatusSink};
pub use store::{MemoryStore, TableStore, MAX_BATCH_WRITE_ITEMS};
