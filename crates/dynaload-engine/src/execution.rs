//! Execution mode types for load runs.

/// Runtime execution options (not part of job YAML config).
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Resolve the key schema but write to an in-memory table.
    pub dry_run: bool,
    /// Stop after this many input rows.
    pub limit: Option<u64>,
}
