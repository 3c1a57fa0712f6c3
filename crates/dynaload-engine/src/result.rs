//! Load run result types.

use dynaload_types::LoadMode;

/// Row counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// Rows read from the input.
    pub rows_read: u64,
    /// Rows handed to the batch writer.
    pub rows_processed: u64,
    pub duplicates_skipped: u64,
    pub conversion_skipped: u64,
}

/// Result of a completed load run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub table: String,
    pub mode: LoadMode,
    pub counts: RunCounts,
    pub batches_written: u64,
    pub duration_secs: f64,
}

impl RunSummary {
    /// Final status line, e.g.
    /// `Finished: 250 rows processed and inserted into DynamoDB table users`.
    #[must_use]
    pub fn finished_line(&self) -> String {
        format!(
            "Finished: {} rows processed and {} into DynamoDB table {}",
            self.counts.rows_processed,
            self.mode.past_tense(),
            self.table
        )
    }
}
