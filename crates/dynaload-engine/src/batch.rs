//! Bounded batch buffering in front of a [`TableStore`].
//!
//! Operations arriving here have already been converted and deduplicated;
//! the writer only groups and submits them. It never retries: a failed batch
//! surfaces as [`LoadError::BackendWrite`] and ends the run.

use dynaload_types::WriteOp;

use crate::errors::LoadError;
use crate::store::TableStore;

/// Totals reported by [`BatchWriter::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub batches_written: u64,
    pub ops_written: u64,
}

/// Buffers write operations and flushes them in batches of at most `limit`.
pub struct BatchWriter<'s, S: TableStore> {
    store: &'s mut S,
    table: String,
    limit: usize,
    buffer: Vec<WriteOp>,
    stats: WriteStats,
}

impl<'s, S: TableStore> BatchWriter<'s, S> {
    /// `batch_size` is clamped to the store's own maximum and to at least 1.
    pub fn new(store: &'s mut S, table: impl Into<String>, batch_size: usize) -> Self {
        let limit = batch_size.clamp(1, store.max_batch_size().max(1));
        Self {
            store,
            table: table.into(),
            limit,
            buffer: Vec::with_capacity(limit),
            stats: WriteStats::default(),
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Operations waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Queue an operation, flushing when the buffer reaches the limit.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::BackendWrite`] if a triggered flush fails.
    pub async fn push(&mut self, op: WriteOp) -> Result<(), LoadError> {
        self.buffer.push(op);
        if self.buffer.len() >= self.limit {
            self.flush().await?;
        }
        Ok(())
    }

    /// Submit everything buffered as one batch.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::BackendWrite`] if the store fails the batch. The
    /// buffer is left intact in that case.
    pub async fn flush(&mut self) -> Result<(), LoadError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let count = self.buffer.len();
        self.store
            .write_batch(&self.table, &self.buffer)
            .await
            .map_err(|source| {
                tracing::error!(
                    table = %self.table,
                    batch = self.stats.batches_written + 1,
                    ops = count,
                    error = %source,
                    "Batch write failed"
                );
                LoadError::BackendWrite {
                    table: self.table.clone(),
                    source,
                }
            })?;

        self.buffer.clear();
        self.stats.batches_written += 1;
        self.stats.ops_written += count as u64;
        tracing::debug!(
            table = %self.table,
            batch = self.stats.batches_written,
            ops = count,
            "Flushed batch"
        );
        Ok(())
    }

    /// Flush the final partial batch and return totals.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::BackendWrite`] if the last flush fails.
    pub async fn finish(mut self) -> Result<WriteStats, LoadError> {
        self.flush().await?;
        Ok(self.stats)
    }
}
