//! Table store contract and an in-memory implementation.
//!
//! [`TableStore`] is the seam between the load pipeline and the remote
//! key-value table. Implementations own their own retry policy: a call that
//! returns `Err` has already been retried as far as the implementation is
//! willing to go.

use std::collections::{BTreeMap, HashSet};

use dynaload_types::{CanonicalKey, KeySchema, PrimaryKey, StoreError, TypedItem, TypedValue, WriteOp};

/// Largest batch accepted by DynamoDB `BatchWriteItem`.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Storage contract for a remote key-value table.
#[allow(async_fn_in_trait)]
pub trait TableStore {
    /// Key schema of `table`, fetched once per run.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the table cannot be described.
    async fn key_schema(&self, table: &str) -> Result<KeySchema, StoreError>;

    /// Submit one batch of at most [`TableStore::max_batch_size`] operations.
    ///
    /// Must either apply every operation or return an error; partially
    /// applied batches are reported, never silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection, throttling, or transport failure.
    async fn write_batch(&mut self, table: &str, ops: &[WriteOp]) -> Result<(), StoreError>;

    /// Upper bound on operations per [`TableStore::write_batch`] call.
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_WRITE_ITEMS
    }
}

/// In-memory table used for dry runs and tests.
///
/// Applies puts and deletes to a map keyed by canonical primary key and
/// remembers every submitted batch. Like DynamoDB, it rejects a batch that
/// names the same key twice.
#[derive(Debug, Default)]
pub struct MemoryStore {
    key_schema: KeySchema,
    items: BTreeMap<CanonicalKey, TypedItem>,
    batches: Vec<Vec<WriteOp>>,
    failure: Option<(usize, StoreError)>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(key_schema: KeySchema) -> Self {
        Self {
            key_schema,
            ..Self::default()
        }
    }

    /// Fail the batch with zero-based index `batch_index` (and every later
    /// one) with `error`.
    #[must_use]
    pub fn failing_at(mut self, batch_index: usize, error: StoreError) -> Self {
        self.failure = Some((batch_index, error));
        self
    }

    /// Batches accepted so far, in submission order.
    #[must_use]
    pub fn batches(&self) -> &[Vec<WriteOp>] {
        &self.batches
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, key: &PrimaryKey) -> Option<&TypedItem> {
        self.items.get(&key.canonical())
    }

    /// Key of a put item, using the textual form of each key attribute.
    fn item_key(&self, item: &TypedItem) -> Result<PrimaryKey, StoreError> {
        let mut attributes = Vec::new();
        for name in self.key_schema.names() {
            let text = match item.get(name) {
                Some(TypedValue::Text(s)) => s.clone(),
                Some(TypedValue::Boolean(b)) => b.to_string(),
                Some(value @ (TypedValue::Decimal(_) | TypedValue::Integer(_))) => {
                    value.number_text().unwrap_or_default()
                }
                Some(TypedValue::Json(v)) => v.to_string(),
                Some(TypedValue::Null) | None => {
                    return Err(StoreError::Rejected {
                        message: format!("item is missing key attribute '{name}'"),
                    })
                }
            };
            attributes.push((name.to_string(), text));
        }
        Ok(PrimaryKey::new(attributes))
    }
}

impl TableStore for MemoryStore {
    async fn key_schema(&self, _table: &str) -> Result<KeySchema, StoreError> {
        Ok(self.key_schema.clone())
    }

    async fn write_batch(&mut self, _table: &str, ops: &[WriteOp]) -> Result<(), StoreError> {
        if let Some((index, error)) = &self.failure {
            if self.batches.len() >= *index {
                return Err(error.clone());
            }
        }
        if ops.len() > self.max_batch_size() {
            return Err(StoreError::Rejected {
                message: format!(
                    "batch of {} exceeds the limit of {}",
                    ops.len(),
                    self.max_batch_size()
                ),
            });
        }

        // Validate the whole batch before applying any of it.
        let keyed = ops
            .iter()
            .map(|op| match op {
                WriteOp::Put(item) => self.item_key(item).map(|key| (key.canonical(), Some(item))),
                WriteOp::Delete(key) => Ok((key.canonical(), None)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut seen = HashSet::with_capacity(keyed.len());
        if let Some((key, _)) = keyed.iter().find(|(key, _)| !seen.insert(key)) {
            return Err(StoreError::Rejected {
                message: format!("batch contains duplicate key {key}"),
            });
        }

        for (key, item) in keyed {
            match item {
                Some(item) => {
                    self.items.insert(key, item.clone());
                }
                None => {
                    self.items.remove(&key);
                }
            }
        }
        self.batches.push(ops.to_vec());
        Ok(())
    }
}
