//! [`TableStore`] over the DynamoDB API.

use aws_sdk_dynamodb::types::{DeleteRequest, KeyType, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;

use dynaload_engine::TableStore;
use dynaload_types::{KeyAttribute, KeyRole, KeySchema, StoreError, WriteOp};

use crate::config::{Config, ConfigError};
use crate::{attr, client, errors, retry};

/// DynamoDB-backed table store.
///
/// `write_batch` resubmits `UnprocessedItems` with exponential backoff and
/// fails the batch once `unprocessed_retries` resubmissions are used up.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    unprocessed_retries: u32,
}

impl DynamoStore {
    #[must_use]
    pub fn new(client: Client, unprocessed_retries: u32) -> Self {
        Self {
            client,
            unprocessed_retries,
        }
    }

    /// Validate `config` and build a client from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config is inconsistent.
    pub async fn connect(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = client::connect(config).await;
        Ok(Self::new(client, config.unprocessed_retries))
    }
}

/// Build the `BatchWriteItem` request entry for one operation.
///
/// # Errors
///
/// Returns [`StoreError::Rejected`] if the SDK refuses to build the request.
pub fn write_request(op: &WriteOp) -> Result<WriteRequest, StoreError> {
    let request = match op {
        WriteOp::Put(item) => {
            let put = PutRequest::builder()
                .set_item(Some(attr::item_map(item)))
                .build()
                .map_err(|e| StoreError::Rejected {
                    message: e.to_string(),
                })?;
            WriteRequest::builder().put_request(put).build()
        }
        WriteOp::Delete(key) => {
            let delete = DeleteRequest::builder()
                .set_key(Some(attr::key_map(key)))
                .build()
                .map_err(|e| StoreError::Rejected {
                    message: e.to_string(),
                })?;
            WriteRequest::builder().delete_request(delete).build()
        }
    };
    Ok(request)
}

impl TableStore for DynamoStore {
    async fn key_schema(&self, table: &str) -> Result<KeySchema, StoreError> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| errors::from_sdk_error(table, &e))?;
        let description = output.table().ok_or_else(|| StoreError::TableNotFound {
            table: table.to_string(),
        })?;

        let mut attributes: Vec<KeyAttribute> = description
            .key_schema()
            .iter()
            .map(|element| KeyAttribute {
                name: element.attribute_name().to_string(),
                role: match element.key_type() {
                    KeyType::Hash => KeyRole::Hash,
                    _ => KeyRole::Range,
                },
            })
            .collect();
        // Partition key first.
        attributes.sort_by_key(|a| a.role != KeyRole::Hash);
        Ok(KeySchema::new(attributes))
    }

    async fn write_batch(&mut self, table: &str, ops: &[WriteOp]) -> Result<(), StoreError> {
        if ops.is_empty() {
            return Ok(());
        }
        let mut pending = ops
            .iter()
            .map(write_request)
            .collect::<Result<Vec<_>, _>>()?;
        let mut resubmissions: u32 = 0;

        loop {
            let output = self
                .client
                .batch_write_item()
                .request_items(table, pending)
                .send()
                .await
                .map_err(|e| errors::from_sdk_error(table, &e))?;

            let unprocessed = output
                .unprocessed_items()
                .and_then(|items| items.get(table))
                .cloned()
                .unwrap_or_default();
            if unprocessed.is_empty() {
                return Ok(());
            }
            if resubmissions >= self.unprocessed_retries {
                return Err(StoreError::Unprocessed {
                    count: unprocessed.len(),
                    attempts: resubmissions + 1,
                });
            }

            resubmissions += 1;
            let delay = retry::compute_backoff(resubmissions);
            tracing::warn!(
                table,
                unprocessed = unprocessed.len(),
                attempt = resubmissions,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Resubmitting unprocessed items"
            );
            tokio::time::sleep(delay).await;
            pending = unprocessed;
        }
    }
}
