//! Job configuration types, deserialized from job YAML or built from CLI flags.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dynaload_types::{AttributeType, LoadMode};

/// Largest batch the DynamoDB `BatchWriteItem` API accepts.
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// What to do with a row whose primary key was already seen in this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Write every row. A later row for the same key overwrites the earlier
    /// one only if it lands in a later batch; DynamoDB rejects a batch that
    /// repeats a key.
    #[default]
    Keep,
    /// Write the first row for a key and skip the rest.
    Skip,
}

/// How to handle cells that fail type conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataErrorPolicy {
    /// Skip the row and continue.
    Skip,
    /// Abort the run.
    #[default]
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPolicies {
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    #[serde(default)]
    pub on_conversion_error: DataErrorPolicy,
}

/// CSV input settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// `auto` or an encoding label such as `windows-1252`.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub attribute_types: BTreeMap<String, AttributeType>,
}

/// Target table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfig {
    pub table: String,
    #[serde(default)]
    pub mode: LoadMode,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Key attribute names. When set, the table's key schema is not looked up.
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Storage-client settings (region, endpoint, credentials), interpreted
    /// by the store implementation.
    #[serde(default)]
    pub config: serde_json::Value,
}

/// A complete load job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub version: String,
    pub job: String,
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub policies: JobPolicies,
}

impl SourceConfig {
    /// The delimiter as a single byte, if it is exactly one ASCII character.
    #[must_use]
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_encoding() -> String {
    "auto".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
