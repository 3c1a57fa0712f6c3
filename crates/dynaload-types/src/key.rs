//! Table key schema and primary-key values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a key attribute in the table's key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    /// Partition key.
    Hash,
    /// Sort key.
    Range,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => f.write_str("HASH"),
            Self::Range => f.write_str("RANGE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    pub role: KeyRole,
}

/// Ordered primary-key attributes of a table, as the store reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    attributes: Vec<KeyAttribute>,
}

impl KeySchema {
    #[must_use]
    pub fn new(attributes: Vec<KeyAttribute>) -> Self {
        Self { attributes }
    }

    /// Schema from bare names: the first is the partition key, any second
    /// one the sort key.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let attributes = names
            .iter()
            .enumerate()
            .map(|(i, name)| KeyAttribute {
                name: name.as_ref().to_string(),
                role: if i == 0 { KeyRole::Hash } else { KeyRole::Range },
            })
            .collect();
        Self { attributes }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    #[must_use]
    pub fn attributes(&self) -> &[KeyAttribute] {
        &self.attributes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} ({})", attr.name, attr.role)?;
        }
        Ok(())
    }
}

/// Order-independent serialization of a primary key, used for set membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw (unconverted) key attribute values of one row, in key-schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    attributes: Vec<(String, String)>,
}

impl PrimaryKey {
    #[must_use]
    pub fn new(attributes: Vec<(String, String)>) -> Self {
        Self { attributes }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// JSON object with names sorted, so schema order never matters.
    #[must_use]
    pub fn canonical(&self) -> CanonicalKey {
        // serde_json::Map is a BTreeMap without `preserve_order`.
        let map: serde_json::Map<String, serde_json::Value> = self
            .attributes
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::Value::String(v.clone())))
            .collect();
        CanonicalKey(serde_json::Value::Object(map).to_string())
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.canonical().fmt(f)
    }
}
