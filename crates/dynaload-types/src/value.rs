//! Declared attribute types and converted values.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Declared type of a CSV column.
///
/// Resolved once per column when a run starts. Tags outside the known set
/// are kept as [`AttributeType::Unknown`] and pass values through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    #[default]
    String,
    Number,
    Boolean,
    Json,
    Unknown(String),
}

impl AttributeType {
    /// Parse a type tag. Matching is exact, like the tags users pass on the
    /// command line.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "json" => Self::Json,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Json => "json",
            Self::Unknown(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for AttributeType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<AttributeType> for String {
    fn from(ty: AttributeType) -> Self {
        ty.tag().to_string()
    }
}

/// A number written with a decimal point.
///
/// Holds the parsed value alongside the literal it came from; the literal is
/// what goes over the wire, so `0.00000001` never becomes `1E-8`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactDecimal {
    value: BigDecimal,
    literal: String,
}

impl ExactDecimal {
    #[must_use]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.literal
    }
}

impl FromStr for ExactDecimal {
    type Err = ParseBigDecimalError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let value = BigDecimal::from_str(literal)?;
        Ok(Self {
            value,
            literal: literal.to_string(),
        })
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// A single converted cell.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Empty or absent input.
    Null,
    Text(String),
    /// Number written with a decimal point; the source literal is kept.
    Decimal(ExactDecimal),
    Integer(BigInt),
    Boolean(bool),
    /// Parsed JSON document. Numbers inside keep their source digits.
    Json(serde_json::Value),
}

impl TypedValue {
    /// Textual form of a numeric value as it goes over the wire.
    #[must_use]
    pub fn number_text(&self) -> Option<String> {
        match self {
            Self::Decimal(d) => Some(d.as_str().to_string()),
            Self::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

/// A row after per-column conversion, in input column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedItem {
    attributes: Vec<(String, TypedValue)>,
}

impl TypedItem {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            attributes: Vec::with_capacity(capacity),
        }
    }

    /// Append an attribute. A repeated name replaces the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_round_trip() {
        for tag in ["string", "number", "boolean", "json"] {
            let ty = AttributeType::from_tag(tag);
            assert!(ty.is_known());
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let ty = AttributeType::from_tag("date");
        assert_eq!(ty, AttributeType::Unknown("date".into()));
        assert_eq!(ty.to_string(), "date");
        assert!(!ty.is_known());
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(
            AttributeType::from_tag("Number"),
            AttributeType::Unknown("Number".into())
        );
    }

    #[test]
    fn attribute_type_deserializes_from_tag() {
        let ty: AttributeType = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(ty, AttributeType::Boolean);
    }

    #[test]
    fn exact_decimal_keeps_literal() {
        for literal in ["0.00000001", "-0.0", "1.", "1.50E+2", "19.990"] {
            let decimal: ExactDecimal = literal.parse().unwrap();
            assert_eq!(decimal.as_str(), literal);
            assert_eq!(decimal.to_string(), literal);
        }
        let decimal: ExactDecimal = "1.50E+2".parse().unwrap();
        assert_eq!(decimal.value(), &BigDecimal::from(150));
    }

    #[test]
    fn exact_decimal_rejects_garbage() {
        assert!("1.2.3".parse::<ExactDecimal>().is_err());
    }

    #[test]
    fn typed_item_insert_replaces_same_name() {
        let mut item = TypedItem::default();
        item.insert("id", TypedValue::Text("1".into()));
        item.insert("id", TypedValue::Text("2".into()));
        assert_eq!(item.len(), 1);
        assert_eq!(item.get("id"), Some(&TypedValue::Text("2".into())));
    }
}
