//! Cell conversion from raw CSV text to typed attribute values.

use std::collections::BTreeMap;
use std::str::FromStr;

use num_bigint::BigInt;

use dynaload_types::{AttributeType, ConversionError, ExactDecimal, Row, TypedItem, TypedValue};

/// Values accepted as `true` by the boolean conversion (case-insensitive).
const TRUTHY: [&str; 3] = ["true", "1", "yes"];

/// Convert one cell to its declared type.
///
/// Empty and absent cells become [`TypedValue::Null`] whatever the type.
///
/// # Errors
///
/// Returns [`ConversionError`] when a `number` cell is not a valid numeric
/// literal or a `json` cell is not valid JSON.
pub fn convert(value: Option<&str>, ty: &AttributeType) -> Result<TypedValue, ConversionError> {
    let text = match value {
        None | Some("") => return Ok(TypedValue::Null),
        Some(text) => text,
    };

    match ty {
        AttributeType::String | AttributeType::Unknown(_) => Ok(TypedValue::Text(text.to_string())),
        AttributeType::Number => convert_number(text),
        AttributeType::Boolean => {
            let lowered = text.to_lowercase();
            Ok(TypedValue::Boolean(TRUTHY.contains(&lowered.as_str())))
        }
        AttributeType::Json => serde_json::from_str(text)
            .map(TypedValue::Json)
            .map_err(|e| ConversionError::new(text, ty.tag(), e)),
    }
}

fn convert_number(text: &str) -> Result<TypedValue, ConversionError> {
    let literal = text.trim();
    if literal.contains('.') {
        ExactDecimal::from_str(literal)
            .map(TypedValue::Decimal)
            .map_err(|e| ConversionError::new(text, "number", e))
    } else {
        BigInt::from_str(literal)
            .map(TypedValue::Integer)
            .map_err(|e| ConversionError::new(text, "number", e))
    }
}

/// Declared type of every input column, resolved once per file.
#[derive(Debug, Clone, Default)]
pub struct ColumnPlan {
    types: Vec<AttributeType>,
}

impl ColumnPlan {
    /// Line up declared types with the file's header. Undeclared columns are
    /// strings.
    #[must_use]
    pub fn resolve(headers: &[String], declared: &BTreeMap<String, AttributeType>) -> Self {
        for (name, ty) in declared {
            if !headers.iter().any(|h| h == name) {
                tracing::warn!(attribute = %name, "Declared type for a column missing from the CSV header");
            }
            if !ty.is_known() {
                tracing::warn!(
                    attribute = %name,
                    type_tag = ty.tag(),
                    "Unknown attribute type, values pass through as text"
                );
            }
        }

        let types = headers
            .iter()
            .map(|h| declared.get(h).cloned().unwrap_or_default())
            .collect();
        Self { types }
    }

    #[must_use]
    pub fn type_at(&self, index: usize) -> &AttributeType {
        static DEFAULT: AttributeType = AttributeType::String;
        self.types.get(index).unwrap_or(&DEFAULT)
    }

    /// Convert every cell of `row`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing column name and its [`ConversionError`].
    pub fn convert_row(&self, row: &Row) -> Result<TypedItem, (String, ConversionError)> {
        let mut item = TypedItem::with_capacity(row.len());
        for (i, (name, value)) in row.iter().enumerate() {
            let typed = convert(value, self.type_at(i)).map_err(|e| (name.to_string(), e))?;
            item.insert(name, typed);
        }
        Ok(item)
    }
}
