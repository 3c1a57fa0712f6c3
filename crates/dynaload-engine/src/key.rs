//! Primary-key extraction from raw rows.

use dynaload_types::{PrimaryKey, Row};

use crate::errors::LoadError;

/// Collect the raw values of the key attributes, in key-schema order.
///
/// Values are taken from the unconverted row so that dedup and deletes see
/// exactly what the file says.
///
/// # Errors
///
/// Returns [`LoadError::MissingKeyAttribute`] when the header has no such
/// column or the line is too short to carry it.
pub fn extract_key<S: AsRef<str>>(row: &Row, key_names: &[S]) -> Result<PrimaryKey, LoadError> {
    let mut attributes = Vec::with_capacity(key_names.len());
    for name in key_names {
        let name = name.as_ref();
        match row.get(name) {
            Some(Some(value)) => attributes.push((name.to_string(), value.to_string())),
            Some(None) | None => {
                return Err(LoadError::MissingKeyAttribute {
                    line: row.line(),
                    attribute: name.to_string(),
                })
            }
        }
    }
    Ok(PrimaryKey::new(attributes))
}
