//! Error types shared by the engine and storage crates.

/// A cell could not be coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error converting attribute: {value} to type {type_tag}. {cause}")]
pub struct ConversionError {
    /// Original cell text.
    pub value: String,
    /// Requested type tag.
    pub type_tag: String,
    /// Underlying parser message.
    pub cause: String,
}

impl ConversionError {
    #[must_use]
    pub fn new(value: &str, type_tag: &str, cause: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            type_tag: type_tag.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Failures reported by a table store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Capacity or request-rate limits were exceeded and the client gave up.
    #[error("throttled: {message}")]
    Throttled { message: String },

    /// The store refused the request (validation, permissions, ...).
    #[error("rejected: {message}")]
    Rejected { message: String },

    /// Items the store never accepted, even after resubmission.
    #[error("{count} item(s) left unprocessed after {attempts} attempt(s)")]
    Unprocessed { count: usize, attempts: u32 },

    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// Network, timeout, or response-parsing failure.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl StoreError {
    /// True for capacity-related failures.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttled { .. } | Self::Unprocessed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_names_value_type_and_cause() {
        let err = ConversionError::new("abc", "number", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "Error converting attribute: abc to type number. invalid digit found in string"
        );
    }

    #[test]
    fn unprocessed_counts_as_throttling() {
        let err = StoreError::Unprocessed {
            count: 3,
            attempts: 9,
        };
        assert!(err.is_throttling());
        assert!(err.to_string().contains("3 item(s)"));
        assert!(!StoreError::Rejected {
            message: "bad".into()
        }
        .is_throttling());
    }
}
