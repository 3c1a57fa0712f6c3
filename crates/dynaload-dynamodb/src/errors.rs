//! SDK error classification.
//!
//! Every SDK failure is folded into a [`StoreError`] so the load pipeline can
//! report it without knowing about AWS types.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use dynaload_types::StoreError;

/// Service error codes that mean "slow down".
const THROTTLING_CODES: [&str; 3] = [
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "ThrottlingException",
];

const TABLE_NOT_FOUND_CODE: &str = "ResourceNotFoundException";

/// Map a service error code (if any) to a store error.
#[must_use]
pub fn classify_code(table: &str, code: Option<&str>, message: String) -> StoreError {
    match code {
        Some(code) if THROTTLING_CODES.contains(&code) => StoreError::Throttled { message },
        Some(TABLE_NOT_FOUND_CODE) => StoreError::TableNotFound {
            table: table.to_string(),
        },
        _ => StoreError::Rejected { message },
    }
}

/// Classify an SDK failure. Transport-level failures (timeouts, dispatch
/// errors, unparseable responses) become [`StoreError::Transport`].
pub fn from_sdk_error<E, R>(table: &str, err: &SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + Error + 'static,
    R: Debug,
{
    let message = DisplayErrorContext(err).to_string();
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Transport { message }
        }
        _ => classify_code(table, err.code(), message),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ProvisionedThroughputExceededException")]
    #[case("RequestLimitExceeded")]
    #[case("ThrottlingException")]
    fn throttling_codes_are_throttled(#[case] code: &str) {
        let err = classify_code("t", Some(code), "slow down".into());
        assert!(matches!(err, StoreError::Throttled { .. }));
        assert!(err.is_throttling());
    }

    #[test]
    fn missing_table_names_the_table() {
        let err = classify_code("users", Some("ResourceNotFoundException"), String::new());
        assert_eq!(
            err,
            StoreError::TableNotFound {
                table: "users".into()
            }
        );
    }

    #[test]
    fn other_codes_are_rejections() {
        let err = classify_code("t", Some("ValidationException"), "bad key".into());
        assert_eq!(
            err,
            StoreError::Rejected {
                message: "bad key".into()
            }
        );
        assert!(matches!(
            classify_code("t", None, "?".into()),
            StoreError::Rejected { .. }
        ));
    }
}
