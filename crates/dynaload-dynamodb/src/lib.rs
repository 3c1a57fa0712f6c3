//! DynamoDB implementation of the dynaload table store.
//!
//! Wraps `aws-sdk-dynamodb`: key schema comes from `DescribeTable`, writes go
//! through `BatchWriteItem` with unprocessed items resubmitted under
//! exponential backoff.

pub mod attr;
pub mod client;
pub mod config;
pub mod errors;
pub mod retry;
pub mod store;

pub use config::Config;
pub use store::DynamoStore;
