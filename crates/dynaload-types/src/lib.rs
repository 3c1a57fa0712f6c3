//! Shared dynaload model types.
//!
//! Rows as read from CSV, typed values after conversion, primary keys and
//! the write operations handed to a table store. Kept free of I/O so the
//! engine and storage crates can share them.

pub mod error;
pub mod key;
pub mod op;
pub mod row;
pub mod value;

pub use error::{ConversionError, StoreError};
pub use key::{CanonicalKey, KeyAttribute, KeyRole, KeySchema, PrimaryKey};
pub use op::{LoadMode, WriteOp};
pub use row::Row;
pub use value::{AttributeType, ExactDecimal, TypedItem, TypedValue};
