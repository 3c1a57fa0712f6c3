//! Per-row conversion, key extraction, and duplicate suppression.
//!
//! [`RowPipeline`] turns each input [`Row`] into either a write operation or
//! a skip decision. All per-run state (the duplicate set and counters) lives
//! in the pipeline value, so separate runs never share anything.

use std::fmt;

use dynaload_types::{ConversionError, LoadMode, PrimaryKey, Row, WriteOp};

use crate::config::types::{DataErrorPolicy, DuplicatePolicy};
use crate::convert::ColumnPlan;
use crate::dedup::DuplicateTracker;
use crate::errors::LoadError;
use crate::key::extract_key;
use crate::result::RunCounts;

/// Emitted rows between progress lines.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Run-mode switches that shape per-row decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunPolicies {
    pub mode: LoadMode,
    pub on_duplicate: DuplicatePolicy,
    pub on_conversion_error: DataErrorPolicy,
}

impl RunPolicies {
    /// Duplicate keys are tracked when asked for, and always in delete mode.
    #[must_use]
    pub fn tracks_duplicates(&self) -> bool {
        self.mode == LoadMode::Delete || self.on_duplicate == DuplicatePolicy::Skip
    }
}

/// Why a row was not written.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipNotice {
    Duplicate {
        key: PrimaryKey,
    },
    Conversion {
        attribute: String,
        type_tag: String,
        error: ConversionError,
        key: PrimaryKey,
    },
}

impl fmt::Display for SkipNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { key } => write!(f, "Skipping duplicate item: {key}"),
            Self::Conversion {
                attribute,
                type_tag,
                error,
                key,
            } => write!(
                f,
                "Error converting attribute {attribute} to type {type_tag}. {error}. Skipping item: {key}"
            ),
        }
    }
}

/// Outcome of processing one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Emit(WriteOp),
    Skip(SkipNotice),
}

/// Single-threaded per-run row processor.
#[derive(Debug)]
pub struct RowPipeline {
    plan: ColumnPlan,
    key_names: Vec<String>,
    policies: RunPolicies,
    seen: DuplicateTracker,
    counts: RunCounts,
}

impl RowPipeline {
    #[must_use]
    pub fn new(plan: ColumnPlan, key_names: Vec<String>, policies: RunPolicies) -> Self {
        Self {
            plan,
            key_names,
            policies,
            seen: DuplicateTracker::new(),
            counts: RunCounts::default(),
        }
    }

    /// Convert, key-check, and classify one row.
    ///
    /// The key comes from the raw row before conversion so skip notices can
    /// name it.
    ///
    /// # Errors
    ///
    /// [`LoadError::MissingKeyAttribute`] always; [`LoadError::Conversion`]
    /// unless conversion errors are tolerated.
    pub fn process(&mut self, row: &Row) -> Result<RowOutcome, LoadError> {
        self.counts.rows_read += 1;

        let key = extract_key(row, &self.key_names)?;

        let item = match self.plan.convert_row(row) {
            Ok(item) => item,
            Err((attribute, error)) => match self.policies.on_conversion_error {
                DataErrorPolicy::Skip => {
                    self.counts.conversion_skipped += 1;
                    return Ok(RowOutcome::Skip(SkipNotice::Conversion {
                        type_tag: error.type_tag.clone(),
                        attribute,
                        error,
                        key,
                    }));
                }
                DataErrorPolicy::Fail => {
                    return Err(LoadError::Conversion {
                        line: row.line(),
                        attribute,
                        source: error,
                    })
                }
            },
        };

        if self.policies.tracks_duplicates() && !self.seen.check_and_record(key.canonical()) {
            self.counts.duplicates_skipped += 1;
            return Ok(RowOutcome::Skip(SkipNotice::Duplicate { key }));
        }

        Ok(RowOutcome::Emit(match self.policies.mode {
            LoadMode::Delete => WriteOp::Delete(key),
            LoadMode::Insert => WriteOp::Put(item),
        }))
    }

    /// Count a row accepted by the batch writer. Returns the new total when a
    /// progress line is due.
    pub fn record_emitted(&mut self) -> Option<u64> {
        self.counts.rows_processed += 1;
        let processed = self.counts.rows_processed;
        (processed % PROGRESS_INTERVAL == 0).then_some(processed)
    }

    #[must_use]
    pub fn counts(&self) -> RunCounts {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dynaload_types::{AttributeType, TypedValue};

    use super::*;

    fn pipeline(policies: RunPolicies) -> RowPipeline {
        let headers = vec!["id".to_string(), "price".to_string()];
        let declared = BTreeMap::from([("price".to_string(), AttributeType::Number)]);
        RowPipeline::new(
            ColumnPlan::resolve(&headers, &declared),
            vec!["id".to_string()],
            policies,
        )
    }

    fn row(line: u64, id: &str, price: &str) -> Row {
        Row::from_pairs(line, [("id", id), ("price", price)])
    }

    #[test]
    fn insert_mode_emits_typed_put() {
        let mut p = pipeline(RunPolicies::default());
        let RowOutcome::Emit(WriteOp::Put(item)) = p.process(&row(2, "1", "19.99")).unwrap() else {
            panic!("expected put");
        };
        assert_eq!(item.get("id"), Some(&TypedValue::Text("1".into())));
        assert_eq!(
            item.get("price").and_then(TypedValue::number_text).as_deref(),
            Some("19.99")
        );
    }

    #[test]
    fn duplicates_pass_through_by_default() {
        let mut p = pipeline(RunPolicies::default());
        assert!(matches!(p.process(&row(2, "1", "1")).unwrap(), RowOutcome::Emit(_)));
        assert!(matches!(p.process(&row(3, "1", "2")).unwrap(), RowOutcome::Emit(_)));
        assert_eq!(p.counts().duplicates_skipped, 0);
    }

    #[test]
    fn duplicates_skipped_when_requested() {
        let mut p = pipeline(RunPolicies {
            on_duplicate: DuplicatePolicy::Skip,
            ..RunPolicies::default()
        });
        assert!(matches!(p.process(&row(2, "1", "1")).unwrap(), RowOutcome::Emit(_)));
        let outcome = p.process(&row(3, "1", "2")).unwrap();
        let RowOutcome::Skip(notice) = outcome else {
            panic!("expected skip");
        };
        assert_eq!(notice.to_string(), r#"Skipping duplicate item: {"id":"1"}"#);
        assert_eq!(p.counts().duplicates_skipped, 1);
    }

    #[test]
    fn delete_mode_always_dedups_and_emits_keys() {
        let mut p = pipeline(RunPolicies {
            mode: LoadMode::Delete,
            ..RunPolicies::default()
        });
        let RowOutcome::Emit(WriteOp::Delete(key)) = p.process(&row(2, "1", "5")).unwrap() else {
            panic!("expected delete");
        };
        assert_eq!(key.iter().collect::<Vec<_>>(), vec![("id", "1")]);
        assert!(matches!(
            p.process(&row(3, "1", "5")).unwrap(),
            RowOutcome::Skip(SkipNotice::Duplicate { .. })
        ));
    }

    #[test]
    fn conversion_error_fails_by_default() {
        let mut p = pipeline(RunPolicies::default());
        let err = p.process(&row(4, "1", "abc")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Conversion { line: 4, ref attribute, .. } if attribute == "price"
        ));
    }

    #[test]
    fn conversion_error_skips_when_tolerated() {
        let mut p = pipeline(RunPolicies {
            on_conversion_error: DataErrorPolicy::Skip,
            ..RunPolicies::default()
        });
        let RowOutcome::Skip(notice) = p.process(&row(4, "9", "abc")).unwrap() else {
            panic!("expected skip");
        };
        let text = notice.to_string();
        assert!(text.starts_with("Error converting attribute price to type number."), "got: {text}");
        assert!(text.ends_with(r#"Skipping item: {"id":"9"}"#), "got: {text}");
        assert_eq!(p.counts().conversion_skipped, 1);
    }

    #[test]
    fn skipped_conversion_does_not_record_key() {
        let mut p = pipeline(RunPolicies {
            on_duplicate: DuplicatePolicy::Skip,
            on_conversion_error: DataErrorPolicy::Skip,
            ..RunPolicies::default()
        });
        assert!(matches!(p.process(&row(2, "1", "bad")).unwrap(), RowOutcome::Skip(_)));
        assert!(matches!(p.process(&row(3, "1", "2")).unwrap(), RowOutcome::Emit(_)));
    }

    #[test]
    fn missing_key_is_fatal_even_when_tolerant() {
        let mut p = RowPipeline::new(
            ColumnPlan::default(),
            vec!["pk".to_string()],
            RunPolicies {
                on_conversion_error: DataErrorPolicy::Skip,
                on_duplicate: DuplicatePolicy::Skip,
                ..RunPolicies::default()
            },
        );
        let err = p.process(&row(2, "1", "1")).unwrap_err();
        assert!(matches!(err, LoadError::MissingKeyAttribute { .. }));
    }

    #[test]
    fn progress_due_every_hundred_rows() {
        let mut p = pipeline(RunPolicies::default());
        let due: Vec<u64> = (0..250).filter_map(|_| p.record_emitted()).collect();
        assert_eq!(due, vec![100, 200]);
        assert_eq!(p.counts().rows_processed, 250);
    }
}
