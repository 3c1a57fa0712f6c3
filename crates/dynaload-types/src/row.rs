//! Raw CSV rows.

use std::sync::Arc;

/// One parsed input line as column name → raw text.
///
/// Headers are shared across all rows of a file. A cell is `None` when the
/// line was shorter than the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: u64,
    headers: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Row {
    /// Build a row. `values` is truncated or padded with `None` to the
    /// header width.
    #[must_use]
    pub fn new(line: u64, headers: Arc<[String]>, mut values: Vec<Option<String>>) -> Self {
        values.resize(headers.len(), None);
        Self {
            line,
            headers,
            values,
        }
    }

    /// Convenience constructor for fully populated rows.
    #[must_use]
    pub fn from_pairs<'a>(line: u64, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let (headers, values): (Vec<String>, Vec<Option<String>>) = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .unzip();
        Self::new(line, headers.into(), values)
    }

    /// 1-based line number in the source file.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    #[must_use]
    pub fn headers(&self) -> &Arc<[String]> {
        &self.headers
    }

    /// Cell lookup by column name.
    ///
    /// Outer `None`: no such column. Inner `None`: the column exists but the
    /// line did not carry the cell. With a repeated header the last column
    /// wins, matching [`crate::TypedItem::insert`].
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        let idx = self.headers.iter().rposition(|h| h == name)?;
        Some(self.values[idx].as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_deref))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
