//! Streaming CSV row reader.
//!
//! UTF-8 input streams straight from the file. Any other encoding is decoded
//! into memory first, since the CSV parser only understands UTF-8.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::UTF_8;

use dynaload_types::Row;

use crate::encoding::{self, EncodingChoice, SNIFF_BYTES};
use crate::errors::LoadError;

/// Yields one [`Row`] per CSV record, keyed by the header line.
pub struct RowReader<R> {
    inner: csv::Reader<R>,
    headers: Arc<[String]>,
    record: StringRecord,
}

impl<R: Read> RowReader<R> {
    /// Wrap a UTF-8 byte source. The first record is the header.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Csv`] if the header cannot be read.
    pub fn from_reader(source: R, delimiter: u8) -> Result<Self, LoadError> {
        let mut inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        let headers: Vec<String> = inner.headers()?.iter().map(str::to_string).collect();
        Ok(Self {
            inner,
            headers: headers.into(),
            record: StringRecord::new(),
        })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map_or(0, csv::Position::line);
                if self.record.len() > self.headers.len() {
                    tracing::debug!(
                        line,
                        extra = self.record.len() - self.headers.len(),
                        "Dropping cells beyond the header width"
                    );
                }
                let values = self
                    .record
                    .iter()
                    .take(self.headers.len())
                    .map(|v| Some(v.to_string()))
                    .collect();
                Some(Ok(Row::new(line, Arc::clone(&self.headers), values)))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Open a CSV file, detecting or applying the requested encoding.
///
/// # Errors
///
/// Returns an error for unknown encoding labels, unreadable files, or an
/// unreadable header.
pub fn open_path(
    path: &Path,
    delimiter: u8,
    encoding_label: &str,
) -> Result<RowReader<Box<dyn Read>>, LoadError> {
    let choice = encoding::resolve_label(encoding_label)
        .ok_or_else(|| LoadError::Config(format!("Unknown encoding '{encoding_label}'")))?;

    let mut file = File::open(path)?;
    let mut sample = Vec::with_capacity(SNIFF_BYTES);
    (&mut file).take(SNIFF_BYTES as u64).read_to_end(&mut sample)?;

    let encoding = match choice {
        EncodingChoice::Auto => encoding::detect(&sample),
        EncodingChoice::Fixed(encoding) => encoding,
    };
    tracing::info!(
        path = %path.display(),
        encoding = encoding.name(),
        "Opened CSV input"
    );

    let source: Box<dyn Read> = if encoding == UTF_8 {
        Box::new(Cursor::new(sample).chain(file))
    } else {
        let mut bytes = sample;
        file.read_to_end(&mut bytes)?;
        let (decoded, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            tracing::warn!(
                encoding = encoding.name(),
                "Input contained malformed sequences, replaced with U+FFFD"
            );
        }
        Box::new(Cursor::new(decoded.into_owned().into_bytes()))
    };

    RowReader::from_reader(source, delimiter)
}
