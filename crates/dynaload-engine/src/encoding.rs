//! Input character-encoding selection.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Bytes inspected when guessing the encoding of a file.
pub(crate) const SNIFF_BYTES: usize = 64 * 1024;

/// Encoding requested for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EncodingChoice {
    Auto,
    Fixed(&'static Encoding),
}

/// Resolve `auto` or a WHATWG encoding label.
pub(crate) fn resolve_label(label: &str) -> Option<EncodingChoice> {
    if label.eq_ignore_ascii_case("auto") {
        return Some(EncodingChoice::Auto);
    }
    Encoding::for_label(label.trim().as_bytes()).map(EncodingChoice::Fixed)
}

/// Guess the encoding from the first bytes of a file.
///
/// A BOM wins. Otherwise valid UTF-8 is UTF-8 (a multibyte sequence cut off
/// at the end of the sample still counts), and anything else is read as
/// windows-1252.
pub(crate) fn detect(sample: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        return encoding;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => UTF_8,
        Err(e) if e.error_len().is_none() => UTF_8,
        Err(_) => WINDOWS_1252,
    }
}
