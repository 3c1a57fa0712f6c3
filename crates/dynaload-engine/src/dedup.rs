//! Per-run duplicate primary-key tracking.

use std::collections::HashSet;

use dynaload_types::CanonicalKey;

/// Canonical keys seen so far in one run. Grows monotonically.
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    seen: HashSet<CanonicalKey>,
}

impl DuplicateTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; returns `true` on first sighting, `false` for a duplicate.
    pub fn check_and_record(&mut self, key: CanonicalKey) -> bool {
        self.seen.insert(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
