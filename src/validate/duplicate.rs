//! Duplicate tracking over previously validated addresses.

use std::collections::HashSet;
use std::sync::Mutex;

use xxhash_rust::xxh64::xxh64;

/// Pluggable duplicate-detection strategy.
///
/// Implementations observe each standardized address as validations are
/// processed and report whether it was seen before. The detector is
/// consulted after standardization and before the final score, so a
/// repeat adds its risk flag in rule order.
pub trait DuplicateDetector: Send + Sync {
    /// Record `standardized` and return whether it was already tracked.
    fn observe(&self, standardized: &str) -> bool;
}

/// Content-hash duplicate index: xxh64 over the standardized rendering.
///
/// Exact-match only; two renderings that differ in any byte are distinct
/// addresses. The hash set lives for the lifetime of the validator that
/// owns it.
#[derive(Default)]
pub struct HashDuplicateIndex {
    seen: Mutex<HashSet<u64>>,
}

impl HashDuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DuplicateDetector for HashDuplicateIndex {
    fn observe(&self, standardized: &str) -> bool {
        let hash = xxh64(standardized.as_bytes(), 0);
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        !seen.insert(hash)
    }
}

/// Detector that never reports a duplicate. Useful for one-shot
/// validations where history is meaningless.
pub struct NoDuplicates;

impl DuplicateDetector for NoDuplicates {
    fn observe(&self, _standardized: &str) -> bool {
        false
    }
}
