//! Atomically swappable handle to the active reference index.

use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;
use tracing::info;

use super::store::ReferenceIndex;

/// Query arrived before the first successful build.
#[derive(Debug, Error)]
#[error("reference index is not ready")]
pub struct IndexNotReady;

/// Shared handle to the active [`ReferenceIndex`].
///
/// Readers clone the `Arc` under a short read lock and then query their
/// snapshot without any further synchronization; an in-flight rebuild is
/// invisible to them until `install` swaps the reference. The build latch
/// serializes builders so concurrent first callers cannot trigger
/// duplicate builds.
pub struct SharedIndex {
    active: RwLock<Option<Arc<ReferenceIndex>>>,
    build_latch: Mutex<()>,
}

impl SharedIndex {
    pub fn empty() -> Self {
        Self {
            active: RwLock::new(None),
            build_latch: Mutex::new(()),
        }
    }

    pub fn with_index(index: ReferenceIndex) -> Self {
        Self {
            active: RwLock::new(Some(Arc::new(index))),
            build_latch: Mutex::new(()),
        }
    }

    /// Snapshot of the active index, or `IndexNotReady` before the first
    /// successful build.
    pub fn snapshot(&self) -> Result<Arc<ReferenceIndex>, IndexNotReady> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(IndexNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Atomically replace the active index. In-flight queries keep their
    /// snapshot; new queries see the replacement.
    pub fn install(&self, index: ReferenceIndex) {
        info!(
            "Installing reference index with {} records (built {})",
            index.len(),
            index.built_at()
        );
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = Some(Arc::new(index));
    }

    /// Single-flight build: at most one `build` closure runs at a time.
    ///
    /// Callers that lose the race wait on the latch and then observe the
    /// winner's index instead of building again. A failed build leaves the
    /// previously active index (if any) serving.
    pub fn get_or_build<E>(
        &self,
        build: impl FnOnce() -> Result<ReferenceIndex, E>,
    ) -> Result<Arc<ReferenceIndex>, E> {
        if let Ok(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }

        let _latch = self.build_latch.lock().unwrap_or_else(|e| e.into_inner());

        // A concurrent caller may have finished the build while this one
        // waited on the latch.
        if let Ok(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }

        let index = build()?;
        self.install(index);
        Ok(self.snapshot().expect("index installed above"))
    }

    /// Unconditional single-writer rebuild with atomic swap.
    pub fn rebuild<E>(
        &self,
        build: impl FnOnce() -> Result<ReferenceIndex, E>,
    ) -> Result<Arc<ReferenceIndex>, E> {
        let _latch = self.build_latch.lock().unwrap_or_else(|e| e.into_inner());
        let index = build()?;
        self.install(index);
        Ok(self.snapshot().expect("index installed above"))
    }
}
