//! JSON snapshot persistence for the reference index.
//!
//! The ingest binary writes a snapshot after a build; the query binary
//! loads it at startup without re-reading the raw extracts. Records are
//! stored in insertion order, so an index restored from a snapshot gives
//! the same match results as the index it was taken from.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::ReferenceRecord;

use super::store::ReferenceIndex;

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub built_at: DateTime<Utc>,
    pub skipped_rows: u64,
    pub records: Vec<ReferenceRecord>,
}

impl IndexSnapshot {
    pub fn from_index(index: &ReferenceIndex) -> Self {
        Self {
            built_at: index.built_at(),
            skipped_rows: index.skipped_rows(),
            records: index.records().to_vec(),
        }
    }

    pub fn into_index(self) -> ReferenceIndex {
        ReferenceIndex::from_records(self.records, self.skipped_rows)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create snapshot file {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        info!(
            "Wrote snapshot with {} records to {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
        let snapshot: IndexSnapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        info!(
            "Loaded snapshot with {} records from {}",
            snapshot.records.len(),
            path.display()
        );
        Ok(snapshot)
    }
}
