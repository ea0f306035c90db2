//! Immutable reference index with exact and prefix lookup.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{DateTime, Utc};

use crate::models::ReferenceRecord;

/// Read surface of the reference index.
///
/// The matcher depends only on this trait so the backing store can be
/// swapped (in-memory, embedded database, warehouse) without touching the
/// match or scoring logic. Implementations must return the first candidate
/// in a stable, reproducible order.
pub trait ReferenceStore {
    /// First record whose `name1` equals `name` exactly.
    fn lookup_exact(&self, name: &str) -> Option<&ReferenceRecord>;

    /// First record whose `name1` starts with `name_prefix` and whose
    /// postcode district starts with `district_prefix`.
    fn lookup_by_prefix(&self, name_prefix: &str, district_prefix: &str)
        -> Option<&ReferenceRecord>;
}

/// In-memory reference index.
///
/// Records are kept in insertion order, which is the deterministic
/// tie-break order for lookups. A `BTreeMap` over `name1` provides exact
/// and prefix range scans; candidates found through it are resolved back
/// to the lowest insertion position.
#[derive(Debug)]
pub struct ReferenceIndex {
    records: Vec<ReferenceRecord>,
    by_name: BTreeMap<String, Vec<u32>>,
    built_at: DateTime<Utc>,
    skipped_rows: u64,
}

impl ReferenceIndex {
    /// Build the index from records already filtered and uppercased by the
    /// builder. Insertion order of `records` is preserved.
    pub fn from_records(records: Vec<ReferenceRecord>, skipped_rows: u64) -> Self {
        let mut by_name: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for (pos, record) in records.iter().enumerate() {
            by_name
                .entry(record.name1.clone())
                .or_default()
                .push(pos as u32);
        }

        Self {
            records,
            by_name,
            built_at: Utc::now(),
            skipped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Rows dropped during the build for having the wrong column count.
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    /// Positions of all records whose `name1` starts with `prefix`,
    /// unordered between names.
    fn positions_with_name_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = u32> + 'a {
        self.by_name
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(name, _)| name.starts_with(prefix))
            .flat_map(|(_, positions)| positions.iter().copied())
    }
}

impl ReferenceStore for ReferenceIndex {
    fn lookup_exact(&self, name: &str) -> Option<&ReferenceRecord> {
        let pos = *self.by_name.get(name)?.first()?;
        self.records.get(pos as usize)
    }

    fn lookup_by_prefix(
        &self,
        name_prefix: &str,
        district_prefix: &str,
    ) -> Option<&ReferenceRecord> {
        // Scan candidates by name prefix, filter on district prefix, and
        // take the lowest insertion position so results are deterministic
        // regardless of BTreeMap iteration order across names.
        let pos = self
            .positions_with_name_prefix(name_prefix)
            .filter(|&pos| {
                self.records[pos as usize]
                    .postcode_district
                    .as_deref()
                    .map(|d| d.starts_with(district_prefix))
                    .unwrap_or(false)
            })
            .min()?;
        self.records.get(pos as usize)
    }
}
