//! Gazetteer ingest: raw CSV extracts to an immutable reference index.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{RecordKind, ReferenceRecord};

use super::store::ReferenceIndex;

/// Columns consumed from the raw extracts. The extracts carry no header
/// row themselves; names come from the separate header-schema file.
const REQUIRED_COLUMNS: &[&str] = &[
    "ID",
    "NAME1",
    "LOCAL_TYPE",
    "POSTCODE_DISTRICT",
    "POPULATED_PLACE",
    "DISTRICT_BOROUGH",
    "COUNTY_UNITARY",
    "COUNTRY",
];

/// Structural failures that abort a build. Row-level problems are not
/// errors; they are skipped and counted.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("header schema file not found: {0}")]
    MissingHeaderFile(PathBuf),

    #[error("data directory not found: {0}")]
    MissingDataDir(PathBuf),

    #[error("header schema is missing required column '{0}'")]
    MissingColumn(String),

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Positions of the required columns within a raw row.
struct ColumnMap {
    id: usize,
    name1: usize,
    local_type: usize,
    postcode_district: usize,
    populated_place: usize,
    district_borough: usize,
    county_unitary: usize,
    country: usize,
    /// Total column count a well-formed row must have.
    width: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, BuildError> {
        let position = |name: &str| -> Result<usize, BuildError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| BuildError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            id: position(REQUIRED_COLUMNS[0])?,
            name1: position(REQUIRED_COLUMNS[1])?,
            local_type: position(REQUIRED_COLUMNS[2])?,
            postcode_district: position(REQUIRED_COLUMNS[3])?,
            populated_place: position(REQUIRED_COLUMNS[4])?,
            district_borough: position(REQUIRED_COLUMNS[5])?,
            county_unitary: position(REQUIRED_COLUMNS[6])?,
            country: position(REQUIRED_COLUMNS[7])?,
            width: headers.len(),
        })
    }
}

/// Builds a [`ReferenceIndex`] from a header-schema file plus a directory
/// of raw gazetteer CSV extracts.
///
/// The build never publishes a partial index: it either returns a fully
/// populated `ReferenceIndex` or a [`BuildError`], leaving any previously
/// active index untouched.
pub struct ReferenceIndexBuilder {
    header_path: PathBuf,
    data_dir: PathBuf,
}

impl ReferenceIndexBuilder {
    pub fn new(header_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            header_path: header_path.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Raw data files in deterministic (file name) order, excluding any
    /// file recognizable as the header file itself.
    pub fn data_files(&self) -> Result<Vec<PathBuf>, BuildError> {
        if !self.data_dir.is_dir() {
            return Err(BuildError::MissingDataDir(self.data_dir.clone()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.data_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension().map(|ext| ext == "csv").unwrap_or(false)
                    && !path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.to_lowercase().contains("header"))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn build(&self) -> Result<ReferenceIndex, BuildError> {
        self.build_with_progress(|_| {})
    }

    /// Build, invoking `on_file` once per processed data file.
    pub fn build_with_progress<F>(&self, mut on_file: F) -> Result<ReferenceIndex, BuildError>
    where
        F: FnMut(&Path),
    {
        let columns = self.read_header_schema()?;
        let files = self.data_files()?;

        info!(
            "Building reference index from {} data files in {}",
            files.len(),
            self.data_dir.display()
        );

        let mut records = Vec::new();
        let mut skipped_rows = 0u64;

        for path in &files {
            let kept_before = records.len();
            skipped_rows += self.ingest_file(path, &columns, &mut records)?;
            debug!(
                "{}: kept {} records",
                path.display(),
                records.len() - kept_before
            );
            on_file(path);
        }

        if skipped_rows > 0 {
            warn!("Skipped {} malformed rows during build", skipped_rows);
        }
        info!("Reference index built with {} records", records.len());

        Ok(ReferenceIndex::from_records(records, skipped_rows))
    }

    /// Read the column names the raw extracts conform to.
    fn read_header_schema(&self) -> Result<ColumnMap, BuildError> {
        if !self.header_path.is_file() {
            return Err(BuildError::MissingHeaderFile(self.header_path.clone()));
        }

        let mut reader =
            ReaderBuilder::new()
                .has_headers(true)
                .from_path(&self.header_path)
                .map_err(|source| BuildError::Csv {
                    path: self.header_path.clone(),
                    source,
                })?;

        let headers = reader
            .headers()
            .map_err(|source| BuildError::Csv {
                path: self.header_path.clone(),
                source,
            })?
            .clone();

        ColumnMap::from_headers(&headers)
    }

    /// Ingest one raw file, appending recognized records and returning the
    /// number of rows skipped for having the wrong column count.
    fn ingest_file(
        &self,
        path: &Path,
        columns: &ColumnMap,
        records: &mut Vec<ReferenceRecord>,
    ) -> Result<u64, BuildError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| BuildError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        let mut skipped = 0u64;

        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!("{}: unreadable row: {}", path.display(), e);
                    skipped += 1;
                    continue;
                }
            };

            if row.len() != columns.width {
                skipped += 1;
                continue;
            }

            let Some(kind) = RecordKind::from_local_type(&row[columns.local_type]) else {
                continue;
            };

            let name1 = row[columns.name1].trim().to_uppercase();
            if name1.is_empty() {
                continue;
            }

            records.push(ReferenceRecord {
                id: row[columns.id].trim().to_string(),
                name1,
                kind,
                postcode_district: non_empty(&row[columns.postcode_district]),
                populated_place: non_empty(&row[columns.populated_place]),
                district_borough: non_empty(&row[columns.district_borough]),
                county_unitary: non_empty(&row[columns.county_unitary]),
                country: non_empty(&row[columns.country]),
            });
        }

        Ok(skipped)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
