//! # CSV Table Store
//!
//! One `<table>.csv` file per table under a data directory.
//!
//! ## Layout
//! ```text
//! <data_dir>/
//! ├── stock_entries.csv
//! ├── sales.csv
//! └── .sales.csv.tmp        ← only while a write is in flight
//! ```
//!
//! ## Write Path
//! ```text
//! write_table(sales)
//!      │
//!      ▼
//! serialize header + rows ──► .sales.csv.tmp ──► fsync ──► rename over sales.csv
//! ```
//! The rename makes the overwrite all-or-nothing: a reader sees either the
//! old table or the new one. Two writers racing still lose one update (last
//! writer wins), same as the shared sheet this replaces.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::table::{Table, TableName, TableStore};

/// Filesystem-backed table store.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    /// Creates a store rooted at `data_dir`. The directory is created on
    /// first write, not here.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvStore {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a table's backing file.
    pub fn table_path(&self, name: TableName) -> PathBuf {
        self.data_dir.join(format!("{}.csv", name.as_str()))
    }

    fn temp_path(&self, name: TableName) -> PathBuf {
        self.data_dir.join(format!(".{}.csv.tmp", name.as_str()))
    }

    fn parse(name: TableName, bytes: &[u8]) -> StoreResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            // hand-edited sheets end up with ragged rows
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| StoreError::csv(name, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Ok(Table::empty(name));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::csv(name, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { name, headers, rows })
    }

    fn serialize(table: &Table) -> StoreResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

        writer
            .write_record(&table.headers)
            .map_err(|e| StoreError::csv(table.name, e))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| StoreError::csv(table.name, e))?;
        }

        writer
            .into_inner()
            .map_err(|e| StoreError::csv(table.name, e.into_error().into()))
    }
}

impl TableStore for CsvStore {
    fn read_table(&self, name: TableName) -> StoreResult<Table> {
        let path = self.table_path(name);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(table = %name, path = %path.display(), "Table file missing, using empty schema");
                return Ok(Table::empty(name));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            debug!(table = %name, "Table file empty, using empty schema");
            return Ok(Table::empty(name));
        }

        let table = Self::parse(name, &bytes)?;
        debug!(table = %name, rows = table.len(), "Table read");
        Ok(table)
    }

    fn write_table(&self, table: &Table) -> StoreResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;

        let bytes = Self::serialize(table)?;
        let target = self.table_path(table.name);
        let temp = self.temp_path(table.name);

        let mut file = File::create(&temp).map_err(|e| StoreError::io(&temp, e))?;
        file.write_all(&bytes).map_err(|e| StoreError::io(&temp, e))?;
        file.sync_all().map_err(|e| StoreError::io(&temp, e))?;
        drop(file);

        fs::rename(&temp, &target).map_err(|e| StoreError::io(&target, e))?;

        info!(table = %table.name, rows = table.len(), path = %target.display(), "Table written");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
