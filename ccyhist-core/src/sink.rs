//! CSV output sink — one table file per exchange.
//!
//! Writes are on-completion only: the table is written to a `.tmp` sibling
//! and renamed into place, so an aborted run never leaves a partial output
//! that the resumption tracker would mistake for a finished exchange.

use crate::provider::DataError;
use crate::table::finalize::FinalizedTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Sink that persists finalized exchange tables as `{exchange}.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Final path for an exchange's table.
    pub fn path_for(&self, exchange: &str) -> PathBuf {
        self.output_dir.join(format!("{exchange}.csv"))
    }

    /// Write a finalized table atomically.
    pub fn write(&self, exchange: &str, table: &FinalizedTable) -> Result<(), DataError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| DataError::Persistence(format!("create output dir: {e}")))?;

        let path = self.path_for(exchange);
        let tmp_path = path.with_extension("csv.tmp");

        // Any failure past this point leaves a stray .tmp that a later
        // directory scan would misread as a finished exchange, so every
        // error path removes it.
        let outcome = write_tmp(&tmp_path, table)
            .and_then(|()| {
                fs::rename(&tmp_path, &path)
                    .map_err(|e| DataError::Persistence(format!("atomic rename failed: {e}")))
            });
        if outcome.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        outcome
    }
}

fn write_tmp(tmp_path: &Path, table: &FinalizedTable) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_path(tmp_path)
        .map_err(|e| DataError::Persistence(format!("create {}: {e}", tmp_path.display())))?;
    wtr.write_record(&table.columns)
        .map_err(|e| DataError::Persistence(format!("write header: {e}")))?;
    for row in &table.rows {
        wtr.write_record(row)
            .map_err(|e| DataError::Persistence(format!("write row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| DataError::Persistence(format!("flush: {e}")))
}
