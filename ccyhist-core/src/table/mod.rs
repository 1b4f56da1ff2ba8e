//! Wide tables keyed by calendar date.
//!
//! A `WideTable` holds one row per distinct date and one column per
//! (symbol, field) combination. The date is the row key, not a column, so
//! labeling can never rename it and joins can never operate on a formatted
//! string by accident. Cells are present or absent — absent is "no value",
//! never zero.

pub mod finalize;
pub mod label;
pub mod merge;
pub mod reduce;

use crate::provider::SeriesRow;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One symbol's accumulated history for a (symbol, comparison currency,
/// exchange) triple. Created empty, grown chunk by chunk, then frozen and
/// converted into a table for labeling.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub symbol: String,
    pub comparison: String,
    pub exchange: String,
    rows: Vec<SeriesRow>,
}

impl SymbolSeries {
    pub fn new(symbol: &str, comparison: &str, exchange: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            comparison: comparison.to_string(),
            exchange: exchange.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn extend(&mut self, rows: Vec<SeriesRow>) {
        self.rows.extend(rows);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Convert into a wide table carrying the source's raw column spellings
    /// (`volumefrom`, `volumeto`) — the labeler canonicalizes them before
    /// affixing. A column appears only if at least one row has a value for
    /// it; duplicate dates keep the last row seen.
    pub fn into_table(self) -> WideTable {
        let fields: [(&str, fn(&SeriesRow) -> Option<f64>); 6] = [
            ("open", |r| r.open),
            ("high", |r| r.high),
            ("low", |r| r.low),
            ("close", |r| r.close),
            ("volumefrom", |r| r.volume_from),
            ("volumeto", |r| r.volume_to),
        ];

        let mut table = WideTable::new();
        for (name, get) in fields {
            if self.rows.iter().any(|r| get(r).is_some()) {
                table.push_column(name);
            }
        }
        let width = table.columns.len();

        for row in &self.rows {
            let cells: Vec<Option<f64>> = table
                .columns
                .iter()
                .map(|col| {
                    fields
                        .iter()
                        .find(|(name, _)| *name == col.as_str())
                        .and_then(|(_, get)| get(row))
                })
                .collect();
            debug_assert_eq!(cells.len(), width);
            table.rows.insert(row.date, cells);
        }

        table
    }
}

/// Mapping from date to a row of named values.
///
/// Invariants: one row per distinct date; every row vector has exactly
/// `columns.len()` cells; column order is merge-input order.
#[derive(Debug, Clone, Default)]
pub struct WideTable {
    columns: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl WideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// No rows and no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names, not including the date key.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All dates present, ascending.
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.rows.keys()
    }

    /// Look up one cell; `None` for unknown dates, unknown columns, or
    /// no-value cells.
    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(&date).and_then(|cells| cells[idx])
    }

    /// Set one cell, creating the column and/or row as needed.
    pub fn set(&mut self, date: NaiveDate, column: &str, value: f64) {
        let idx = match self.columns.iter().position(|c| c == column) {
            Some(idx) => idx,
            None => {
                self.push_column(column);
                self.columns.len() - 1
            }
        };
        let width = self.columns.len();
        let cells = self.rows.entry(date).or_insert_with(|| vec![None; width]);
        cells.resize(width, None);
        cells[idx] = Some(value);
    }

    fn push_column(&mut self, name: &str) {
        self.columns.push(name.to_string());
        let width = self.columns.len();
        for cells in self.rows.values_mut() {
            cells.resize(width, None);
        }
    }

    pub(crate) fn rows(&self) -> &BTreeMap<NaiveDate, Vec<Option<f64>>> {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut BTreeMap<NaiveDate, Vec<Option<f64>>> {
        &mut self.rows
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }
}
