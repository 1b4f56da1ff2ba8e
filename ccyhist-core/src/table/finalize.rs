//! Table finalization: the only boundary to persistence.
//!
//! Upstream joins always operate on `NaiveDate`; only here does the date
//! become a `YYYY-MM-DD` string. Rows come out sorted by date descending
//! (most recent first) with empty strings for no-value cells.

use super::WideTable;

/// A write-ready table: header plus string rows, Date column first.
#[derive(Debug, Clone)]
pub struct FinalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FinalizedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Normalize the date key to `YYYY-MM-DD` and sort rows descending.
pub fn finalize(table: WideTable) -> FinalizedTable {
    let mut columns = Vec::with_capacity(table.columns().len() + 1);
    columns.push("Date".to_string());
    columns.extend(table.columns().iter().cloned());

    let rows = table
        .rows()
        .iter()
        .rev()
        .map(|(date, cells)| {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(date.format("%Y-%m-%d").to_string());
            row.extend(cells.iter().map(|cell| match cell {
                Some(v) => format_value(*v),
                None => String::new(),
            }));
            row
        })
        .collect();

    FinalizedTable { columns, rows }
}

fn format_value(v: f64) -> String {
    // Plain display keeps integers short (100, not 100.0) and floats exact.
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
