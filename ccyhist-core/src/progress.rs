//! Progress callbacks for pipeline runs.
//!
//! Symbol-level failures never abort an exchange, so they have to be
//! visible somewhere — this trait is how the operator sees skip and
//! failure events. The CLI uses `StdoutProgress`; tests install counting
//! implementations.

use crate::provider::DataError;

/// Callbacks fired as the pipeline walks exchanges, currencies, and symbols.
pub trait RunProgress: Send {
    /// An exchange is about to be aggregated.
    fn on_exchange_start(&self, exchange: &str, index: usize, total: usize);

    /// An exchange was skipped because a prior run already produced it.
    fn on_exchange_skipped(&self, exchange: &str);

    /// An exchange produced no data at all; no output will be written.
    fn on_exchange_empty(&self, exchange: &str);

    /// An exchange's table was finalized and persisted.
    fn on_exchange_complete(&self, exchange: &str, rows: usize, columns: usize);

    /// A symbol legitimately had no data for this (exchange, currency).
    fn on_symbol_empty(&self, exchange: &str, symbol: &str, currency: &str);

    /// A symbol's fetch failed; its contribution is simply absent.
    fn on_symbol_failed(&self, exchange: &str, symbol: &str, currency: &str, error: &DataError);

    /// Persisting an exchange's output failed; the run continues.
    fn on_persist_failed(&self, exchange: &str, error: &DataError);
}

/// Progress reporter that prints to stdout/stderr.
pub struct StdoutProgress;

impl RunProgress for StdoutProgress {
    fn on_exchange_start(&self, exchange: &str, index: usize, total: usize) {
        println!("[{}/{}] Aggregating {exchange}...", index + 1, total);
    }

    fn on_exchange_skipped(&self, exchange: &str) {
        println!("Exchange {exchange} already done; continuing.");
    }

    fn on_exchange_empty(&self, exchange: &str) {
        println!("  No data for exchange {exchange}; nothing written.");
    }

    fn on_exchange_complete(&self, exchange: &str, rows: usize, columns: usize) {
        println!("  OK: {exchange} ({rows} rows, {columns} columns)");
    }

    fn on_symbol_empty(&self, exchange: &str, symbol: &str, currency: &str) {
        println!("  No data for: exchange {exchange}, symbol {symbol}, target currency {currency}");
    }

    fn on_symbol_failed(&self, exchange: &str, symbol: &str, currency: &str, error: &DataError) {
        eprintln!("  FAIL: {symbol}/{currency} on {exchange}: {error}");
    }

    fn on_persist_failed(&self, exchange: &str, error: &DataError) {
        eprintln!("  FAIL: could not write output for {exchange}: {error}");
    }
}
