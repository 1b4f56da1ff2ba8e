//! Provider traits and structured error types.
//!
//! `HistoryProvider` abstracts over market-data sources (CryptoCompare live,
//! mocks in tests) so the aggregation pipeline never sees a source's JSON
//! shape. `CatalogSource` does the same for the exchange/pair catalog.

pub mod cryptocompare;

use crate::catalog::ExchangeCatalog;
use chrono::NaiveDate;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// One symbol's observation for one calendar date.
///
/// Fields a source does not report are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume_from: Option<f64>,
    pub volume_to: Option<f64>,
}

/// Opaque continuation token: "earliest point not yet fetched".
///
/// Only the provider that issued a cursor knows how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(pub String);

/// Tail of a fetch result: resume from a cursor, or the source is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    Resume(Cursor),
    Done,
}

/// One page of a symbol's history, ordered by date.
#[derive(Debug, Clone)]
pub struct FetchChunk {
    pub rows: Vec<SeriesRow>,
    pub next: Continuation,
}

/// Structured error types for the pipeline.
///
/// Propagation policy: `SourceFormat` and `Network` are symbol-level and
/// never escalate past the exchange aggregator; `CatalogUnavailable` aborts
/// the run; `Persistence` fails one exchange's output and the run continues.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("source format error: {0}")]
    SourceFormat(String),

    #[error("network unreachable: {0}")]
    Network(String),

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Trait for historical-series sources.
///
/// Callers loop on `fetch`, threading the returned cursor, until
/// `Continuation::Done` or an empty chunk. Implementations upper-case the
/// symbol and comparison currency before any request; an empty `exchange`
/// means "aggregate across all exchanges" per source semantics.
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch one chunk of daily rows for a (symbol, comparison, exchange)
    /// triple, resuming from `cursor` when given.
    fn fetch(
        &self,
        symbol: &str,
        comparison: &str,
        exchange: &str,
        cursor: Option<&Cursor>,
    ) -> Result<FetchChunk, DataError>;
}

/// Trait for catalog sources: which exchanges exist, which pairs they trade,
/// and which symbols are globally known.
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    fn catalog(&self) -> Result<ExchangeCatalog, DataError>;
}

/// Enforces a minimum interval between successive requests to one source.
///
/// The pacing delay is a hard rule of the protocol (external rate limits),
/// not a performance tweak. The mutex serializes callers, so the spacing
/// holds per source even if the pipeline is ever parallelized.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Block until at least `min_interval` has passed since the previous
    /// call, then record the current instant.
    pub fn pace(&self) {
        let mut last = self.last_request.lock().unwrap();
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_first_call_does_not_block() {
        let pacer = Pacer::new(Duration::from_secs(60));
        let start = Instant::now();
        pacer.pace();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn pacer_enforces_minimum_interval() {
        let pacer = Pacer::new(Duration::from_millis(50));
        pacer.pace();
        let start = Instant::now();
        pacer.pace();
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn continuation_equality() {
        assert_eq!(Continuation::Done, Continuation::Done);
        assert_eq!(
            Continuation::Resume(Cursor("1514764800".into())),
            Continuation::Resume(Cursor("1514764800".into()))
        );
        assert_ne!(
            Continuation::Resume(Cursor("0".into())),
            Continuation::Done
        );
    }
}
