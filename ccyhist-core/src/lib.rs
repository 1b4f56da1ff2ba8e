//! ccyhist core — daily crypto price/volume history assembly.
//!
//! The pipeline turns heterogeneous, paginated, per-symbol API responses
//! into one wide CSV table per exchange, keyed by calendar date:
//! - Provider traits and the live CryptoCompare client
//! - Wide-table outer join on the date key, column labeling
//! - Per-exchange aggregation across target currencies and symbols
//! - Run resumption from existing output artifacts
//! - Finalization (date formatting, descending sort) and the CSV sink

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod progress;
pub mod provider;
pub mod resume;
pub mod sink;
pub mod table;

pub use aggregate::{aggregate_exchange, fetch_series, run_pipeline, RunSummary};
pub use catalog::{resolve_symbols, ExchangeCatalog};
pub use config::RunConfig;
pub use progress::{RunProgress, StdoutProgress};
pub use provider::{
    CatalogSource, Continuation, Cursor, DataError, FetchChunk, HistoryProvider, SeriesRow,
};
pub use resume::CompletedSet;
pub use sink::CsvSink;
pub use table::{
    finalize::{finalize, FinalizedTable},
    label::Affix,
    reduce::{read_ticks, reduce_ticks, TradeTick},
    SymbolSeries, WideTable,
};
