//! Exchange aggregation — the pipeline's orchestration layer.
//!
//! One exchange at a time: for each target currency, resolve the tradable
//! symbols, fetch each symbol's history to exhaustion, label it with the
//! symbol as a prefix, merge per-currency, label with the currency as a
//! suffix, and merge into the exchange table. Symbol-level failures are
//! reported and skipped; only a catalog failure aborts the run.

use crate::catalog::{resolve_symbols, PairMap};
use crate::config::RunConfig;
use crate::progress::RunProgress;
use crate::provider::{CatalogSource, Continuation, Cursor, DataError, HistoryProvider};
use crate::resume::CompletedSet;
use crate::sink::CsvSink;
use crate::table::finalize::finalize;
use crate::table::label::{Affix, DEFAULT_SEPARATOR};
use crate::table::{SymbolSeries, WideTable};
use std::collections::BTreeSet;

/// Outcome counts for one pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Exchanges aggregated and persisted this run.
    pub completed: usize,
    /// Exchanges skipped because a prior run already produced them.
    pub skipped: usize,
    /// Exchanges that yielded no data at all (no output written).
    pub empty: usize,
    /// Exchanges whose output could not be persisted.
    pub failed: usize,
    /// Persistence errors, by exchange.
    pub errors: Vec<(String, DataError)>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetch one symbol's full history, following continuation cursors.
///
/// Stops on `Done`, on an empty chunk (a stop signal, never retried), or
/// after `max_chunks` pages.
pub fn fetch_series(
    provider: &dyn HistoryProvider,
    symbol: &str,
    comparison: &str,
    exchange: &str,
    max_chunks: usize,
) -> Result<SymbolSeries, DataError> {
    let mut series = SymbolSeries::new(symbol, comparison, exchange);
    let mut cursor: Option<Cursor> = None;

    for _ in 0..max_chunks {
        let chunk = provider.fetch(symbol, comparison, exchange, cursor.as_ref())?;
        if chunk.rows.is_empty() {
            break;
        }
        series.extend(chunk.rows);
        match chunk.next {
            Continuation::Done => break,
            Continuation::Resume(next) => cursor = Some(next),
        }
    }

    Ok(series)
}

/// Build one exchange's wide table across all target currencies.
///
/// Failure isolation: a failed or empty symbol contributes nothing and the
/// aggregation proceeds. An entirely empty result means the exchange should
/// produce no output at all — callers must check `is_empty` before
/// finalizing.
pub fn aggregate_exchange(
    provider: &dyn HistoryProvider,
    exchange: &str,
    pairs: &PairMap,
    known: &BTreeSet<String>,
    config: &RunConfig,
    progress: &dyn RunProgress,
) -> WideTable {
    let mut exchange_table = WideTable::new();

    for currency in &config.target_currencies {
        let Some(symbols) = resolve_symbols(pairs, currency, known) else {
            continue;
        };

        let mut currency_table = WideTable::new();
        for symbol in &symbols {
            let series =
                match fetch_series(provider, symbol, currency, exchange, config.max_chunks) {
                    Ok(series) => series,
                    Err(e) => {
                        progress.on_symbol_failed(exchange, symbol, currency, &e);
                        continue;
                    }
                };
            if series.is_empty() {
                progress.on_symbol_empty(exchange, symbol, currency);
                continue;
            }

            let affix = series.symbol.to_uppercase();
            let labeled = series
                .into_table()
                .label(&affix, DEFAULT_SEPARATOR, Affix::Prefix);
            currency_table.merge(labeled);
        }

        if currency_table.is_empty() {
            continue;
        }
        let labeled = currency_table.label(currency, DEFAULT_SEPARATOR, Affix::Suffix);
        exchange_table.merge(labeled);
    }

    exchange_table
}

/// Run the whole pipeline: catalog → per-exchange aggregation → sink.
///
/// A completed exchange costs zero fetch calls. A catalog failure is fatal;
/// everything below it is contained.
pub fn run_pipeline(
    catalog_source: &dyn CatalogSource,
    provider: &dyn HistoryProvider,
    sink: &CsvSink,
    completed: &CompletedSet,
    config: &RunConfig,
    progress: &dyn RunProgress,
) -> Result<RunSummary, DataError> {
    let catalog = catalog_source.catalog()?;

    let mut summary = RunSummary::default();
    let total = catalog.exchange_count();

    for (index, (exchange, pairs)) in catalog.exchanges.iter().enumerate() {
        if completed.is_done(exchange) {
            progress.on_exchange_skipped(exchange);
            summary.skipped += 1;
            continue;
        }

        progress.on_exchange_start(exchange, index, total);
        let table = aggregate_exchange(
            provider,
            exchange,
            pairs,
            &catalog.known_symbols,
            config,
            progress,
        );

        if table.is_empty() {
            progress.on_exchange_empty(exchange);
            summary.empty += 1;
            continue;
        }

        let finalized = finalize(table);
        let rows = finalized.row_count();
        let columns = finalized.columns.len();
        match sink.write(exchange, &finalized) {
            Ok(()) => {
                progress.on_exchange_complete(exchange, rows, columns);
                summary.completed += 1;
            }
            Err(e) => {
                progress.on_persist_failed(exchange, &e);
                summary.errors.push((exchange.clone(), e));
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
