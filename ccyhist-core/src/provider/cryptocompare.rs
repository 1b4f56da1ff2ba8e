//! CryptoCompare data source.
//!
//! Three endpoints:
//! - `data/all/exchanges` — exchange → (symbol → currencies tradable into)
//! - `api/data/coinlist` — the globally known symbols
//! - `data/histoday` — daily OHLCV history, paged backwards with `toTs`
//!
//! The history endpoint pads days before a coin existed with all-zero
//! records; those are dropped at parse time so downstream tables carry
//! explicit no-value cells instead of fake zeros.

use super::{
    CatalogSource, Continuation, Cursor, DataError, FetchChunk, HistoryProvider, Pacer, SeriesRow,
};
use crate::catalog::{ExchangeCatalog, PairMap};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const BASE_URL: &str = "https://min-api.cryptocompare.com";
const COINLIST_URL: &str = "https://www.cryptocompare.com/api/data/coinlist/";
const CHUNK_LIMIT: usize = 2000;
const DAY_SECS: i64 = 86_400;

/// `data/histoday` response.
#[derive(Debug, Deserialize)]
struct HistoDayResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Data", default)]
    data: Vec<HistoRow>,
}

#[derive(Debug, Deserialize)]
struct HistoRow {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volumefrom: f64,
    volumeto: f64,
}

/// `coinlist` response; only the symbol field matters here.
#[derive(Debug, Deserialize)]
struct CoinListResponse {
    #[serde(rename = "Data")]
    data: BTreeMap<String, CoinInfo>,
}

#[derive(Debug, Deserialize)]
struct CoinInfo {
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Blocking CryptoCompare client with built-in request pacing.
pub struct CryptoCompareClient {
    client: reqwest::blocking::Client,
    pacer: Pacer,
    base_url: String,
    coinlist_url: String,
}

impl CryptoCompareClient {
    pub fn new(pacing: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            pacer: Pacer::new(pacing),
            base_url: BASE_URL.to_string(),
            coinlist_url: COINLIST_URL.to_string(),
        }
    }

    /// Build the histoday URL for one fetch call.
    ///
    /// The cursorless first call asks for the full history up front; cursored
    /// calls page backwards from `toTs`.
    fn histo_url(&self, symbol: &str, comparison: &str, exchange: &str, cursor: Option<&Cursor>) -> String {
        let mut url = format!(
            "{}/data/histoday?fsym={}&tsym={}&limit={}&aggregate=1",
            self.base_url,
            symbol.to_uppercase(),
            comparison.to_uppercase(),
            CHUNK_LIMIT
        );
        if !exchange.is_empty() {
            url.push_str(&format!("&e={exchange}"));
        }
        match cursor {
            Some(Cursor(to_ts)) => url.push_str(&format!("&toTs={to_ts}")),
            None => url.push_str("&allData=true"),
        }
        url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
        self.pacer.pace();
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} for {url}")));
        }
        resp.json::<T>()
            .map_err(|e| DataError::SourceFormat(format!("decode {url}: {e}")))
    }
}

/// An all-zero record: no trades that day. The source also emits runs of
/// these before a coin's first trade on an exchange.
fn is_zero_record(raw: &HistoRow) -> bool {
    raw.open == 0.0
        && raw.high == 0.0
        && raw.low == 0.0
        && raw.close == 0.0
        && raw.volumefrom == 0.0
        && raw.volumeto == 0.0
}

/// Turn a histoday response into a chunk plus its continuation.
///
/// The next cursor points one day before the earliest record seen. History
/// is exhausted when the page is short, or when a full page opens with
/// zero-record padding (the run before the coin's inception); an isolated
/// zero-trade day in the middle of a page does not end pagination.
fn parse_histo(symbol: &str, resp: HistoDayResponse) -> Result<FetchChunk, DataError> {
    if resp.response != "Success" {
        return Err(DataError::SourceFormat(format!(
            "{symbol}: {}",
            resp.message.unwrap_or_else(|| "unknown source error".into())
        )));
    }

    let raw_len = resp.data.len();
    let earliest = resp.data.first().map(|r| r.time);
    let leading_padding = resp.data.first().is_some_and(is_zero_record);

    let mut rows = Vec::with_capacity(raw_len);
    for raw in resp.data {
        if is_zero_record(&raw) {
            continue;
        }

        let date = chrono::DateTime::from_timestamp(raw.time, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| {
                DataError::SourceFormat(format!("{symbol}: invalid timestamp {}", raw.time))
            })?;

        rows.push(SeriesRow {
            date,
            open: Some(raw.open),
            high: Some(raw.high),
            low: Some(raw.low),
            close: Some(raw.close),
            volume_from: Some(raw.volumefrom),
            volume_to: Some(raw.volumeto),
        });
    }

    let next = match earliest {
        Some(ts) if raw_len >= CHUNK_LIMIT && !leading_padding => {
            Continuation::Resume(Cursor((ts - DAY_SECS).to_string()))
        }
        _ => Continuation::Done,
    };

    Ok(FetchChunk { rows, next })
}

impl HistoryProvider for CryptoCompareClient {
    fn name(&self) -> &str {
        "cryptocompare"
    }

    fn fetch(
        &self,
        symbol: &str,
        comparison: &str,
        exchange: &str,
        cursor: Option<&Cursor>,
    ) -> Result<FetchChunk, DataError> {
        let url = self.histo_url(symbol, comparison, exchange, cursor);
        let resp: HistoDayResponse = self.get_json(&url)?;
        parse_histo(symbol, resp)
    }
}

impl CatalogSource for CryptoCompareClient {
    fn name(&self) -> &str {
        "cryptocompare"
    }

    fn catalog(&self) -> Result<ExchangeCatalog, DataError> {
        let url = format!("{}/data/all/exchanges", self.base_url);
        let exchanges: BTreeMap<String, PairMap> = self
            .get_json(&url)
            .map_err(|e| DataError::CatalogUnavailable(e.to_string()))?;

        let coinlist: CoinListResponse = self
            .get_json(&self.coinlist_url)
            .map_err(|e| DataError::CatalogUnavailable(e.to_string()))?;
        let known_symbols = coinlist
            .data
            .into_values()
            .map(|info| info.symbol)
            .collect();

        Ok(ExchangeCatalog {
            exchanges,
            known_symbols,
        })
    }
}
