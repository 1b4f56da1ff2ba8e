//! Group-by-date reduction of intraday trade observations.
//!
//! Some sources publish per-trade records rather than daily bars. This
//! reduces them to one row per calendar date — volume-summed, price
//! averaged — producing a table the labeler and merger consume like any
//! fetched series.

use super::WideTable;
use crate::provider::DataError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

/// One intraday trade observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTick {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: f64,
}

/// Raw per-trade record as published: `unixtime,price,amount`, no header.
#[derive(Debug, Deserialize)]
struct RawTick {
    time: i64,
    price: f64,
    amount: f64,
}

/// Read headerless `unixtime,price,amount` trade records.
pub fn read_ticks<R: Read>(reader: R) -> Result<Vec<TradeTick>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut ticks = Vec::new();
    for record in rdr.deserialize::<RawTick>() {
        let raw = record.map_err(|e| DataError::SourceFormat(format!("trade record: {e}")))?;
        let date = chrono::DateTime::from_timestamp(raw.time, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::SourceFormat(format!("invalid timestamp {}", raw.time)))?;
        ticks.push(TradeTick {
            date,
            price: raw.price,
            volume: raw.amount,
        });
    }
    Ok(ticks)
}

#[derive(Debug, Default, Clone, Copy)]
struct DailyAccum {
    count: u64,
    price_sum: f64,
    volume_sum: f64,
}

/// Reduce trade ticks to a daily table with `avg` and `volume` columns.
pub fn reduce_ticks(ticks: &[TradeTick]) -> WideTable {
    let mut by_date: BTreeMap<NaiveDate, DailyAccum> = BTreeMap::new();
    for tick in ticks {
        let accum = by_date.entry(tick.date).or_default();
        accum.count += 1;
        accum.price_sum += tick.price;
        accum.volume_sum += tick.volume;
    }

    let mut table = WideTable::new();
    for (date, accum) in by_date {
        table.set(date, "avg", accum.price_sum / accum.count as f64);
        table.set(date, "volume", accum.volume_sum);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::label::Affix;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tick(d: &str, price: f64, volume: f64) -> TradeTick {
        TradeTick {
            date: date(d),
            price,
            volume,
        }
    }

    #[test]
    fn averages_price_and_sums_volume_per_date() {
        let table = reduce_ticks(&[
            tick("2024-01-01", 100.0, 1.0),
            tick("2024-01-01", 200.0, 2.0),
            tick("2024-01-02", 300.0, 3.0),
        ]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(date("2024-01-01"), "avg"), Some(150.0));
        assert_eq!(table.get(date("2024-01-01"), "volume"), Some(3.0));
        assert_eq!(table.get(date("2024-01-02"), "avg"), Some(300.0));
    }

    #[test]
    fn empty_input_reduces_to_empty_table() {
        assert!(reduce_ticks(&[]).is_empty());
    }

    #[test]
    fn reads_headerless_trade_records() {
        let data = "1514764800,13850.5,0.25\n1514851200,13444.9,1.5\n";
        let ticks = read_ticks(data.as_bytes()).unwrap();

        assert_eq!(
            ticks,
            vec![
                tick("2018-01-01", 13850.5, 0.25),
                tick("2018-01-02", 13444.9, 1.5),
            ]
        );
    }

    #[test]
    fn malformed_trade_record_is_source_format() {
        let data = "1514764800,not-a-price,0.25\n";
        let err = read_ticks(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::SourceFormat(_)));
    }

    #[test]
    fn reduced_table_labels_like_any_series() {
        let table = reduce_ticks(&[tick("2024-01-01", 100.0, 1.0)])
            .label("BTC", "_", Affix::Prefix)
            .label("USD", "_", Affix::Suffix);

        assert_eq!(table.columns(), &["BTC_avg_USD", "BTC_volume_USD"]);
    }
}
