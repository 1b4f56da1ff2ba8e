//! Column labeling: canonicalization followed by affixing.
//!
//! After merging, every non-date column must be globally unique, so each
//! series' columns are renamed by affixing the symbol (and later the target
//! currency). Source-specific spellings are canonicalized first; the date
//! key is the table's row key and is never renamed.

use super::WideTable;

/// Where the affix goes relative to the original column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    Prefix,
    Suffix,
}

/// Default separator between affix and original column name.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Map a source-specific column name to its stable domain name.
///
/// Idempotent: canonical names no longer match the source spellings, so
/// applying this twice is a no-op.
fn canonical_name(raw: &str) -> &str {
    match raw {
        "volumefrom" => "volume_from",
        "volumeto" => "volume_to",
        other => other,
    }
}

impl WideTable {
    /// Rewrite source-specific column names to stable domain names.
    pub fn canonicalize(mut self) -> Self {
        for col in self.columns_mut() {
            let canonical = canonical_name(col);
            if canonical != col {
                *col = canonical.to_string();
            }
        }
        self
    }

    /// Canonicalize, then affix every column with `affix` using `separator`
    /// in the configured `position`. Pure transform; the date key is
    /// untouched by construction.
    pub fn label(self, affix: &str, separator: &str, position: Affix) -> Self {
        let mut table = self.canonicalize();
        for col in table.columns_mut() {
            *col = match position {
                Affix::Prefix => format!("{affix}{separator}{col}"),
                Affix::Suffix => format!("{col}{separator}{affix}"),
            };
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn raw_table() -> WideTable {
        let mut t = WideTable::new();
        let d = date("2024-01-01");
        t.set(d, "open", 1.0);
        t.set(d, "close", 2.0);
        t.set(d, "volumefrom", 3.0);
        t.set(d, "volumeto", 4.0);
        t
    }

    #[test]
    fn canonicalize_rewrites_volume_columns() {
        let t = raw_table().canonicalize();
        assert_eq!(t.columns(), &["open", "close", "volume_from", "volume_to"]);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = raw_table().canonicalize();
        let twice = once.clone().canonicalize();
        assert_eq!(once.columns(), twice.columns());
    }

    #[test]
    fn label_prefixes_every_column() {
        let t = raw_table().label("BTC", "_", Affix::Prefix);
        assert_eq!(
            t.columns(),
            &["BTC_open", "BTC_close", "BTC_volume_from", "BTC_volume_to"]
        );
        assert_eq!(t.get(date("2024-01-01"), "BTC_close"), Some(2.0));
    }

    #[test]
    fn label_suffixes_every_column() {
        let t = raw_table().label("USD", "_", Affix::Suffix);
        assert_eq!(
            t.columns(),
            &["open_USD", "close_USD", "volume_from_USD", "volume_to_USD"]
        );
    }

    #[test]
    fn label_never_produces_a_date_column() {
        let t = raw_table().label("BTC", "_", Affix::Prefix);
        assert!(!t.columns().iter().any(|c| c.contains("Date")));
        // The date key survives labeling unchanged.
        assert!(t.dates().any(|d| *d == date("2024-01-01")));
    }

    #[test]
    fn double_label_matches_pipeline_shape() {
        // Symbol prefix, then currency suffix, as the aggregator applies them.
        let t = raw_table()
            .label("BTC", "_", Affix::Prefix)
            .label("USD", "_", Affix::Suffix);
        assert!(t.columns().contains(&"BTC_close_USD".to_string()));
        assert!(t.columns().contains(&"BTC_volume_from_USD".to_string()));
    }
}
