//! Exchange catalog and symbol resolution.
//!
//! The catalog maps each exchange to the pairs it trades (symbol → list of
//! currencies the symbol trades into) plus the flat set of globally known
//! symbols. It is fetched once at run start and read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};

/// Trading pairs for one exchange: symbol → currencies it trades into.
pub type PairMap = BTreeMap<String, Vec<String>>;

/// The complete catalog for a run.
#[derive(Debug, Clone, Default)]
pub struct ExchangeCatalog {
    /// Exchange name → pairs tradable on it.
    pub exchanges: BTreeMap<String, PairMap>,
    /// All symbols the source knows about, across exchanges.
    pub known_symbols: BTreeSet<String>,
}

impl ExchangeCatalog {
    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }
}

/// Resolve the symbols on one exchange that trade into `target_currency`,
/// intersected with the globally known symbols.
///
/// Returns `None` when no symbol qualifies — an explicit empty-result signal
/// so callers can skip the currency without emitting a spurious empty table.
pub fn resolve_symbols(
    pairs: &PairMap,
    target_currency: &str,
    known: &BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    let resolved: BTreeSet<String> = pairs
        .iter()
        .filter(|(_, currencies)| currencies.iter().any(|c| c == target_currency))
        .map(|(symbol, _)| symbol.clone())
        .filter(|symbol| known.contains(symbol))
        .collect();

    if resolved.is_empty() {
        None
    } else {
        Some(resolved)
    }
}
