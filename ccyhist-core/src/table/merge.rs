//! Outer join of wide tables on the date key.
//!
//! Every date seen by any input survives the merge; dates absent from one
//! input become no-value cells for that input's columns, never row drops.
//! Associative and commutative over the date/row set — only column order
//! depends on merge-input order.

use super::WideTable;

impl WideTable {
    /// Merge `other` into `self` as an outer join on the date key.
    ///
    /// Columns already present keep their position; new columns append in
    /// `other`'s order. If both tables carry a value for the same
    /// (date, column) — which the labeler is supposed to prevent — the
    /// incoming value silently wins. That tie-break is a documented
    /// determinism choice, not a validated invariant.
    pub fn merge(&mut self, other: WideTable) {
        if other.is_empty() {
            return;
        }

        let other_columns = other.columns().to_vec();
        let mut index_map = Vec::with_capacity(other_columns.len());
        for col in &other_columns {
            let idx = match self.columns().iter().position(|c| c == col) {
                Some(idx) => idx,
                None => {
                    self.columns_mut().push(col.clone());
                    self.columns_mut().len() - 1
                }
            };
            index_map.push(idx);
        }

        let width = self.columns().len();
        for cells in self.rows_mut().values_mut() {
            cells.resize(width, None);
        }

        for (date, other_cells) in other.rows() {
            let cells = self
                .rows_mut()
                .entry(*date)
                .or_insert_with(|| vec![None; width]);
            cells.resize(width, None);
            for (src, &dst) in index_map.iter().enumerate() {
                if let Some(value) = other_cells.get(src).copied().flatten() {
                    cells[dst] = Some(value);
                }
            }
        }
    }
}
