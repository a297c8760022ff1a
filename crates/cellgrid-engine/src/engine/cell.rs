//! Raw cell storage for the spreadsheet grid.
//!
//! - [`CellStore`] - Sparse mapping of address to raw content (literal or formula)
//! - [`GridBounds`] - The fixed rectangle that a recompute pass covers
//!
//! The store holds text exactly as the user committed it; interpretation
//! happens lazily during evaluation.

use std::collections::{BTreeMap, HashMap};

use super::cell_ref::{COLUMN_COUNT, CellRef};

/// Default number of rows in a sheet.
pub const DEFAULT_ROW_COUNT: usize = 100;

/// The fixed extent of a sheet. Columns are always `A`..`Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub rows: usize,
}

impl GridBounds {
    pub fn new(rows: usize) -> GridBounds {
        GridBounds { rows }
    }

    pub fn cols(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row() < self.rows
    }

    /// Every address in bounds, row-major.
    pub fn iter(&self) -> impl Iterator<Item = CellRef> + use<> {
        let cols = self.cols();
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| CellRef::new(col, row)))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        GridBounds::new(DEFAULT_ROW_COUNT)
    }
}

/// Sparse address -> raw value storage.
///
/// A key is present iff its value is non-empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellStore {
    cells: HashMap<CellRef, String>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a raw value. An empty value removes the cell.
    /// Returns the previous raw value, if any.
    pub fn set(&mut self, cell_ref: CellRef, raw: impl Into<String>) -> Option<String> {
        let raw = raw.into();
        if raw.is_empty() {
            self.remove(&cell_ref)
        } else {
            self.cells.insert(cell_ref, raw)
        }
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&str> {
        self.cells.get(cell_ref).map(String::as_str)
    }

    pub fn remove(&mut self, cell_ref: &CellRef) -> Option<String> {
        self.cells.remove(cell_ref)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &str)> {
        self.cells.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Whole-store snapshot keyed by address text.
    pub fn serialize(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|(cell_ref, raw)| (cell_ref.to_string(), raw.clone()))
            .collect()
    }

    /// Replace the whole store from a snapshot.
    ///
    /// Keys that are not valid addresses are skipped with a warning; empty
    /// values are dropped so the presence invariant holds.
    pub fn load<K, V, I>(&mut self, snapshot: I) -> usize
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.cells.clear();
        let mut skipped = 0;
        for (key, raw) in snapshot {
            let key = key.as_ref();
            match CellRef::from_str(key) {
                Some(cell_ref) => {
                    self.set(cell_ref, raw);
                }
                None => {
                    log::warn!("skipping snapshot entry with invalid address {key:?}");
                    skipped += 1;
                }
            }
        }
        log::debug!("loaded {} cells ({} skipped)", self.cells.len(), skipped);
        skipped
    }
}
