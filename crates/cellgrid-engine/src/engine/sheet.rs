//! The engine instance handed to the surrounding application.

use std::collections::BTreeMap;

use super::cell::{CellStore, GridBounds};
use super::cell_ref::CellRef;
use super::eval::{FormulaEvaluator, Memo, Visiting};
use super::recalc::{DisplayMap, recompute_all};
use super::value::Value;

/// A cell store plus the bounds a recompute pass covers.
///
/// All evaluation state is created per call; a `Sheet` holds only raw
/// contents between calls.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    store: CellStore,
    bounds: GridBounds,
}

impl Sheet {
    pub fn new(bounds: GridBounds) -> Self {
        Sheet {
            store: CellStore::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    /// Commit an edit. An empty value clears the cell.
    pub fn set(&mut self, cell_ref: CellRef, raw: impl Into<String>) -> Option<String> {
        self.store.set(cell_ref, raw)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&str> {
        self.store.get(cell_ref)
    }

    pub fn clear(&mut self) {
        self.store = CellStore::new();
    }

    /// Evaluate one address in a fresh pass.
    pub fn evaluate(&self, cell_ref: &CellRef) -> Value {
        FormulaEvaluator::new(&self.store).evaluate(cell_ref, &mut Memo::new(), &mut Visiting::new())
    }

    /// Evaluate a raw value as if typed into a cell, without storing it.
    pub fn evaluate_formula(&self, raw: &str) -> Value {
        FormulaEvaluator::new(&self.store).evaluate_raw(raw, &mut Memo::new(), &mut Visiting::new())
    }

    pub fn recompute_all(&self) -> DisplayMap {
        recompute_all(&self.store, self.bounds)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.store.serialize()
    }

    /// Replace the contents from a snapshot. Returns the number of skipped entries.
    pub fn load<K, V, I>(&mut self, snapshot: I) -> usize
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.store.load(snapshot)
    }
}
