//! Full-sheet recomputation.
//!
//! Each pass starts from an empty memo and visiting set and evaluates every
//! address in the grid bounds. Nothing carries over between passes.

use std::collections::BTreeMap;

use super::cell::{CellStore, GridBounds};
use super::cell_ref::CellRef;
use super::eval::{FormulaEvaluator, Memo, Visiting};
use super::value::Value;

/// Resolved values for every address of one pass, row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayMap {
    values: BTreeMap<CellRef, Value>,
}

impl DisplayMap {
    pub fn get(&self, cell_ref: &CellRef) -> Option<&Value> {
        self.values.get(cell_ref)
    }

    /// Display text for an address; empty when out of bounds.
    pub fn display(&self, cell_ref: &CellRef) -> String {
        self.values.get(cell_ref).map(Value::display).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &Value)> {
        self.values.iter()
    }

    /// Addresses whose value is not empty text.
    pub fn populated(&self) -> impl Iterator<Item = (&CellRef, &Value)> {
        self.values.iter().filter(|(_, value)| !value.is_empty())
    }

    /// Bounding box of populated cells as (min_row, min_col, max_row, max_col).
    pub fn populated_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        self.populated().fold(None, |acc, (cell_ref, _)| {
            let (min_row, min_col, max_row, max_col) =
                acc.unwrap_or((cell_ref.row(), cell_ref.col(), cell_ref.row(), cell_ref.col()));
            Some((
                min_row.min(cell_ref.row()),
                min_col.min(cell_ref.col()),
                max_row.max(cell_ref.row()),
                max_col.max(cell_ref.col()),
            ))
        })
    }
}

impl FromIterator<(CellRef, Value)> for DisplayMap {
    fn from_iter<I: IntoIterator<Item = (CellRef, Value)>>(iter: I) -> Self {
        DisplayMap {
            values: iter.into_iter().collect(),
        }
    }
}

/// Evaluate every address in `bounds` against `store` with a fresh memo.
pub fn recompute_all(store: &CellStore, bounds: GridBounds) -> DisplayMap {
    let evaluator = FormulaEvaluator::new(store);
    let mut memo = Memo::new();
    let mut visiting = Visiting::new();

    let display: DisplayMap = bounds
        .iter()
        .map(|cell_ref| {
            let value = evaluator.evaluate(&cell_ref, &mut memo, &mut visiting);
            (cell_ref, value)
        })
        .collect();

    let errors = display
        .iter()
        .filter(|(_, value)| value.sentinel().is_some())
        .count();
    log::debug!(
        "recomputed {} cells ({} stored, {} memoized, {} errors)",
        display.len(),
        store.len(),
        memo.len(),
        errors
    );
    display
}
