//! Spreadsheet engine API.
//!
//! This module provides the computation engine for the spreadsheet:
//!
//! - [`CellRef`] - Cell address parsing (A1 notation ↔ column/row indices)
//! - [`CellStore`], [`GridBounds`] - Sparse raw-content storage and sheet extent
//! - [`FormulaEvaluator`] - Depth-first formula resolution with cycle detection
//! - [`expr::evaluate`] - Closed-grammar arithmetic
//! - [`recompute_all`], [`DisplayMap`] - Full-sheet recomputation
//! - [`Sheet`] - Engine instance combining the above
//! - [`Value`], [`Sentinel`] - Evaluation results

mod cell;
mod cell_ref;
mod eval;
pub mod expr;
mod format;
mod recalc;
mod sheet;
mod value;

pub use cell::{CellStore, DEFAULT_ROW_COUNT, GridBounds};
pub use cell_ref::{COLUMN_COUNT, CellRef, ParseCellRefError};
pub use eval::{FormulaEvaluator, Memo, Visiting};
pub use expr::ExprError;
pub use format::format_number;
pub use recalc::{DisplayMap, recompute_all};
pub use sheet::Sheet;
pub use value::{Sentinel, Value, leading_number};
