//! Cell address parsing and formatting.
//!
//! Provides bidirectional conversion between single-letter spreadsheet
//! addresses (e.g., "A1", "B2", "Z100") and zero-indexed column/row
//! coordinates.
//!
//! # Examples
//!
//! ```
//! use cellgrid_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col(), 1); // 0-indexed
//! assert_eq!(cell.row(), 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Number of addressable columns (`A` through `Z`).
pub const COLUMN_COUNT: usize = 26;

/// A reference to a cell by column and row indices (0-indexed).
///
/// Ordering is row-major: fields are compared row first, then column.
/// The column is always below [`COLUMN_COUNT`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    row: usize,
    col: usize,
}

/// Returned by [`str::parse`] when text does not match the address grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell address: {0:?}")]
pub struct ParseCellRefError(pub String);

impl CellRef {
    /// # Panics
    ///
    /// Panics if `col` is not below [`COLUMN_COUNT`]. Use [`CellRef::try_new`]
    /// for columns that come from outside the grid.
    pub fn new(col: usize, row: usize) -> CellRef {
        match CellRef::try_new(col, row) {
            Some(cell_ref) => cell_ref,
            None => panic!("column {col} is outside A..Z"),
        }
    }

    pub fn try_new(col: usize, row: usize) -> Option<CellRef> {
        (col < COLUMN_COUNT).then_some(CellRef { row, col })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Parse a cell address from spreadsheet notation (e.g., "A1", "c12").
    ///
    /// Exactly one column letter is accepted. Leading zeros in the row are
    /// tolerated; row `0` is rejected since rows are 1-based in text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = address_re().captures(name)?;
        let letter = caps["letter"].as_bytes()[0].to_ascii_uppercase();
        let col = (letter - b'A') as usize;
        let row = caps["row"].parse::<usize>().ok()?.checked_sub(1)?;
        CellRef::try_new(col, row)
    }

    /// Convert a column index to its letter (0 -> A, 25 -> Z).
    /// Returns None for columns outside the single-letter range.
    pub fn col_to_letter(col: usize) -> Option<char> {
        if col < COLUMN_COUNT {
            Some((b'A' + col as u8) as char)
        } else {
            None
        }
    }
}

fn address_re() -> &'static Regex {
    static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<row>[0-9]+)$").expect("address regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = ParseCellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| ParseCellRefError(s.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'A' + self.col as u8) as char;
        write!(f, "{}{}", letter, self.row + 1)
    }
}
