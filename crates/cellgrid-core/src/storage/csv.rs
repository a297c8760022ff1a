//! CSV export of display values.

use cellgrid_engine::engine::{CellRef, DisplayMap};
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

/// Write the recomputed grid to a CSV file.
pub fn write_csv(path: &Path, doc: &Document) -> Result<()> {
    std::fs::write(path, csv_content(doc.display()))?;
    Ok(())
}

/// Render the populated part of a display map as CSV, starting at row 1 and
/// column A so cell positions are preserved.
pub fn csv_content(display: &DisplayMap) -> String {
    let Some((_, _, max_row, max_col)) = display.populated_bounds() else {
        return String::new();
    };

    let mut out = String::new();
    for row in 0..=max_row {
        let fields: Vec<String> = (0..=max_col)
            .map(|col| escape_csv_field(&display.display(&CellRef::new(col, row))))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
