//! Markdown export functionality

use cellgrid_engine::engine::{CellRef, DisplayMap};
use std::fmt::Write as _;
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

/// Write the recomputed grid to a markdown file
pub fn write_markdown(path: &Path, doc: &Document) -> Result<()> {
    std::fs::write(path, markdown_content(doc.display()))?;
    Ok(())
}

/// Render the populated part of a display map as a markdown table.
pub fn markdown_content(display: &DisplayMap) -> String {
    let mut out = String::from("# Sheet\n\n");

    let Some((min_row, min_col, max_row, max_col)) = display.populated_bounds() else {
        out.push_str("*Empty spreadsheet*\n");
        return out;
    };

    // Header with column letters
    out.push_str("|   |");
    for col in min_col..=max_col {
        let letter = CellRef::col_to_letter(col).unwrap_or('?');
        let _ = write!(out, " {} |", letter);
    }
    out.push('\n');

    out.push_str("|---|");
    for col in min_col..=max_col {
        // Numbers align right, like the grid view.
        let numeric = (min_row..=max_row).any(|row| {
            display
                .get(&CellRef::new(col, row))
                .is_some_and(|value| value.is_number())
        });
        out.push_str(if numeric { "---:|" } else { "---|" });
    }
    out.push('\n');

    for row in min_row..=max_row {
        let _ = write!(out, "| {} |", row + 1); // 1-based row numbers
        for col in min_col..=max_col {
            let text = display.display(&CellRef::new(col, row));
            let _ = write!(out, " {} |", escape_markdown(&text));
        }
        out.push('\n');
    }

    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
