use super::Document;
use crate::error::{CellgridError, Result};
use cellgrid_engine::engine::{CellRef, Value};

impl Document {
    /// Commit a raw value to a cell and recompute.
    /// An empty value clears the cell.
    pub fn set_cell(&mut self, cell_ref: CellRef, raw: &str) -> Result<()> {
        let bounds = self.sheet.bounds();
        if !bounds.contains(&cell_ref) {
            return Err(CellgridError::OutOfBounds {
                cell: cell_ref,
                rows: bounds.rows,
            });
        }

        let previous = self.sheet.set(cell_ref, raw);
        if previous.as_deref() != Some(raw) && !(previous.is_none() && raw.is_empty()) {
            self.modified = true;
        }
        log::debug!("set {cell_ref} = {raw:?}");
        self.recalculate();
        Ok(())
    }

    /// Commit a raw value to a cell given by its address text.
    pub fn set_cell_from_input(&mut self, address: &str, raw: &str) -> Result<CellRef> {
        let cell_ref: CellRef = address.trim().parse()?;
        self.set_cell(cell_ref, raw)?;
        Ok(cell_ref)
    }

    /// Apply an edit of the form `ADDR=VALUE`, e.g. `A1=10` or `B2==A1*2`.
    pub fn apply_edit(&mut self, edit: &str) -> Result<CellRef> {
        let Some((address, raw)) = edit.split_once('=') else {
            return Err(CellgridError::InvalidEdit(edit.to_string()));
        };
        if address.trim().is_empty() {
            return Err(CellgridError::InvalidEdit(edit.to_string()));
        }
        self.set_cell_from_input(address, raw)
    }

    pub fn clear_cell(&mut self, cell_ref: CellRef) -> Result<()> {
        self.set_cell(cell_ref, "")
    }

    /// Raw content of a cell as it would appear in a formula bar.
    pub fn raw(&self, cell_ref: &CellRef) -> Option<&str> {
        self.sheet.get(cell_ref)
    }

    /// Display text of a cell from the most recent recompute.
    pub fn get_cell_display(&self, cell_ref: &CellRef) -> String {
        self.display.display(cell_ref)
    }

    /// Evaluate a formula against the current contents without storing it.
    pub fn evaluate_formula(&self, raw: &str) -> Value {
        self.sheet.evaluate_formula(raw)
    }
}
