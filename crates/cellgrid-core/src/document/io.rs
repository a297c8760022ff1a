use super::Document;
use crate::error::{CellgridError, Result};
use crate::storage::{read_snapshot, write_snapshot};
use std::path::{Path, PathBuf};

impl Document {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(CellgridError::NoFilePath);
        };
        self.save_file_as(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<()> {
        write_snapshot(path, &self.sheet.snapshot())?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        log::debug!("saved {} cells to {}", self.sheet.store().len(), path.display());
        Ok(())
    }

    /// Load from file, replacing the current contents.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        // Parse fully before touching state so a bad file leaves the document as-is.
        let snapshot = read_snapshot(path)?;

        let skipped = self.sheet.load(snapshot);
        if skipped > 0 {
            log::warn!("{}: skipped {} invalid addresses", path.display(), skipped);
        }

        let bounds = self.sheet.bounds();
        let outside = self
            .sheet
            .store()
            .iter()
            .filter(|(cell_ref, _)| !bounds.contains(cell_ref))
            .count();
        if outside > 0 {
            log::warn!(
                "{}: {} cells lie outside the {}-row sheet and are not displayed",
                path.display(),
                outside,
                bounds.rows
            );
        }

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        self.recalculate();
        Ok(())
    }
}
