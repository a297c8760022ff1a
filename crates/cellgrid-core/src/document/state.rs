use std::path::PathBuf;

use cellgrid_engine::engine::{DisplayMap, Sheet};

use crate::config::SheetConfig;
use crate::error::Result;

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// Raw cell contents and grid bounds
    pub(crate) sheet: Sheet,
    /// Configuration the sheet was created with
    pub config: SheetConfig,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last load/save
    pub modified: bool,
    /// Result of the most recent recompute pass
    pub(crate) display: DisplayMap,
}

impl Document {
    /// Create an empty document.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new(config: SheetConfig) -> Self {
        let sheet = Sheet::new(config.bounds());
        let display = sheet.recompute_all();
        Document {
            sheet,
            config,
            file_path: None,
            modified: false,
            display,
        }
    }

    /// Create a new document and load a file if provided.
    /// A path that does not exist yet becomes the save target.
    pub fn with_file(path: Option<PathBuf>, config: SheetConfig) -> Result<Self> {
        let mut doc = Self::new(config);
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
            }
        }
        Ok(doc)
    }

    /// Values from the most recent recompute.
    pub fn display(&self) -> &DisplayMap {
        &self.display
    }

    /// Run a fresh evaluation pass over the whole sheet.
    pub fn recalculate(&mut self) {
        self.display = self.sheet.recompute_all();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}
