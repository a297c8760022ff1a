//! Sheet configuration loaded from TOML.
//!
//! ```toml
//! rows = 250
//! ```
//!
//! The default location is `config.toml` in the platform config directory
//! (e.g. `~/.config/cellgrid/config.toml`). A missing default file means
//! defaults; an explicitly requested file must exist.

use std::path::{Path, PathBuf};

use cellgrid_engine::engine::{DEFAULT_ROW_COUNT, GridBounds};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CellgridError, Result};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Upper limit on configured rows.
pub const MAX_ROWS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Number of rows in the grid. Columns are fixed at `A`..`Z`.
    pub rows: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: DEFAULT_ROW_COUNT,
        }
    }
}

impl SheetConfig {
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.rows)
    }

    /// Parse and validate TOML content. `path` is only used in messages.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        let config: SheetConfig = toml::from_str(content).map_err(|err| CellgridError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        if config.rows == 0 || config.rows > MAX_ROWS {
            return Err(CellgridError::Config {
                path: path.to_path_buf(),
                message: format!("rows must be between 1 and {MAX_ROWS}, got {}", config.rows),
            });
        }
        Ok(config)
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(CellgridError::Config {
                path: path.to_path_buf(),
                message: format!(
                    "file too large ({} bytes, max {})",
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content, path)?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load `requested` if given, otherwise the user config file if present.
    pub fn load_or_default(requested: Option<&Path>) -> Result<Self> {
        if let Some(path) = requested {
            return Self::load(path);
        }
        match user_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `config.toml` inside the platform config directory, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
