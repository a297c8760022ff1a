//! Error types for Cellgrid core.

use std::path::PathBuf;

use cellgrid_engine::engine::{CellRef, ParseCellRefError};
use thiserror::Error;

/// Errors that can occur outside of formula evaluation.
///
/// Evaluation itself never fails; it produces sentinel values instead.
#[derive(Error, Debug)]
pub enum CellgridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    InvalidAddress(#[from] ParseCellRefError),

    #[error("{cell} is outside the sheet ({rows} rows)")]
    OutOfBounds { cell: CellRef, rows: usize },

    #[error("Invalid edit {0:?}: expected ADDR=VALUE")]
    InvalidEdit(String),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, CellgridError>;
