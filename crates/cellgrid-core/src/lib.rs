//! cellgrid-core - UI-agnostic document model, configuration and storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::SheetConfig;
pub use document::Document;
pub use error::{CellgridError, Result};

pub use cellgrid_engine::engine::{CellRef, Value};
