//! Snapshot persistence and exports.

mod csv;
mod json;
mod md;

pub use csv::{csv_content, write_csv};
pub use json::{parse_snapshot_content, read_snapshot, write_snapshot, write_snapshot_content};
pub use md::{markdown_content, write_markdown};
