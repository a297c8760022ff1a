//! JSON snapshot files.
//!
//! A snapshot is the whole cell store as handed to persistence:
//!
//! ```json
//! { "cells": { "A1": { "value": "10" }, "A2": { "value": "=A1*2" } } }
//! ```
//!
//! Values may also be JSON numbers, which are kept as their text form, or
//! `null`, which is the same as an empty cell.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

const MAX_SNAPSHOT_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    cells: BTreeMap<String, CellData>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct CellData {
    #[serde(default, deserialize_with = "raw_value")]
    value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

fn raw_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(match raw {
        None => String::new(),
        Some(RawValue::Text(s)) => s,
        Some(RawValue::Number(n)) => n.to_string(),
        Some(RawValue::Bool(b)) => b.to_string(),
    })
}

/// Parse snapshot content into an address -> raw value mapping.
pub fn parse_snapshot_content(content: &str) -> Result<BTreeMap<String, String>> {
    let file: SnapshotFile = serde_json::from_str(content)?;
    Ok(file
        .cells
        .into_iter()
        .map(|(addr, cell)| (addr, cell.value))
        .collect())
}

/// Read a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<BTreeMap<String, String>> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SNAPSHOT_FILE_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: snapshot too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SNAPSHOT_FILE_BYTES
            ),
        )
        .into());
    }
    parse_snapshot_content(&fs::read_to_string(path)?)
}

/// Render a snapshot as pretty-printed JSON, keys sorted by address text.
pub fn write_snapshot_content(snapshot: &BTreeMap<String, String>) -> Result<String> {
    let file = SnapshotFile {
        cells: snapshot
            .iter()
            .filter(|(_, raw)| !raw.is_empty())
            .map(|(addr, raw)| (addr.clone(), CellData { value: raw.clone() }))
            .collect(),
    };
    let mut content = serde_json::to_string_pretty(&file)?;
    content.push('\n');
    Ok(content)
}

/// Write a snapshot file.
pub fn write_snapshot(path: &Path, snapshot: &BTreeMap<String, String>) -> Result<()> {
    fs::write(path, write_snapshot_content(snapshot)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CellgridError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_applet_shape() {
        let content = r#"{"cells": {"A1": {"value": "10"}, "B2": {"value": "=A1*2"}}}"#;
        let snapshot = parse_snapshot_content(content).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["A1"], "10");
        assert_eq!(snapshot["B2"], "=A1*2");
    }

    #[test]
    fn test_parse_numbers_and_nulls() {
        let content = r#"{"cells": {"A1": {"value": 42}, "A2": {"value": 1.5}, "A3": {"value": null}, "A4": {}}}"#;
        let snapshot = parse_snapshot_content(content).unwrap();
        assert_eq!(snapshot["A1"], "42");
        assert_eq!(snapshot["A2"], "1.5");
        assert_eq!(snapshot["A3"], "");
        assert_eq!(snapshot["A4"], "");
    }

    #[test]
    fn test_parse_missing_cells_key() {
        assert!(parse_snapshot_content("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_snapshot_content("not json"),
            Err(CellgridError::Json(_))
        ));
    }

    #[test]
    fn test_write_skips_empty_values() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert("A1".to_string(), "1".to_string());
        snapshot.insert("A2".to_string(), String::new());
        let content = write_snapshot_content(&snapshot).unwrap();
        assert!(content.contains("\"A1\""));
        assert!(!content.contains("\"A2\""));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.json");

        let mut snapshot = BTreeMap::new();
        snapshot.insert("A1".to_string(), "hello \"world\"".to_string());
        snapshot.insert("C3".to_string(), "=SUM(A1:B2)".to_string());
        write_snapshot(&path, &snapshot).unwrap();

        assert_eq!(read_snapshot(&path).unwrap(), snapshot);
    }
}
