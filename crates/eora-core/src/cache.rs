//! JSON cache of extracted records.
//!
//! Written once after extraction so later startups can rebuild the index
//! without scraping again. UTF-8, four-space indentation, non-ASCII text kept
//! verbatim.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::RawRecord;

pub fn save_records(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::cache(path, e))?;
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser).map_err(|e| Error::cache(path, e))?;
    fs::write(path, buf).map_err(|e| Error::cache(path, e))
}

pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = fs::read_to_string(path).map_err(|e| Error::cache(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::cache(path, e))
}
