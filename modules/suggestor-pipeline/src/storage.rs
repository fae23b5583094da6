//! JSON files at the pipeline's boundaries.
//!
//! Every write goes to a temp file in the destination directory and is then
//! renamed over the target, so readers see the old file or the new one.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use suggestor_common::{ContentItem, Result, SuggestorError};
use tracing::{debug, warn};

use crate::clean::clean;

/// Pretty-print `value` to `path` atomically. Non-ASCII text is written as-is.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| SuggestorError::io(dir, e))?;

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SuggestorError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| SuggestorError::json(path, e))?;
        writer.flush().map_err(|e| SuggestorError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| SuggestorError::io(path, e.error))?;
    debug!(path = %path.display(), "Wrote JSON file");
    Ok(())
}

/// Read a top-level JSON array. A missing file reads as empty.
pub fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "File not found, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(SuggestorError::io(path, e)),
    };
    match serde_json::from_str(&raw).map_err(|e| SuggestorError::json(path, e))? {
        Value::Array(items) => Ok(items),
        _ => Err(SuggestorError::Validation(format!(
            "{} does not contain a JSON array",
            path.display()
        ))),
    }
}

/// Serialize items and strip empty fields.
pub fn to_clean_values(items: &[ContentItem]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item)
                .map(clean)
                .map_err(|e| SuggestorError::Validation(format!("unserializable item: {e}")))
        })
        .collect()
}

/// Write canonical items, cleaned, as one JSON array. Returns what was written.
pub fn write_items(path: &Path, items: &[ContentItem]) -> Result<Vec<Value>> {
    let values = to_clean_values(items)?;
    write_json_atomic(path, &values)?;
    Ok(values)
}

/// Read canonical items back. Entries that no longer parse are skipped.
pub fn read_items(path: &Path) -> Result<Vec<ContentItem>> {
    let values = read_json_array(path)?;
    let total = values.len();
    let items: Vec<ContentItem> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable canonical item");
                None
            }
        })
        .collect();
    if items.len() < total {
        warn!(read = items.len(), total, path = %path.display(), "Some canonical items were skipped");
    }
    Ok(items)
}

/// The raw-record buffer scrapers append to and the router drains.
///
/// Appends and the drain must not overlap: scraping finishes before
/// normalization starts.
#[derive(Debug, Clone)]
pub struct RawBuffer {
    path: PathBuf,
}

impl RawBuffer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a run with an empty buffer.
    pub fn reset(&self) -> Result<()> {
        write_json_atomic(&self.path, &Vec::<Value>::new())
    }

    /// Append records and return the new buffer size.
    pub fn append(&self, records: Vec<Value>) -> Result<usize> {
        let mut all = self.load()?;
        all.extend(records);
        write_json_atomic(&self.path, &all)?;
        Ok(all.len())
    }

    pub fn load(&self) -> Result<Vec<Value>> {
        read_json_array(&self.path)
    }

    /// Empty the buffer after its records were consumed.
    pub fn clear(&self) -> Result<()> {
        self.reset()
    }
}
