//! Collection storage - one YAML file per record
//!
//! Each collection is a flat directory of `<ID>.flock.yaml` files. Commands
//! load whole collections into memory, transform them, and write back.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::Record;

const RECORD_EXT: &str = ".flock.yaml";

/// Load every record in a collection directory, newest first.
///
/// Files that fail to parse are silently skipped, matching the loader's
/// tolerance for hand-edited records.
pub fn load_all<T: Record + 'static>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();

    if !dir.exists() {
        return Ok(records);
    }

    for entry in fs::read_dir(dir).map_err(|e| StoreError::Io(e.to_string()))? {
        let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
        let path = entry.path();

        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(RECORD_EXT))
        {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(record) = serde_yml::from_str::<T>(&content) {
                    records.push(record);
                }
            }
        }
    }

    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    Ok(records)
}

/// Find a record file by ID (supports partial matching on the file stem)
pub fn find_record_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    for entry in fs::read_dir(dir).ok()? {
        let entry = entry.ok()?;
        let path = entry.path();

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(stem) = name.strip_suffix(RECORD_EXT) {
                if stem == id || stem.starts_with(id) {
                    return Some(path);
                }
            }
        }
    }

    None
}

/// Load a single record by ID, returning the path and record if found
pub fn load<T: Record + 'static>(dir: &Path, id: &str) -> Result<Option<(PathBuf, T)>, StoreError> {
    if let Some(path) = find_record_file(dir, id) {
        let content = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        let record: T =
            serde_yml::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?;
        return Ok(Some((path, record)));
    }
    Ok(None)
}

/// Write a record to its collection directory
pub fn save<T: Record>(dir: &Path, record: &T) -> Result<PathBuf, StoreError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let yaml = to_yaml(record)?;
    let path = dir.join(format!("{}{}", record.id(), RECORD_EXT));
    fs::write(&path, yaml).map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(path)
}

/// Delete a record file by ID. Returns false if no file matched.
pub fn remove(dir: &Path, id: &str) -> Result<bool, StoreError> {
    match find_record_file(dir, id) {
        Some(path) => {
            fs::remove_file(&path).map_err(|e| StoreError::Io(e.to_string()))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Replace the whole collection: delete every record file, then write the
/// batch.
///
/// This is delete-then-insert with no rollback. A failure after deletion
/// leaves the collection incomplete; the error says so rather than masking
/// it.
pub fn replace_all<T: Record>(dir: &Path, batch: &[T]) -> Result<(), StoreError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    for entry in fs::read_dir(dir).map_err(|e| StoreError::Io(e.to_string()))? {
        let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
        let path = entry.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(RECORD_EXT))
        {
            fs::remove_file(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        }
    }

    for record in batch {
        let yaml = to_yaml(record)?;
        let path = dir.join(format!("{}{}", record.id(), RECORD_EXT));
        fs::write(&path, yaml).map_err(|e| StoreError::ReplaceIncomplete {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
    }

    Ok(())
}

fn to_yaml<T: Serialize>(record: &T) -> Result<String, StoreError> {
    serde_yml::to_string(record).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Errors raised by collection storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("failed to parse record: {0}")]
    Parse(String),

    #[error("failed to serialize record: {0}")]
    Serialize(String),

    #[error("replace aborted while writing {path}: {cause}. The collection was already cleared and may be incomplete; re-import to recover.")]
    ReplaceIncomplete { path: String, cause: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::ServiceGroup;
    use crate::entities::Visitor;
    use tempfile::tempdir;

    fn visitor(name: &str) -> Visitor {
        Visitor::new(name.to_string(), ServiceGroup::Adults)
    }

    #[test]
    fn test_load_all_empty_dir() {
        let dir = tempdir().unwrap();
        let records: Vec<Visitor> = load_all(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_all_nonexistent_dir() {
        let records: Vec<Visitor> = load_all(Path::new("/nonexistent/path")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let v = visitor("Jane Doe");
        save(dir.path(), &v).unwrap();

        let records: Vec<Visitor> = load_all(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Jane Doe");
        assert_eq!(records[0].id, v.id);
    }

    #[test]
    fn test_find_by_partial_id() {
        let dir = tempdir().unwrap();
        let v = visitor("Jane Doe");
        save(dir.path(), &v).unwrap();

        let id = v.id.to_string();
        assert!(find_record_file(dir.path(), &id[..12]).is_some());
        assert!(find_record_file(dir.path(), "VIS-NOPE").is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let v = visitor("Jane Doe");
        save(dir.path(), &v).unwrap();

        assert!(remove(dir.path(), &v.id.to_string()).unwrap());
        assert!(!remove(dir.path(), &v.id.to_string()).unwrap());
        let records: Vec<Visitor> = load_all(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let dir = tempdir().unwrap();
        save(dir.path(), &visitor("Old One")).unwrap();
        save(dir.path(), &visitor("Old Two")).unwrap();

        let batch = vec![visitor("New One")];
        replace_all(dir.path(), &batch).unwrap();

        let records: Vec<Visitor> = load_all(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "New One");
    }

    #[test]
    fn test_replace_all_with_empty_batch_empties_collection() {
        let dir = tempdir().unwrap();
        save(dir.path(), &visitor("Old One")).unwrap();

        let batch: Vec<Visitor> = Vec::new();
        replace_all(dir.path(), &batch).unwrap();

        let records: Vec<Visitor> = load_all(dir.path()).unwrap();
        assert!(records.is_empty());
    }
}
