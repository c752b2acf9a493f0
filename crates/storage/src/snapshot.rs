//! The compacted snapshot (`<employer_id>.bac`) and its companion apply
//! offset (`<employer_id>.offset`).

use std::fs;
use std::path::Path;

use taskq_core::TaskRecord;

use crate::error::PersistenceError;

/// The task list as of the last compaction. Missing file reads as empty.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<TaskRecord>, PersistenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Overwrite the snapshot atomically: write to a sibling temp file, then
/// rename it into place, so a crash mid-write never leaves a truncated
/// snapshot behind.
pub fn write(path: impl AsRef<Path>, tasks: &[TaskRecord]) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let tmp = path.with_extension("bac.tmp");
    fs::write(&tmp, serde_json::to_string(tasks)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Count of log records already folded into the snapshot. Missing file
/// reads as zero.
pub fn load_offset(path: impl AsRef<Path>) -> Result<usize, PersistenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(0);
    }
    let raw = fs::read_to_string(path)?;
    Ok(raw.trim().parse().unwrap_or(0))
}

pub fn write_offset(path: impl AsRef<Path>, offset: usize) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let tmp = path.with_extension("offset.tmp");
    fs::write(&tmp, offset.to_string())?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
