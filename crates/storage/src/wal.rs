//! The append-only operation log (`<employer_id>.log`).
//!
//! Each line is an independently decodable JSON [`Operation`]. Corruption
//! — a partial write from a crash mid-append — is tolerated: `open` keeps
//! every line up to the first one that fails to parse, rotates the
//! original file aside, and rewrites a clean log with just the valid
//! prefix.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::record::Operation;

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Parse the lines of `raw` as operations, stopping at (and not including)
/// the first line that fails to decode as UTF-8 JSON.
fn valid_prefix(raw: &[u8]) -> (Vec<Operation>, usize) {
    let mut ops = Vec::new();
    let mut valid_lines = 0;
    for line in raw.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let Ok(text) = std::str::from_utf8(line) else { break };
        let Ok(op) = serde_json::from_str::<Operation>(text) else { break };
        ops.push(op);
        valid_lines += 1;
    }
    (ops, valid_lines)
}

pub struct Wal {
    path: PathBuf,
    file: File,
    line_count: usize,
}

impl Wal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();

        let line_count = if path.exists() {
            let raw = fs::read(&path)?;
            let (ops, valid_lines) = valid_prefix(&raw);
            let total_lines = raw.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();
            if valid_lines < total_lines {
                tracing::warn!(path = %path.display(), "WAL has trailing corruption, rotating aside");
                let bak = rotate_bak_path(&path);
                fs::rename(&path, &bak)?;
                let mut clean = File::create(&path)?;
                for op in &ops {
                    writeln!(clean, "{}", serde_json::to_string(op)?)?;
                }
                clean.flush()?;
            }
            valid_lines
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file, line_count })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Append one operation and flush it to the OS immediately. The
    /// caller's durability guarantee ends here, before any snapshot write.
    pub fn append(&mut self, op: &Operation) -> Result<(), PersistenceError> {
        let line = serde_json::to_string(op)?;
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        self.line_count += 1;
        Ok(())
    }

    /// Decoded operations starting at line `offset` (0-based), stopping at
    /// the first line (if any) that fails to decode.
    pub fn entries_from(&self, offset: usize) -> Result<Vec<Operation>, PersistenceError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut result = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let Ok(line) = line else { break };
            if line.is_empty() {
                continue;
            }
            let Ok(op) = serde_json::from_str::<Operation>(&line) else { break };
            if idx >= offset {
                result.push(op);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
