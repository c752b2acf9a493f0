//! Registry of per-tenant persistence state: WAL handle plus background
//! writer, keyed by `employer_id`, rooted under one base directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use taskq_core::TaskRecord;

use crate::error::PersistenceError;
use crate::record::{self, Operation};
use crate::snapshot;
use crate::wal::Wal;
use crate::writer::Writer;

struct Tenant {
    wal: Mutex<Wal>,
    /// The reconciled task list, updated synchronously as operations are
    /// logged. Authoritative for `recover`'s idempotent path -- independent
    /// of the writer thread's own copy, which only exists to drive the
    /// asynchronous snapshot/offset files and may lag behind this one.
    state: Mutex<Vec<TaskRecord>>,
    writer: Writer,
}

pub struct PersistenceManager {
    base_dir: PathBuf,
    tenants: Mutex<HashMap<i32, Tenant>>,
}

impl PersistenceManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), tenants: Mutex::new(HashMap::new()) }
    }

    fn log_path(&self, employer_id: i32) -> PathBuf {
        self.base_dir.join(format!("{employer_id}.log"))
    }

    fn snapshot_path(&self, employer_id: i32) -> PathBuf {
        self.base_dir.join(format!("{employer_id}.bac"))
    }

    fn offset_path(&self, employer_id: i32) -> PathBuf {
        self.base_dir.join(format!("{employer_id}.offset"))
    }

    /// Reconcile snapshot + WAL tail for a tenant, start its background
    /// writer, and return the reconciled task list. Safe to call for a
    /// tenant with no persisted files yet -- it starts from empty.
    ///
    /// Idempotent: a tenant already registered is returned as-is without
    /// re-reading disk, from the tenant's own synchronously-updated
    /// in-memory copy rather than the (asynchronously lagging) writer.
    pub fn recover(&self, employer_id: i32) -> Result<Vec<TaskRecord>, PersistenceError> {
        {
            let tenants = self.tenants.lock();
            if let Some(tenant) = tenants.get(&employer_id) {
                return Ok(tenant.state.lock().clone());
            }
        }

        fs::create_dir_all(&self.base_dir)?;
        let snapshot_path = self.snapshot_path(employer_id);
        let offset_path = self.offset_path(employer_id);

        let mut tasks = snapshot::load(&snapshot_path)?;
        let mut offset = snapshot::load_offset(&offset_path)?;

        let wal = Wal::open(self.log_path(employer_id))?;
        let tail = wal.entries_from(offset)?;
        if !tail.is_empty() {
            for op in &tail {
                record::apply(&mut tasks, op);
                offset += 1;
            }
            snapshot::write(&snapshot_path, &tasks)?;
            snapshot::write_offset(&offset_path, offset)?;
            tracing::info!(employer_id, replayed = tail.len(), "replayed WAL tail during recovery");
        }

        let writer = Writer::spawn(employer_id, self.base_dir.clone(), tasks.clone(), offset);
        let tenant = Tenant { wal: Mutex::new(wal), state: Mutex::new(tasks.clone()), writer };
        self.tenants.lock().insert(employer_id, tenant);
        Ok(tasks)
    }

    /// Durably record one queue mutation. The WAL append is the
    /// durability boundary: it completes before this call returns, while
    /// folding the operation into the compacted snapshot happens
    /// asynchronously on the tenant's writer thread.
    pub fn log(&self, employer_id: i32, op: Operation) -> Result<(), PersistenceError> {
        self.recover(employer_id)?;
        let tenants = self.tenants.lock();
        let tenant = tenants.get(&employer_id).expect("recover just registered this tenant");
        tenant.wal.lock().append(&op)?;
        record::apply(&mut tenant.state.lock(), &op);
        tenant.writer.submit(op);
        Ok(())
    }

    /// Drop the in-memory writer (joining its thread) and delete the
    /// tenant's persisted files.
    pub fn clear(&self, employer_id: i32) -> Result<(), PersistenceError> {
        self.tenants.lock().remove(&employer_id);
        for path in [self.log_path(employer_id), self.snapshot_path(employer_id), self.offset_path(employer_id)]
        {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Scan `base_dir` for `<employer_id>.log` files, the durable signal that a
/// tenant has persisted state to recover at startup.
pub fn discover_tenants(base_dir: &Path) -> Result<Vec<i32>, PersistenceError> {
    let mut ids = Vec::new();
    if !base_dir.exists() {
        return Ok(ids);
    }
    for entry in fs::read_dir(base_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }
        if let Some(id) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<i32>().ok()) {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
