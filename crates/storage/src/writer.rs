//! The per-tenant background writer: the single consumer that folds
//! logged operations into the compacted snapshot and advances the offset.
//!
//! A session thread only ever appends to the WAL and pushes onto this
//! writer's channel; it never touches the snapshot or offset files
//! itself, so there is exactly one writer per tenant at any time.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use taskq_core::TaskRecord;

use crate::record::{self, Operation};
use crate::snapshot;

pub struct Writer {
    sender: Option<mpsc::Sender<Operation>>,
    handle: Option<JoinHandle<()>>,
}

impl Writer {
    /// Spawn the writer thread, seeded with the task list and offset
    /// recovery already reconciled (see [`crate::manager::PersistenceManager::recover`]).
    pub fn spawn(employer_id: i32, base_dir: PathBuf, tasks: Vec<TaskRecord>, offset: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Operation>();
        let snapshot_path = base_dir.join(format!("{employer_id}.bac"));
        let offset_path = base_dir.join(format!("{employer_id}.offset"));

        let handle = thread::Builder::new()
            .name(format!("taskq-writer-{employer_id}"))
            .spawn(move || run(rx, employer_id, snapshot_path, offset_path, tasks, offset))
            .expect("spawning a persistence writer thread");

        Self { sender: Some(tx), handle: Some(handle) }
    }

    /// Enqueue an already-WAL-appended operation for compaction. Never
    /// blocks; if the writer has already exited after a fatal I/O error,
    /// the send is silently dropped -- durability for this tenant is then
    /// best-effort, per the failure semantics of this persistence layer.
    pub fn submit(&self, op: Operation) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(op);
        }
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        // Closing the channel unblocks the writer thread's `recv()`.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    rx: mpsc::Receiver<Operation>,
    employer_id: i32,
    snapshot_path: PathBuf,
    offset_path: PathBuf,
    mut tasks: Vec<TaskRecord>,
    mut offset: usize,
) {
    while let Ok(op) = rx.recv() {
        record::apply(&mut tasks, &op);
        offset += 1;
        if let Err(err) = snapshot::write(&snapshot_path, &tasks) {
            tracing::error!(employer_id, %err, "persistence writer failed to write snapshot, exiting");
            return;
        }
        if let Err(err) = snapshot::write_offset(&offset_path, offset) {
            tracing::error!(employer_id, %err, "persistence writer failed to write offset, exiting");
            return;
        }
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
