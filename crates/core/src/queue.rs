//! Doubly-linked, ID-indexed task queue.
//!
//! Nodes live in a slab (`Vec<Option<Slot>>`); `prev`/`next` are slot
//! indices rather than references, and a freed slot's index is recycled
//! from `free`. This keeps add/delete/move/get/exists O(1) without
//! reference counting or unsafe code.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::QueueError;
use crate::task::{TaskId, TaskRecord, TaskView};

#[derive(Debug, Clone)]
struct Slot {
    id: TaskId,
    duration: f64,
    done_date: f64,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Default)]
struct Inner {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    index: HashMap<TaskId, usize>,
    first: Option<usize>,
    last: Option<usize>,
}

impl Inner {
    fn alloc(&mut self, slot: Slot) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    fn slot(&self, idx: usize) -> &Slot {
        self.slots[idx].as_ref().expect("live index entries point at live slots")
    }

    fn view(&self, idx: usize) -> TaskView {
        let slot = self.slot(idx);
        TaskView {
            id: slot.id,
            duration: slot.duration,
            done_date: slot.done_date,
            prev: slot.prev.map(|p| self.slot(p).id),
            next: slot.next.map(|n| self.slot(n).id),
        }
    }

    /// Detach `idx` from the chain, fixing its neighbors and first/last.
    /// Leaves the ID index untouched.
    fn unlink_at(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = self.slot(idx);
            (slot.prev, slot.next)
        };
        if let Some(p) = prev {
            self.slots[p].as_mut().expect("live slot").next = next;
        }
        if let Some(n) = next {
            self.slots[n].as_mut().expect("live slot").prev = prev;
        }
        if self.first == Some(idx) {
            self.first = next;
        }
        if self.last == Some(idx) {
            self.last = prev;
        }
    }

    /// Splice a detached `idx` in immediately after `prev_idx`.
    fn splice_after(&mut self, idx: usize, prev_idx: usize) {
        let old_next = self.slot(prev_idx).next;
        {
            let slot = self.slots[idx].as_mut().expect("live slot");
            slot.prev = Some(prev_idx);
            slot.next = old_next;
        }
        if let Some(n) = old_next {
            self.slots[n].as_mut().expect("live slot").prev = Some(idx);
        }
        self.slots[prev_idx].as_mut().expect("live slot").next = Some(idx);
        if self.last == Some(prev_idx) {
            self.last = Some(idx);
        }
    }

    /// Insert a detached `idx` as the new head.
    fn push_front(&mut self, idx: usize) {
        let old_first = self.first;
        {
            let slot = self.slots[idx].as_mut().expect("live slot");
            slot.prev = None;
            slot.next = old_first;
        }
        if let Some(f) = old_first {
            self.slots[f].as_mut().expect("live slot").prev = Some(idx);
        }
        self.first = Some(idx);
        if self.last.is_none() {
            self.last = Some(idx);
        }
    }
}

/// One tenant's ordered queue of tasks. Safe to share across threads: every
/// operation takes its own lock for the duration of the call.
pub struct TaskQueue {
    pub employer_id: i32,
    inner: Mutex<Inner>,
}

impl TaskQueue {
    pub fn new(employer_id: i32) -> Self {
        Self { employer_id, inner: Mutex::new(Inner::default()) }
    }

    /// Rebuild a queue from a persisted, already-ordered list of tasks
    /// (used by recovery to seed a queue without re-deriving order).
    pub fn from_ordered(employer_id: i32, tasks: &[TaskRecord]) -> Self {
        let queue = Self::new(employer_id);
        {
            let mut inner = queue.inner.lock();
            for task in tasks {
                let idx = inner.alloc(Slot {
                    id: task.id,
                    duration: task.duration,
                    done_date: task.done_date,
                    prev: inner.last,
                    next: None,
                });
                if let Some(last) = inner.last {
                    inner.slots[last].as_mut().expect("live slot").next = Some(idx);
                } else {
                    inner.first = Some(idx);
                }
                inner.last = Some(idx);
                inner.index.insert(task.id, idx);
            }
        }
        queue
    }

    pub fn add(&self, task: TaskRecord, prev: Option<TaskId>) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        if inner.index.contains_key(&task.id) {
            return Err(QueueError::Conflict(task.id));
        }
        let prev_idx = match prev {
            Some(id) => Some(*inner.index.get(&id).ok_or(QueueError::InvalidPrev)?),
            None => None,
        };

        let idx = inner.alloc(Slot {
            id: task.id,
            duration: task.duration,
            done_date: task.done_date,
            prev: None,
            next: None,
        });

        if inner.first.is_none() {
            inner.first = Some(idx);
            inner.last = Some(idx);
        } else {
            let after = prev_idx.unwrap_or_else(|| inner.last.expect("non-empty queue has a last"));
            inner.splice_after(idx, after);
        }
        inner.index.insert(task.id, idx);
        Ok(())
    }

    pub fn get(&self, id: TaskId) -> Option<TaskView> {
        let inner = self.inner.lock();
        inner.index.get(&id).map(|&idx| inner.view(idx))
    }

    pub fn exists(&self, id: TaskId) -> bool {
        self.inner.lock().index.contains_key(&id)
    }

    /// Detach a task from the chain without removing it from the ID index.
    pub fn unlink(&self, id: TaskId) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(&id).ok_or(QueueError::NotFound(id))?;
        inner.unlink_at(idx);
        Ok(())
    }

    /// Unlink and remove from the index. Returns the id that was `next`
    /// before removal (the task now at that position), if any.
    pub fn delete(&self, id: TaskId) -> Result<Option<TaskId>, QueueError> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(&id).ok_or(QueueError::NotFound(id))?;
        let next_id = inner.slot(idx).next.map(|n| inner.slot(n).id);
        inner.unlink_at(idx);
        inner.index.remove(&id);
        inner.slots[idx] = None;
        inner.free.push(idx);
        Ok(next_id)
    }

    /// Overwrite `duration`/`done_date` of an existing task. IDs and
    /// sibling pointers are immutable by this operation.
    pub fn update(&self, task: TaskRecord) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(&task.id).ok_or(QueueError::NotFound(task.id))?;
        let slot = inner.slots[idx].as_mut().expect("live slot");
        slot.duration = task.duration;
        slot.done_date = task.done_date;
        Ok(())
    }

    pub fn move_task(&self, id: TaskId, prev: Option<TaskId>) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(&id).ok_or(QueueError::NotFound(id))?;
        let prev_idx = match prev {
            Some(pid) => {
                if pid == id {
                    return Err(QueueError::InvalidPrev);
                }
                Some(*inner.index.get(&pid).ok_or(QueueError::InvalidPrev)?)
            }
            None => None,
        };

        inner.unlink_at(idx);
        match prev_idx {
            Some(after) => inner.splice_after(idx, after),
            None => inner.push_front(idx),
        }
        Ok(())
    }

    /// Tasks from `from` (inclusive, default head) through `to` (inclusive,
    /// default tail). If `to` is given but lies before `from` in the chain,
    /// returns an empty sequence rather than an error.
    pub fn tasks(
        &self,
        from: Option<TaskId>,
        to: Option<TaskId>,
    ) -> Result<Vec<TaskView>, QueueError> {
        let inner = self.inner.lock();
        if let Some(id) = from {
            if !inner.index.contains_key(&id) {
                return Err(QueueError::NotFound(id));
            }
        }
        if let Some(id) = to {
            if !inner.index.contains_key(&id) {
                return Err(QueueError::NotFound(id));
            }
        }

        let start_idx = match from {
            Some(id) => inner.index[&id],
            None => match inner.first {
                Some(idx) => idx,
                None => return Ok(Vec::new()),
            },
        };
        let to_idx = to.map(|id| inner.index[&id]);

        let mut result = Vec::new();
        let mut current = Some(start_idx);
        while let Some(idx) = current {
            result.push(inner.view(idx));
            if Some(idx) == to_idx {
                return Ok(result);
            }
            if Some(idx) == inner.last {
                // Walked off the tail without ever meeting `to`: `to` must
                // lie before `from` in the chain. Legal, empty result.
                return Ok(if to_idx.is_some() { Vec::new() } else { result });
            }
            current = inner.slot(idx).next;
        }
        Ok(result)
    }

    pub fn first(&self) -> Option<TaskId> {
        let inner = self.inner.lock();
        inner.first.map(|idx| inner.slot(idx).id)
    }

    pub fn latest(&self) -> Option<TaskId> {
        let inner = self.inner.lock();
        inner.last.map(|idx| inner.slot(idx).id)
    }

    /// Snapshot the queue's current order as a plain list, for persistence.
    pub fn ordered_tasks(&self) -> Vec<TaskRecord> {
        let inner = self.inner.lock();
        let mut result = Vec::new();
        let mut current = inner.first;
        while let Some(idx) = current {
            let slot = inner.slot(idx);
            result.push(TaskRecord { id: slot.id, duration: slot.duration, done_date: slot.done_date });
            current = slot.next;
        }
        result
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
