use serde::{Deserialize, Serialize};

/// A task's identifier. Stable and unique within one tenant's queue.
pub type TaskId = u32;

/// The mutable payload of a task, independent of its position in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub duration: f64,
    pub done_date: f64,
}

/// A read-only view of a task as it currently sits in the queue, including
/// its neighbors. Returned by lookups; does not borrow the queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub duration: f64,
    pub done_date: f64,
    pub prev: Option<TaskId>,
    pub next: Option<TaskId>,
}
