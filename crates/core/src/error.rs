use thiserror::Error;

use crate::task::TaskId;

/// Errors raised by [`crate::TaskQueue`] operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("Task with id {0} already exists in the queue")]
    Conflict(TaskId),

    #[error("Task with id {0} does not exist in the queue")]
    NotFound(TaskId),

    #[error("prev_task is not in the queue")]
    InvalidPrev,
}

/// Errors raised by [`crate::QueueManager`] lifecycle operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ManagerError {
    #[error("No queue for employer_id {0}")]
    NotFound(i32),

    #[error("Queue for employer_id {0} already exists")]
    Conflict(i32),
}
