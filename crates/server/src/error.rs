use thiserror::Error;

use taskq_core::QueueError;

/// Client-visible failure reasons. `Display` text for most variants is
/// the exact string the wire protocol sends back, so changing wording
/// here is a wire-compatibility change.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("You must be authenticated to perform this action.")]
    Unauthenticated,

    #[error("No queue for employer_id {0}")]
    QueueNotFound(i32),

    #[error("Queue for employer_id {0} already exists")]
    QueueConflict(i32),

    #[error("Task not found.")]
    TaskNotFound,

    #[error("'prev_task_id' is invalid. May be the task not in the queue.")]
    InvalidPrevTaskId,

    #[error("'from_task_id' is invalid. May be the task not in the queue.")]
    InvalidFromTaskId,

    #[error("'to_task_id' is invalid. May be the task not in the queue.")]
    InvalidToTaskId,

    /// Bubbled up verbatim: a handler that doesn't pre-validate before
    /// calling into the queue (only `add`, for the duplicate-id case).
    #[error("{0}")]
    Queue(#[from] QueueError),

    #[error("persistence error: {0}")]
    Persistence(#[from] taskq_storage::PersistenceError),
}
