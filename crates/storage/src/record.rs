//! The durable representation of a queue mutation, and the pure function
//! that folds a sequence of them into a snapshot.

use serde::{Deserialize, Serialize};
use taskq_core::{TaskId, TaskRecord};

/// One logged mutation. Self-describing: decoding a line never needs
/// context beyond the line itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    Add { task: TaskRecord, prev: Option<TaskId> },
    Delete { task_id: TaskId },
    Update { task: TaskRecord },
    Move { task_id: TaskId, prev: Option<TaskId> },
}

/// Position `tasks` would be inserted at to land immediately after `prev`,
/// or at the end if `prev` is `None` or not present in `tasks`.
fn position_after(tasks: &[TaskRecord], prev: Option<TaskId>) -> usize {
    match prev {
        Some(id) => tasks.iter().position(|t| t.id == id).map_or(tasks.len(), |i| i + 1),
        None => tasks.len(),
    }
}

/// Fold one [`Operation`] into an ordered task list. Infallible: an
/// operation naming an unknown task id is silently ignored rather than
/// rejected, since a logged op always applied cleanly when it was first
/// recorded and a replay must reach the same state unconditionally.
pub fn apply(tasks: &mut Vec<TaskRecord>, op: &Operation) {
    match op {
        Operation::Add { task, prev } => {
            let at = position_after(tasks, *prev);
            tasks.insert(at, *task);
        }
        Operation::Delete { task_id } => {
            tasks.retain(|t| t.id != *task_id);
        }
        Operation::Update { task } => {
            if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
                *existing = *task;
            }
        }
        Operation::Move { task_id, prev } => {
            if let Some(pos) = tasks.iter().position(|t| t.id == *task_id) {
                let moved = tasks.remove(pos);
                let at = match prev {
                    Some(_) => position_after(tasks, *prev),
                    None => 0,
                };
                tasks.insert(at, moved);
            }
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
