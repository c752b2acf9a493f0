//! Registry of per-tenant queues, keyed by `employer_id`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ManagerError;
use crate::queue::TaskQueue;

/// Owns every tenant's [`TaskQueue`] and hands out shared handles to them.
/// Queue lookups are cheap (`RwLock` read guard + `Arc` clone); queue
/// bodies are never locked by the manager itself.
#[derive(Default)]
pub struct QueueManager {
    queues: RwLock<HashMap<i32, Arc<TaskQueue>>>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, employer_id: i32) -> Result<Arc<TaskQueue>, ManagerError> {
        self.queues
            .read()
            .get(&employer_id)
            .cloned()
            .ok_or(ManagerError::NotFound(employer_id))
    }

    pub fn contains(&self, employer_id: i32) -> bool {
        self.queues.read().contains_key(&employer_id)
    }

    pub fn create(&self, employer_id: i32) -> Result<Arc<TaskQueue>, ManagerError> {
        let mut queues = self.queues.write();
        if queues.contains_key(&employer_id) {
            return Err(ManagerError::Conflict(employer_id));
        }
        let queue = Arc::new(TaskQueue::new(employer_id));
        queues.insert(employer_id, queue.clone());
        Ok(queue)
    }

    /// Register an already-built queue, e.g. one reconstructed during
    /// startup recovery. Errors the same way `create` does on a collision.
    pub fn insert(&self, queue: Arc<TaskQueue>) -> Result<(), ManagerError> {
        let mut queues = self.queues.write();
        if queues.contains_key(&queue.employer_id) {
            return Err(ManagerError::Conflict(queue.employer_id));
        }
        queues.insert(queue.employer_id, queue);
        Ok(())
    }

    pub fn delete(&self, employer_id: i32) -> Result<(), ManagerError> {
        self.queues
            .write()
            .remove(&employer_id)
            .map(|_| ())
            .ok_or(ManagerError::NotFound(employer_id))
    }

    pub fn clear(&self) {
        self.queues.write().clear();
    }

    pub fn employer_ids(&self) -> Vec<i32> {
        self.queues.read().keys().copied().collect()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
