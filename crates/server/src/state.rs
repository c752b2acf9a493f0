//! Process-wide state shared by every session.

use taskq_core::QueueManager;
use taskq_storage::PersistenceManager;

pub struct SharedState {
    pub manager: QueueManager,
    pub persistence: PersistenceManager,
    pub password: String,
}
