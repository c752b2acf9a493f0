use super::*;

#[test]
fn get_on_unknown_employer_is_not_found() {
    let mgr = QueueManager::new();
    assert_eq!(mgr.get(1).unwrap_err(), ManagerError::NotFound(1));
}

#[test]
fn create_then_get_returns_the_same_queue() {
    let mgr = QueueManager::new();
    let created = mgr.create(1).unwrap();
    created.add(crate::task::TaskRecord { id: 1, duration: 1.0, done_date: 0.0 }, None).unwrap();

    let fetched = mgr.get(1).unwrap();
    assert!(fetched.exists(1));
}

#[test]
fn create_twice_conflicts() {
    let mgr = QueueManager::new();
    mgr.create(1).unwrap();
    assert_eq!(mgr.create(1).unwrap_err(), ManagerError::Conflict(1));
}

#[test]
fn delete_removes_the_queue() {
    let mgr = QueueManager::new();
    mgr.create(1).unwrap();
    mgr.delete(1).unwrap();
    assert!(!mgr.contains(1));
    assert_eq!(mgr.delete(1).unwrap_err(), ManagerError::NotFound(1));
}

#[test]
fn clear_removes_every_queue() {
    let mgr = QueueManager::new();
    mgr.create(1).unwrap();
    mgr.create(2).unwrap();
    mgr.clear();
    assert!(mgr.employer_ids().is_empty());
}

#[test]
fn insert_rejects_a_collision_with_an_existing_employer_id() {
    let mgr = QueueManager::new();
    mgr.create(1).unwrap();
    let dup = Arc::new(TaskQueue::new(1));
    assert_eq!(mgr.insert(dup).unwrap_err(), ManagerError::Conflict(1));
}
