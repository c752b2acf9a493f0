use crate::support::TestServer;

#[test]
fn create_then_duplicate_create_conflicts() {
    let server = TestServer::start("secret");
    let mut client = server.connect();
    assert!(client.queue_create(42).is_ok());
    let err = client.queue_create(42).expect_err("second create for the same tenant should fail");
    assert_eq!(err, "Queue for employer_id 42 already exists");
}

#[test]
fn listing_an_unknown_queue_fails_with_the_exact_message() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    let err = client.task_list(2, 1, 3).expect_err("no queue exists for employer 2");
    assert_eq!(err, "No queue for employer_id 2");
}

#[test]
fn delete_removes_the_queue_so_it_can_be_recreated() {
    let server = TestServer::start("secret");
    let mut client = server.connect();
    assert!(client.queue_create(9).is_ok());

    assert!(client.queue_delete(9).is_ok());

    // The connection stays open after a successful delete, and the tenant
    // is gone: listing it now fails exactly as if it had never existed.
    let err = client.task_list(9, 1, 3).expect_err("queue 9 was just deleted");
    assert_eq!(err, "No queue for employer_id 9");

    // A fresh create for the same employer_id succeeds again.
    assert!(client.queue_create(9).is_ok());
}

#[test]
fn deleting_an_unknown_queue_fails_and_closes_the_session() {
    let server = TestServer::start("secret");
    let mut client = server.connect();

    let err = client.queue_delete(404).expect_err("no queue exists for employer 404");
    assert_eq!(err, "No queue for employer_id 404");

    // Unlike task handlers, a queue-lifecycle failure closes the session:
    // the connection is gone by the time we try to read anything further.
    assert!(client.is_disconnected(), "the session should already be closed");
}
