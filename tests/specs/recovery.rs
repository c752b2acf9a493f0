use crate::support::TestServer;

#[test]
fn crash_before_the_writer_drains_still_recovers_the_logged_task() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    assert!(client.queue_create(7).is_ok());
    client.task_add(7, 1, 60.0, 162_030.0, 0).expect("add task 1 to tenant 7");

    // Kill the process immediately: the WAL append for the add is
    // synchronous (the durability boundary), but the background writer
    // may not have folded it into the snapshot yet.
    let storage_dir = server.crash();

    let restarted = TestServer::start_with_storage("secret", storage_dir);
    let mut client = restarted.authed_client();

    let (prev, next, duration, done_date) = client.task_get(7, 1).expect("task 1 should have been recovered");
    assert_eq!((prev, next, duration, done_date), (0, 0, 60.0, 162_030.0));
}
