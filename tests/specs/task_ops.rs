use crate::support::TestServer;

#[test]
fn move_from_start_to_end_and_back() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    assert!(client.queue_create(1).is_ok());

    client.task_add(1, 1, 60.0, 162_030.0, 0).expect("add task 1");
    client.task_add(1, 2, 120.0, 162_040.0, 1).expect("add task 2 after 1");
    client.task_add(1, 3, 180.0, 162_050.0, 2).expect("add task 3 after 2");

    client.task_move(1, 1, 3).expect("move task 1 to after task 3");
    similar_asserts::assert_eq!(ids(&client.task_list(1, 0, 0).expect("list")), vec![2, 3, 1]);

    client.task_move(1, 1, 2).expect("move task 1 to after task 2");
    similar_asserts::assert_eq!(ids(&client.task_list(1, 0, 0).expect("list")), vec![2, 1, 3]);

    client.task_move(1, 1, 0).expect("move task 1 to front");
    similar_asserts::assert_eq!(ids(&client.task_list(1, 0, 0).expect("list")), vec![1, 2, 3]);
}

#[test]
fn get_an_unknown_task_fails_with_the_exact_message() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    assert!(client.queue_create(1).is_ok());
    client.task_add(1, 1, 60.0, 162_030.0, 0).expect("add task 1");

    let err = client.task_get(1, 999).expect_err("task 999 was never added");
    assert_eq!(err, "Task not found.");
}

#[test]
fn add_with_an_unknown_prev_is_rejected() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    assert!(client.queue_create(1).is_ok());

    let err = client.task_add(1, 1, 60.0, 0.0, 999).expect_err("prev 999 doesn't exist yet");
    assert_eq!(err, "'prev_task_id' is invalid. May be the task not in the queue.");
}

#[test]
fn get_reports_siblings_and_payload() {
    let server = TestServer::start("secret");
    let mut client = server.authed_client();
    assert!(client.queue_create(1).is_ok());

    client.task_add(1, 1, 60.0, 162_030.0, 0).expect("add task 1");
    client.task_add(1, 2, 120.0, 162_040.0, 1).expect("add task 2 after 1");

    let (prev, next, duration, done_date) = client.task_get(1, 2).expect("get task 2");
    assert_eq!((prev, next, duration, done_date), (1, 0, 120.0, 162_040.0));
}

fn ids(tasks: &[(i32, f64, f64)]) -> Vec<i32> {
    tasks.iter().map(|(id, _, _)| *id).collect()
}
