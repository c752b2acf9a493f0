use crate::support::TestServer;

#[test]
fn auth_with_the_configured_password_succeeds() {
    let server = TestServer::start("correct-horse");
    let mut client = server.connect();
    assert!(client.auth("correct-horse"));
}

#[test]
fn auth_with_the_wrong_password_fails() {
    let server = TestServer::start("correct-horse");
    let mut client = server.connect();
    assert!(!client.auth("wrong_password"));
}

#[test]
fn task_operations_require_a_prior_successful_auth() {
    let server = TestServer::start("correct-horse");
    let mut client = server.connect();
    // No auth handshake at all: the task handler must still reply (with
    // the paired opcode) rather than silently dropping the connection.
    let err = client.task_get(1, 1).expect_err("unauthenticated task_get should fail");
    assert_eq!(err, "You must be authenticated to perform this action.");
}
