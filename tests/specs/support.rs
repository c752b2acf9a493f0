//! Shared harness for driving a real `taskqd` process over its wire protocol.

use std::net::TcpStream;
use std::process::Child;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use taskq_wire::Codec;

const BASE_PORT: u16 = 28_100;
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);

fn claim_port() -> u16 {
    BASE_PORT + NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// A running `taskqd` bound to a unique port, with its own storage
/// directory. Killed on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    storage_dir: TempDir,
    password: String,
}

impl TestServer {
    /// Start a fresh server with an empty storage directory.
    pub fn start(password: &str) -> Self {
        let storage_dir = tempfile::tempdir().expect("tempdir");
        Self::start_with_storage(password, storage_dir)
    }

    /// Start a server pointed at an existing storage directory, used to
    /// simulate a restart after a crash.
    pub fn start_with_storage(password: &str, storage_dir: TempDir) -> Self {
        let port = claim_port();
        let mut command =
            assert_cmd::Command::cargo_bin("taskqd").expect("locate the built taskqd binary");
        command.env("QSERVER_PORT", port.to_string());
        command.env("QSERVER_PASSWORD", password);
        command.env("QSERVER_STORAGE_DIR", storage_dir.path());
        let child = command.spawn().expect("spawn taskqd");

        let server = Self { child, port, storage_dir, password: password.to_string() };
        server.wait_until_accepting();
        server
    }

    fn wait_until_accepting(&self) {
        for _ in 0..100 {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("taskqd never started accepting connections on port {}", self.port);
    }

    /// Kill the process without tearing down its storage directory, then
    /// return the directory so a new server can recover from it.
    pub fn crash(mut self) -> TempDir {
        let _ = self.child.kill();
        let _ = self.child.wait();
        std::mem::replace(&mut self.storage_dir, tempfile::tempdir().expect("tempdir"))
    }

    pub fn connect(&self) -> Client {
        let stream = TcpStream::connect(("127.0.0.1", self.port)).expect("connect to taskqd");
        Client { codec: Codec::new(stream) }
    }

    /// Connect and complete the auth handshake with this server's password.
    pub fn authed_client(&self) -> Client {
        let mut client = self.connect();
        assert!(client.auth(&self.password), "auth with the server's own password should succeed");
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A thin wrapper over [`Codec`] for issuing one request/response pair at a
/// time from test code.
pub struct Client {
    codec: Codec,
}

impl Client {
    pub fn auth(&mut self, password: &str) -> bool {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_AUTH_REQUEST);
        self.codec.write_string(password);
        self.codec.send().expect("send auth request");
        let opcode = self.codec.read_opcode().expect("read auth response opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_AUTH_RESPONSE);
        self.codec.read_bool().expect("read auth response bool")
    }

    pub fn queue_create(&mut self, employer_id: i32) -> Result<(), String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_QUEUE_CREATE_REQUEST);
        self.codec.write_int(employer_id);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_QUEUE_CREATE_RESPONSE);
        self.read_outcome(|_| {})
    }

    pub fn queue_delete(&mut self, employer_id: i32) -> Result<(), String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_QUEUE_DELETE_REQUEST);
        self.codec.write_int(employer_id);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_QUEUE_DELETE_RESPONSE);
        self.read_outcome(|_| {})
    }

    pub fn task_add(&mut self, employer_id: i32, id: i32, duration: f64, done_date: f64, prev: i32) -> Result<(), String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_TASK_ADD);
        self.codec.write_int(employer_id);
        self.codec.write_int(id);
        self.codec.write_float(duration);
        self.codec.write_float(done_date);
        self.codec.write_int(prev);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_TASK_ADD);
        self.read_outcome(|_| {})
    }

    pub fn task_get(&mut self, employer_id: i32, task_id: i32) -> Result<(i32, i32, f64, f64), String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_TASK_GET);
        self.codec.write_int(employer_id);
        self.codec.write_int(task_id);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_TASK);
        self.read_outcome(|codec| {
            let prev = codec.read_int().expect("prev");
            let next = codec.read_int().expect("next");
            let duration = codec.read_float().expect("duration");
            let done_date = codec.read_float().expect("done_date");
            (prev, next, duration, done_date)
        })
    }

    pub fn task_move(&mut self, employer_id: i32, task_id: i32, prev: i32) -> Result<(), String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_TASK_MOVE);
        self.codec.write_int(employer_id);
        self.codec.write_int(task_id);
        self.codec.write_int(prev);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_TASK_MOVE);
        self.read_outcome(|_| {})
    }

    pub fn task_list(&mut self, employer_id: i32, from: i32, to: i32) -> Result<Vec<(i32, f64, f64)>, String> {
        self.codec.write_opcode(taskq_wire::opcodes::CMSG_TASK_LIST);
        self.codec.write_int(employer_id);
        self.codec.write_int(from);
        self.codec.write_int(to);
        self.codec.send().expect("send");
        let opcode = self.codec.read_opcode().expect("read opcode");
        assert_eq!(opcode, taskq_wire::opcodes::SMSG_TASK_LIST);
        let success = self.codec.read_bool().expect("read success bool");
        if !success {
            return Err(self.codec.read_string().expect("read error message"));
        }
        let mut tasks = Vec::new();
        loop {
            let id = self.codec.read_int().expect("task id or sentinel");
            if id == 0 {
                break;
            }
            let duration = self.codec.read_float().expect("duration");
            let done_date = self.codec.read_float().expect("done_date");
            tasks.push((id, duration, done_date));
        }
        Ok(tasks)
    }

    /// True once the peer has closed its end -- used to confirm a handler
    /// that tears down the session on error (queue create/delete) actually
    /// did, without relying on a second request panicking through `expect`.
    pub fn is_disconnected(&mut self) -> bool {
        self.codec.read_opcode().is_err()
    }

    /// Shared success/failure framing: bool, then either the handler's own
    /// success payload (built by `on_success`) or an error string.
    fn read_outcome<T>(&mut self, on_success: impl FnOnce(&mut Codec) -> T) -> Result<T, String> {
        let success = self.codec.read_bool().expect("read success bool");
        if success {
            Ok(on_success(&mut self.codec))
        } else {
            Err(self.codec.read_string().expect("read error message"))
        }
    }
}
