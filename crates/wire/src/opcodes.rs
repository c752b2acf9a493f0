//! Wire opcode assignments.
//!
//! The upstream service this protocol was distilled from assigns these
//! numbers in a Python `opcodes` module that wasn't available to ground
//! this rewrite on, so the concrete values below are this implementation's
//! own assignment (documented in DESIGN.md). What's load-bearing is the
//! pairing: every `CMSG_*` request has exactly one `SMSG_*` response, and a
//! client that learns these constants once can treat them as stable wire
//! contract.

/// Request opcode: authenticate the session with a shared password.
pub const CMSG_AUTH_REQUEST: i16 = 100;
/// Request opcode: create a new queue for an employer_id.
pub const CMSG_QUEUE_CREATE_REQUEST: i16 = 101;
/// Request opcode: delete a queue and its persisted state.
pub const CMSG_QUEUE_DELETE_REQUEST: i16 = 102;

/// Request opcode: fetch a single task by id.
pub const CMSG_TASK_GET: i16 = 110;
/// Request opcode: add a task to a queue.
pub const CMSG_TASK_ADD: i16 = 111;
/// Request opcode: delete a task from a queue.
pub const CMSG_TASK_DELETE: i16 = 112;
/// Request opcode: update a task's duration/done_date.
pub const CMSG_TASK_UPDATE: i16 = 113;
/// Request opcode: list tasks in a range.
pub const CMSG_TASK_LIST: i16 = 114;
/// Request opcode: move a task to a new position.
pub const CMSG_TASK_MOVE: i16 = 115;
/// Request opcode: fetch the head task id.
pub const CMSG_TASK_FIRST: i16 = 116;
/// Request opcode: fetch the tail task id.
pub const CMSG_TASK_LATEST: i16 = 117;

/// Response opcode paired with [`CMSG_AUTH_REQUEST`].
pub const SMSG_AUTH_RESPONSE: i16 = 200;
/// Response opcode paired with [`CMSG_QUEUE_CREATE_REQUEST`].
pub const SMSG_QUEUE_CREATE_RESPONSE: i16 = 201;
/// Response opcode paired with [`CMSG_QUEUE_DELETE_REQUEST`].
pub const SMSG_QUEUE_DELETE_RESPONSE: i16 = 202;

/// Response opcode paired with [`CMSG_TASK_GET`].
pub const SMSG_TASK: i16 = 210;
/// Response opcode paired with [`CMSG_TASK_ADD`].
pub const SMSG_TASK_ADD: i16 = 211;
/// Response opcode paired with [`CMSG_TASK_DELETE`].
pub const SMSG_TASK_DELETE: i16 = 212;
/// Response opcode paired with [`CMSG_TASK_UPDATE`].
pub const SMSG_TASK_UPDATE: i16 = 213;
/// Response opcode paired with [`CMSG_TASK_LIST`].
pub const SMSG_TASK_LIST: i16 = 214;
/// Response opcode paired with [`CMSG_TASK_MOVE`].
pub const SMSG_TASK_MOVE: i16 = 215;
/// Response opcode paired with [`CMSG_TASK_FIRST`].
pub const SMSG_TASK_FIRST: i16 = 216;
/// Response opcode paired with [`CMSG_TASK_LATEST`].
pub const SMSG_TASK_LATEST: i16 = 217;
