//! Task operations: get, add, delete, update, list, move, first, latest.
//!
//! Every handler reads its whole request before writing the response
//! opcode, then runs the domain logic, then writes the bool/payload (or
//! bool/error-string) pair. None of these close the session on failure --
//! an invalid task id is a retryable client mistake, not a protocol
//! violation.

use std::sync::Arc;

use taskq_core::{TaskId, TaskQueue, TaskRecord};
use taskq_storage::Operation;
use taskq_wire::{opcodes, ProtocolError};

use crate::error::HandlerError;
use crate::session::Session;

fn queue_for(session: &Session, employer_id: i32) -> Result<Arc<TaskQueue>, HandlerError> {
    session.state.manager.get(employer_id).map_err(|_| HandlerError::QueueNotFound(employer_id))
}

/// `0` is the wire sentinel for "no task id given".
fn optional_id(raw: i32) -> Option<TaskId> {
    if raw == 0 {
        None
    } else {
        Some(raw as TaskId)
    }
}

fn id_or_zero(id: Option<TaskId>) -> i32 {
    id.map_or(0, |id| id as i32)
}

pub fn handle_get(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let task_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        queue.get(task_id as TaskId).ok_or(HandlerError::TaskNotFound)
    })();

    match outcome {
        Ok(view) => {
            session.codec.write_bool(true);
            session.codec.write_int(id_or_zero(view.prev));
            session.codec.write_int(id_or_zero(view.next));
            session.codec.write_float(view.duration);
            session.codec.write_float(view.done_date);
        }
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_add(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let task_id = session.codec.read_int()?;
    let duration = session.codec.read_float()?;
    let done_date = session.codec.read_float()?;
    let prev_task_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_ADD);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        let prev = optional_id(prev_task_id);
        if let Some(prev_id) = prev {
            if !queue.exists(prev_id) {
                return Err(HandlerError::InvalidPrevTaskId);
            }
        }
        let task = TaskRecord { id: task_id as TaskId, duration, done_date };
        queue.add(task, prev)?;
        session.state.persistence.log(employer_id, Operation::Add { task, prev })?;
        Ok(())
    })();

    match outcome {
        Ok(()) => session.codec.write_bool(true),
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_delete(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let task_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_DELETE);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        let id = task_id as TaskId;
        if !queue.exists(id) {
            return Err(HandlerError::TaskNotFound);
        }
        let next = queue.delete(id)?;
        session.state.persistence.log(employer_id, Operation::Delete { task_id: id })?;
        Ok(next)
    })();

    match outcome {
        Ok(next) => {
            session.codec.write_bool(true);
            session.codec.write_int(id_or_zero(next));
        }
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_update(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let task_id = session.codec.read_int()?;
    let duration = session.codec.read_float()?;
    let done_date = session.codec.read_float()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_UPDATE);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        let id = task_id as TaskId;
        if !queue.exists(id) {
            return Err(HandlerError::TaskNotFound);
        }
        let task = TaskRecord { id, duration, done_date };
        queue.update(task)?;
        session.state.persistence.log(employer_id, Operation::Update { task })?;
        Ok(())
    })();

    match outcome {
        Ok(()) => session.codec.write_bool(true),
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_list(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let from_task_id = session.codec.read_int()?;
    let to_task_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_LIST);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        let from = optional_id(from_task_id);
        if let Some(id) = from {
            if !queue.exists(id) {
                return Err(HandlerError::InvalidFromTaskId);
            }
        }
        let to = optional_id(to_task_id);
        if let Some(id) = to {
            if !queue.exists(id) {
                return Err(HandlerError::InvalidToTaskId);
            }
        }
        Ok(queue.tasks(from, to)?)
    })();

    match outcome {
        Ok(tasks) => {
            session.codec.write_bool(true);
            for task in tasks {
                session.codec.write_int(task.id as i32);
                session.codec.write_float(task.duration);
                session.codec.write_float(task.done_date);
            }
            session.codec.write_int(0);
        }
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_move(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    let task_id = session.codec.read_int()?;
    let prev_task_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_MOVE);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        let id = task_id as TaskId;
        if !queue.exists(id) {
            return Err(HandlerError::TaskNotFound);
        }
        let prev = optional_id(prev_task_id);
        if let Some(prev_id) = prev {
            if !queue.exists(prev_id) {
                return Err(HandlerError::InvalidPrevTaskId);
            }
        }
        queue.move_task(id, prev)?;
        session.state.persistence.log(employer_id, Operation::Move { task_id: id, prev })?;
        Ok(())
    })();

    match outcome {
        Ok(()) => session.codec.write_bool(true),
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}

pub fn handle_first(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_FIRST);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        Ok(queue.first())
    })();

    respond_with_id(session, outcome)
}

pub fn handle_latest(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_TASK_LATEST);

    let outcome = (|| -> Result<_, HandlerError> {
        session.require_authenticated()?;
        let queue = queue_for(session, employer_id)?;
        Ok(queue.latest())
    })();

    respond_with_id(session, outcome)
}

fn respond_with_id(
    session: &mut Session,
    outcome: Result<Option<TaskId>, HandlerError>,
) -> Result<(), ProtocolError> {
    match outcome {
        Ok(id) => {
            session.codec.write_bool(true);
            session.codec.write_int(id_or_zero(id));
        }
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
        }
    }
    session.codec.send()
}
