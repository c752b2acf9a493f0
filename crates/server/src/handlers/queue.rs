//! Queue lifecycle: create and delete a tenant's queue.
//!
//! Unlike the task handlers, a failure here closes the session -- creating
//! or deleting the wrong queue is treated as a client bug worth dropping
//! the connection over, not a retryable condition.

use taskq_wire::{opcodes, ProtocolError};

use crate::error::HandlerError;
use crate::session::Session;

pub fn handle_create(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_QUEUE_CREATE_RESPONSE);

    let result = session
        .state
        .manager
        .create(employer_id)
        .map_err(|_| HandlerError::QueueConflict(employer_id));

    respond(session, result)
}

pub fn handle_delete(session: &mut Session) -> Result<(), ProtocolError> {
    let employer_id = session.codec.read_int()?;
    session.codec.write_opcode(opcodes::SMSG_QUEUE_DELETE_RESPONSE);

    let result = session
        .state
        .manager
        .delete(employer_id)
        .map_err(|_| HandlerError::QueueNotFound(employer_id))
        .and_then(|()| session.state.persistence.clear(employer_id).map_err(HandlerError::from));

    respond(session, result)
}

fn respond(session: &mut Session, result: Result<(), HandlerError>) -> Result<(), ProtocolError> {
    match result {
        Ok(()) => {
            session.codec.write_bool(true);
            session.codec.send()?;
        }
        Err(err) => {
            session.codec.write_bool(false);
            session.codec.write_string(&err.to_string());
            session.codec.send()?;
            session.closing = true;
        }
    }
    Ok(())
}
