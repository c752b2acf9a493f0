//! Static opcode → handler registration.
//!
//! Built once at server startup rather than via the decorator-style
//! dynamic registry the opcode map was historically populated with;
//! [`build`] panics on a duplicate opcode, which is a programmer error
//! caught immediately rather than a possible runtime surprise.

use std::collections::HashMap;

use taskq_wire::{opcodes, ProtocolError};

use crate::handlers::{auth, queue, task};
use crate::session::Session;

pub type HandlerFn = fn(&mut Session) -> Result<(), ProtocolError>;
pub type Registry = HashMap<i16, HandlerFn>;

fn insert_unique(registry: &mut Registry, opcode: i16, handler: HandlerFn) {
    assert!(registry.insert(opcode, handler).is_none(), "opcode {opcode} registered twice");
}

pub fn build() -> Registry {
    let mut registry = Registry::new();

    insert_unique(&mut registry, opcodes::CMSG_AUTH_REQUEST, auth::handle);

    insert_unique(&mut registry, opcodes::CMSG_QUEUE_CREATE_REQUEST, queue::handle_create);
    insert_unique(&mut registry, opcodes::CMSG_QUEUE_DELETE_REQUEST, queue::handle_delete);

    insert_unique(&mut registry, opcodes::CMSG_TASK_GET, task::handle_get);
    insert_unique(&mut registry, opcodes::CMSG_TASK_ADD, task::handle_add);
    insert_unique(&mut registry, opcodes::CMSG_TASK_DELETE, task::handle_delete);
    insert_unique(&mut registry, opcodes::CMSG_TASK_UPDATE, task::handle_update);
    insert_unique(&mut registry, opcodes::CMSG_TASK_LIST, task::handle_list);
    insert_unique(&mut registry, opcodes::CMSG_TASK_MOVE, task::handle_move);
    insert_unique(&mut registry, opcodes::CMSG_TASK_FIRST, task::handle_first);
    insert_unique(&mut registry, opcodes::CMSG_TASK_LATEST, task::handle_latest);

    registry
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
