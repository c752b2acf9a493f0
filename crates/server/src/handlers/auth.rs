//! Authentication: a shared password gates every other opcode.

use taskq_wire::{opcodes, ProtocolError};

use crate::session::Session;

pub fn handle(session: &mut Session) -> Result<(), ProtocolError> {
    let password = session.codec.read_string()?;

    session.codec.write_opcode(opcodes::SMSG_AUTH_RESPONSE);
    if password == session.state.password {
        session.codec.write_bool(true);
        session.codec.send()?;
        session.authenticated = true;
    } else {
        session.codec.write_bool(false);
        session.codec.send()?;
        session.closing = true;
    }
    Ok(())
}
