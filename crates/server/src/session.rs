//! Per-connection state machine: one session per accepted socket, run
//! entirely on its own worker thread.

use std::net::SocketAddr;
use std::sync::Arc;

use taskq_wire::{Codec, ProtocolError};
use tracing::{info, warn};

use crate::dispatch::Registry;
use crate::error::HandlerError;
use crate::state::SharedState;

pub struct Session {
    pub codec: Codec,
    pub addr: SocketAddr,
    pub authenticated: bool,
    pub closing: bool,
    pub state: Arc<SharedState>,
}

impl Session {
    pub fn new(codec: Codec, addr: SocketAddr, state: Arc<SharedState>) -> Self {
        Self { codec, addr, authenticated: false, closing: false, state }
    }

    pub fn require_authenticated(&self) -> Result<(), HandlerError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(HandlerError::Unauthenticated)
        }
    }

    /// Run the read-dispatch-respond loop until disconnect, an unknown
    /// opcode, a fatal transport error, or a handler requesting close
    /// (currently only a failed auth attempt).
    ///
    /// No per-session mutex guards this loop: a session is driven by
    /// exactly one worker thread for its whole lifetime, so there is
    /// nothing to serialize against.
    pub fn run(mut self, registry: &Registry) {
        info!(addr = %self.addr, "client connected");
        loop {
            let opcode = match self.codec.read_opcode() {
                Ok(opcode) => opcode,
                Err(ProtocolError::Disconnected) => break,
                Err(err) => {
                    warn!(addr = %self.addr, %err, "transport error reading opcode");
                    break;
                }
            };

            let Some(handler) = registry.get(&opcode) else {
                warn!(addr = %self.addr, opcode, "unknown opcode");
                break;
            };

            if let Err(err) = handler(&mut self) {
                warn!(addr = %self.addr, %err, "transport error handling request");
                break;
            }

            if self.closing {
                break;
            }
        }
        self.codec.close();
        info!(addr = %self.addr, "client disconnected");
    }
}
