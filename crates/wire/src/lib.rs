//! Wire protocol for the task queue service.
//!
//! Wire format: opcode (2 bytes, i16 little-endian) + opcode-specific
//! payload made of the typed primitives in [`Codec`]. No frame lengths,
//! no checksums, no multiplexing identifiers -- the protocol is a strict
//! request/response pair per connection turn.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod error;
pub mod opcodes;

pub use codec::Codec;
pub use error::ProtocolError;
