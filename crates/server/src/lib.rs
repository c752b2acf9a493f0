//! Task queue TCP server: binds a listener, authenticates sessions, and
//! dispatches the typed binary protocol to per-tenant queues.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod dispatch;
mod error;
mod handlers;
mod server;
mod session;
mod state;

pub use config::Config;
pub use error::HandlerError;
pub use server::{Server, ServerController};
pub use state::SharedState;
