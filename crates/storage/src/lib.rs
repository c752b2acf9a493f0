//! taskq-storage: per-tenant write-ahead log, compacted snapshot, and
//! crash recovery for the task queue service.
//!
//! Three files per tenant under one base directory: `<id>.log` (append-only
//! [`Operation`] records), `<id>.bac` (the compacted snapshot), and
//! `<id>.offset` (how many log records are already folded into it). A
//! [`PersistenceManager`] owns the WAL handle and background [`Writer`] for
//! every tenant it has recovered.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod manager;
mod record;
pub mod snapshot;
mod wal;
mod writer;

pub use error::PersistenceError;
pub use manager::{discover_tenants, PersistenceManager};
pub use record::{apply, Operation};
pub use wal::Wal;
pub use writer::Writer;
