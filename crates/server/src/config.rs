//! Server configuration, read once at startup from the environment.

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 9999;
const DEFAULT_WORKER_POOL_SIZE: usize = 10;
const DEFAULT_STORAGE_DIR: &str = "./storage";

/// Everything the server needs to bind and authenticate clients.
///
/// The password is read once at construction and never logged; treat it
/// as an opaque secret handed to us by an external collaborator.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub password: String,
    pub storage_dir: PathBuf,
    pub worker_pool_size: usize,
}

impl Config {
    /// Reads `QSERVER_PORT` (default 9999), `QSERVER_PASSWORD` (default
    /// empty string, meaning only an empty-password client can auth),
    /// and `QSERVER_STORAGE_DIR` (default `./storage`) from the process
    /// environment.
    pub fn from_env() -> Self {
        let port = std::env::var("QSERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let password = std::env::var("QSERVER_PASSWORD").unwrap_or_default();
        let storage_dir = std::env::var("QSERVER_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR));

        Self { port, password, storage_dir, worker_pool_size: DEFAULT_WORKER_POOL_SIZE }
    }
}
