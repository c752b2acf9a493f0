//! The TCP accept loop: binds a listener, hands each connection to a
//! bounded worker pool, and tracks live sessions so [`Server::stop`] can
//! force them closed.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use threadpool::ThreadPool;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dispatch::{self, Registry};
use crate::session::Session;
use crate::state::SharedState;

/// A running server. Dropping this does not stop it -- call [`Server::stop`]
/// from another thread (e.g. a signal handler) to shut down cleanly.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<SharedState>,
    registry: Registry,
    pool: ThreadPool,
    is_running: Arc<AtomicBool>,
    live_sockets: Arc<Mutex<Vec<TcpStream>>>,
}

impl Server {
    pub fn bind(config: &Config, state: Arc<SharedState>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", config.port))?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            state,
            registry: dispatch::build(),
            pool: ThreadPool::new(config.worker_pool_size),
            is_running: Arc::new(AtomicBool::new(true)),
            live_sockets: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// A handle that can stop this server from another thread while
    /// [`Server::run`] is blocked in `accept()`.
    pub fn controller(&self) -> ServerController {
        ServerController {
            local_addr: self.local_addr,
            is_running: self.is_running.clone(),
            live_sockets: self.live_sockets.clone(),
        }
    }

    /// Accept connections until [`ServerController::stop`] is called.
    /// Blocks the calling thread; run it on a dedicated thread if the
    /// caller needs to do anything else concurrently.
    pub fn run(self) {
        while self.is_running.load(Ordering::SeqCst) {
            let (stream, addr) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(err) => {
                    if self.is_running.load(Ordering::SeqCst) {
                        error!(%err, "accept failed");
                    }
                    continue;
                }
            };
            if !self.is_running.load(Ordering::SeqCst) {
                break;
            }

            let registered = stream.try_clone().expect("tcp stream clone never fails on a live socket");
            self.live_sockets.lock().expect("live_sockets mutex poisoned").push(registered);

            let registry = self.registry.clone();
            let state = self.state.clone();
            self.pool.execute(move || run_session(stream, addr, state, registry));
        }
        self.pool.join();
        info!("server stopped");
    }
}

fn run_session(stream: TcpStream, addr: SocketAddr, state: Arc<SharedState>, registry: Registry) {
    let codec = taskq_wire::Codec::new(stream);
    let session = Session::new(codec, addr, state);
    session.run(&registry);
}

/// A cloneable handle used to stop a [`Server`] from outside the thread
/// running [`Server::run`].
#[derive(Clone)]
pub struct ServerController {
    local_addr: SocketAddr,
    is_running: Arc<AtomicBool>,
    live_sockets: Arc<Mutex<Vec<TcpStream>>>,
}

impl ServerController {
    /// Stop accepting new connections, force-close every live session, and
    /// unblock the accept loop with a throwaway self-connection -- mirroring
    /// the connect-to-self trick needed because `accept()` has no native
    /// cancellation.
    pub fn stop(&self) {
        if !self.is_running.swap(false, Ordering::SeqCst) {
            return;
        }
        for socket in self.live_sockets.lock().expect("live_sockets mutex poisoned").drain(..) {
            let _ = socket.shutdown(std::net::Shutdown::Both);
        }
        if let Err(err) = TcpStream::connect(self.local_addr) {
            warn!(%err, "self-connect to unblock accept() failed (server may already be stopped)");
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
