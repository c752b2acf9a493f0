use std::process::ExitCode;
use std::sync::Arc;

use taskq_core::QueueManager;
use taskq_server::{Config, Server, SharedState};
use taskq_storage::{discover_tenants, PersistenceManager};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let manager = QueueManager::new();
    let persistence = PersistenceManager::new(config.storage_dir.clone());

    let tenants = match discover_tenants(&config.storage_dir) {
        Ok(ids) => ids,
        Err(err) => {
            tracing::error!(%err, "failed to discover persisted tenants");
            return ExitCode::FAILURE;
        }
    };
    for employer_id in tenants {
        let tasks = match persistence.recover(employer_id) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::error!(employer_id, %err, "failed to recover tenant, skipping");
                continue;
            }
        };
        let queue = taskq_core::TaskQueue::from_ordered(employer_id, &tasks);
        if manager.insert(Arc::new(queue)).is_err() {
            tracing::error!(employer_id, "tenant already registered during recovery");
        }
    }

    let state = Arc::new(SharedState { manager, persistence, password: config.password.clone() });

    let server = match Server::bind(&config, state) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(%err, port = config.port, "failed to bind server");
            return ExitCode::FAILURE;
        }
    };

    let controller = server.controller();
    ctrlc_shutdown(controller);

    tracing::info!(addr = %server.local_addr(), "server listening");
    server.run();
    ExitCode::SUCCESS
}

/// Stop the server on SIGINT/SIGTERM so in-flight sessions and the
/// background persistence writers get a chance to finish cleanly.
fn ctrlc_shutdown(controller: taskq_server::ServerController) {
    let _ = ctrlc::set_handler(move || controller.stop());
}
