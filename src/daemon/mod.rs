//! Daemon mode: owns the sentence engine and serves it over IPC.

pub mod handler;

use crate::config::Config;
use crate::engine::SentenceEngine;
use crate::error::{Result, SignshError};
use crate::ipc::server::IpcServer;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;

/// Daemon state shared with the command handler.
#[derive(Debug)]
pub struct DaemonState {
    /// Engine holding every client's session
    pub engine: SentenceEngine,
    /// Signalled by the `shutdown` command
    pub shutdown: Notify,
}

impl DaemonState {
    pub fn new(engine: SentenceEngine) -> Self {
        Self {
            engine,
            shutdown: Notify::new(),
        }
    }
}

/// Run the daemon: load resources, start IPC server, wait for shutdown.
///
/// Stops on SIGINT, SIGTERM or a `shutdown` command.
pub async fn run_daemon(config: Config, socket_path: Option<PathBuf>) -> Result<()> {
    let engine = SentenceEngine::from_config(&config)?;
    let health = engine.health();
    log::info!(
        "Engine ready: {} labels, {} dictionary words",
        health.labels_count,
        health.wordlist_size
    );

    let state = Arc::new(DaemonState::new(engine));

    let socket_path = socket_path
        .or_else(|| config.server.socket_path.clone())
        .unwrap_or_else(IpcServer::default_socket_path);
    let server = Arc::new(IpcServer::new(socket_path)?);
    log::info!(
        "IPC server listening at: {}",
        server.socket_path().display()
    );

    let handler = handler::DaemonCommandHandler::new(Arc::clone(&state));

    let server_clone = Arc::clone(&server);
    let mut server_handle = tokio::spawn(async move { server_clone.start(handler).await });

    let mut server_finished = false;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received SIGINT, shutting down...");
        }
        res = wait_for_sigterm() => {
            if let Err(e) = res {
                log::error!("Error setting up signal handler: {}", e);
            }
            log::info!("Received SIGTERM, shutting down...");
        }
        _ = state.shutdown.notified() => {
            log::info!("Shutting down...");
        }
        res = &mut server_handle => {
            server_finished = true;
            match res {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e),
                Err(e) => {
                    return Err(SignshError::Other(format!("Server task failed: {}", e)));
                }
            }
        }
    }

    server.stop().await?;

    if !server_finished && let Err(e) = server_handle.await {
        log::warn!("Daemon server task failed: {e}");
    }

    log::info!("Daemon stopped.");
    Ok(())
}

/// Wait for SIGTERM signal.
#[cfg(unix)]
async fn wait_for_sigterm() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| SignshError::Other(format!("Failed to register SIGTERM handler: {}", e)))?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> Result<()> {
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::client::send_command;
    use crate::ipc::protocol::{Command, Response};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_shutdown_command_stops_daemon() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("daemon.sock");

        let daemon = tokio::spawn(run_daemon(Config::default(), Some(socket_path.clone())));
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let response = send_command(&socket_path, Command::Health).await.unwrap();
        assert!(matches!(response, Response::Health { sessions: 0, .. }));

        let response = send_command(&socket_path, Command::Shutdown).await.unwrap();
        assert_eq!(response, Response::Ok);

        let result = tokio::time::timeout(tokio::time::Duration::from_secs(2), daemon)
            .await
            .expect("daemon should stop");
        assert!(result.unwrap().is_ok());
        assert!(!socket_path.exists());
    }

    #[tokio::test]
    async fn test_missing_labels_file_fails_startup() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.resources.labels_path = Some(temp_dir.path().join("missing.json"));

        let result = run_daemon(config, Some(temp_dir.path().join("d.sock"))).await;
        assert!(matches!(result, Err(SignshError::LabelsLoad { .. })));
    }
}
