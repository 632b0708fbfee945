//! Async Unix socket IPC server.
//!
//! A connection may carry any number of requests, one JSON line each; a
//! camera client keeps one connection open and streams frames over it.

use crate::defaults::SOCKET_NAME;
use crate::error::{Result, SignshError};
use crate::ipc::protocol::{Command, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;

/// Handler trait for processing IPC commands.
#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle a command and return a response.
    async fn handle(&self, command: Command) -> Response;
}

/// State for managing server shutdown.
#[derive(Debug, Clone)]
struct ServerState {
    shutdown: Arc<Mutex<bool>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            shutdown: Arc::new(Mutex::new(false)),
        }
    }

    async fn is_shutdown(&self) -> bool {
        *self.shutdown.lock().await
    }

    async fn set_shutdown(&self) {
        *self.shutdown.lock().await = true;
    }
}

/// IPC server for the sentence engine.
pub struct IpcServer {
    socket_path: PathBuf,
    state: ServerState,
}

impl IpcServer {
    /// Create a new IPC server bound to the specified socket path.
    pub fn new(socket_path: PathBuf) -> Result<Self> {
        Ok(Self {
            socket_path,
            state: ServerState::new(),
        })
    }

    /// Get the socket path this server is using.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Get the default socket path based on XDG_RUNTIME_DIR or fallback.
    pub fn default_socket_path() -> PathBuf {
        if let Ok(xdg_runtime) = std::env::var("XDG_RUNTIME_DIR") {
            PathBuf::from(xdg_runtime).join(SOCKET_NAME)
        } else {
            let uid = unsafe { libc::getuid() };
            PathBuf::from(format!("/tmp/signsh-{}.sock", uid))
        }
    }

    /// Start the IPC server and handle incoming connections.
    pub async fn start<H>(&self, handler: H) -> Result<()>
    where
        H: CommandHandler + 'static,
    {
        // Clean up any existing socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| SignshError::IpcSocket {
                message: format!("Failed to remove existing socket: {}", e),
            })?;
        }

        let listener =
            UnixListener::bind(&self.socket_path).map_err(|e| SignshError::IpcSocket {
                message: format!("Failed to bind to socket: {}", e),
            })?;
        log::debug!("Bound {}", self.socket_path.display());

        let handler = Arc::new(handler);

        loop {
            if self.state.is_shutdown().await {
                break;
            }

            // Accept connection with timeout to check for shutdown
            let accept_result =
                tokio::time::timeout(tokio::time::Duration::from_millis(100), listener.accept())
                    .await;

            match accept_result {
                Ok(Ok((stream, _))) => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, handler).await {
                            log::warn!("Error handling client: {}", e);
                        }
                    });
                }
                Ok(Err(e)) => {
                    return Err(SignshError::IpcConnection {
                        message: format!("Failed to accept connection: {}", e),
                    });
                }
                Err(_) => continue,
            }
        }

        Ok(())
    }

    /// Stop the IPC server and clean up the socket file.
    pub async fn stop(&self) -> Result<()> {
        self.state.set_shutdown().await;

        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| SignshError::IpcSocket {
                message: format!("Failed to remove socket file: {}", e),
            })?;
        }

        Ok(())
    }
}

/// Serve requests on one connection until the client hangs up.
async fn handle_client<H>(stream: UnixStream, handler: Arc<H>) -> Result<()>
where
    H: CommandHandler + ?Sized,
{
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to read from client: {}", e),
            })?;
        if read == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = match Command::from_json(line.trim()) {
            Ok(command) => handler.handle(command).await,
            Err(e) => Response::Error {
                message: format!("Failed to parse command: {}", e),
            },
        };

        let mut response_json = response.to_json().map_err(|e| SignshError::IpcProtocol {
            message: format!("Failed to serialize response: {}", e),
        })?;
        response_json.push('\n');

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to write to client: {}", e),
            })?;

        writer
            .flush()
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to flush writer: {}", e),
            })?;
    }
}
