//! IPC client for sending commands to the daemon.

use crate::error::{Result, SignshError};
use crate::ipc::protocol::{Command, Response};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};

/// Persistent connection to the daemon.
///
/// Requests are answered in order, so a frame source can stream
/// observations over one connection.
pub struct IpcClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: String,
}

impl IpcClient {
    /// Connect to the daemon socket.
    ///
    /// # Errors
    /// Returns `SignshError::IpcConnection` if the daemon is not listening
    pub async fn connect(socket_path: &Path) -> Result<Self> {
        let stream =
            UnixStream::connect(socket_path)
                .await
                .map_err(|e| SignshError::IpcConnection {
                    message: format!("Failed to connect to daemon: {}", e),
                })?;

        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            line: String::new(),
        })
    }

    /// Send one command and wait for its response.
    ///
    /// # Errors
    /// Returns `SignshError::IpcConnection` on socket failure and
    /// `SignshError::IpcProtocol` if serialization/deserialization fails
    pub async fn send(&mut self, command: &Command) -> Result<Response> {
        let mut command_json = command.to_json().map_err(|e| SignshError::IpcProtocol {
            message: format!("Failed to serialize command: {}", e),
        })?;
        command_json.push('\n');

        self.writer
            .write_all(command_json.as_bytes())
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to write command: {}", e),
            })?;

        self.writer
            .flush()
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to flush writer: {}", e),
            })?;

        self.line.clear();
        let read = self
            .reader
            .read_line(&mut self.line)
            .await
            .map_err(|e| SignshError::IpcConnection {
                message: format!("Failed to read response: {}", e),
            })?;
        if read == 0 {
            return Err(SignshError::IpcConnection {
                message: "Daemon closed the connection".to_string(),
            });
        }

        Response::from_json(self.line.trim()).map_err(|e| SignshError::IpcProtocol {
            message: format!("Failed to deserialize response: {}", e),
        })
    }
}

/// Send a single command to the daemon via Unix socket.
///
/// # Errors
/// Returns `SignshError::IpcConnection` if connection fails
/// Returns `SignshError::IpcProtocol` if serialization/deserialization fails
pub async fn send_command(socket_path: &Path, command: Command) -> Result<Response> {
    let mut client = IpcClient::connect(socket_path).await?;
    client.send(&command).await
}
