//! Command handler implementation for the daemon.

use crate::daemon::DaemonState;
use crate::ipc::protocol::{Command, Response};
use crate::ipc::server::CommandHandler;
use std::sync::Arc;
use std::time::Instant;

/// Command handler for daemon IPC commands.
pub struct DaemonCommandHandler {
    state: Arc<DaemonState>,
}

impl DaemonCommandHandler {
    /// Creates a new command handler.
    pub fn new(state: Arc<DaemonState>) -> Self {
        Self { state }
    }

    /// Runs on the blocking pool: it holds the client's session lock and may
    /// scan the whole word list.
    async fn observe(
        &self,
        client_id: Option<String>,
        label_index: Option<i64>,
        confidence: f32,
        hand_present: bool,
    ) -> Response {
        let state = Arc::clone(&self.state);
        let now = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            state.engine.process_observation(
                client_id.as_deref(),
                label_index,
                confidence,
                hand_present,
                now,
            )
        })
        .await;

        match result {
            Ok(Ok(outcome)) => outcome.into(),
            Ok(Err(e)) => {
                log::debug!("Rejected observation: {}", e);
                Response::Error {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                log::error!("Observation task failed: {}", e);
                Response::Error {
                    message: format!("Observation task failed: {e}"),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl CommandHandler for DaemonCommandHandler {
    async fn handle(&self, command: Command) -> Response {
        match command {
            Command::Observe {
                client_id,
                label_index,
                confidence,
                hand_present,
            } => {
                self.observe(client_id, label_index, confidence, hand_present)
                    .await
            }
            Command::Sentence { client_id } => Response::Sentence {
                sentence: self.state.engine.get_sentence(client_id.as_deref()),
            },
            Command::Reset { client_id } => {
                self.state.engine.reset_session(client_id.as_deref());
                Response::Ok
            }
            Command::Health => self.state.engine.health().into(),
            Command::Shutdown => {
                log::info!("Shutdown requested over IPC");
                self.state.shutdown.notify_one();
                Response::Ok
            }
        }
    }
}
