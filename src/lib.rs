//! signsh - sign-to-text sentence engine
//!
//! Turns a stream of per-frame hand-sign classifications into stable letters,
//! words and sentences, one independent session per client.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod correction;
pub mod daemon;
pub mod defaults;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod ipc;
pub mod labels;
pub mod replay;

// Engine
pub use engine::{EngineHealth, ObservationOutcome, SentenceEngine};

// Correction
pub use correction::corrector::{Corrector, PassthroughCorrector};
pub use correction::lexical::DictionaryCorrector;

// Error handling
pub use error::{Result, SignshError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
