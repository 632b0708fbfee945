//! Error types for signsh.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignshError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Resource loading errors
    #[error("Failed to load labels from {path}: {message}")]
    LabelsLoad { path: String, message: String },

    #[error("Failed to load dictionary from {path}: {message}")]
    DictionaryLoad { path: String, message: String },

    // Engine errors
    #[error("Invalid observation: {reason}")]
    InvalidObservation { reason: String },

    #[error("Trace line {line}: {message}")]
    TraceParse { line: usize, message: String },

    // IPC errors
    #[error("IPC socket error: {message}")]
    IpcSocket { message: String },

    #[error("IPC protocol error: {message}")]
    IpcProtocol { message: String },

    #[error("IPC connection failed: {message}")]
    IpcConnection { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl SignshError {
    /// Shorthand for an observation rejected at the engine boundary.
    pub fn invalid_observation(reason: impl Into<String>) -> Self {
        Self::InvalidObservation {
            reason: reason.into(),
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SignshError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = SignshError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = SignshError::ConfigInvalidValue {
            key: "engine.hold_frames".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for engine.hold_frames: must be at least 1"
        );
    }

    #[test]
    fn test_labels_load_display() {
        let error = SignshError::LabelsLoad {
            path: "/models/labels.json".to_string(),
            message: "expected a list".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load labels from /models/labels.json: expected a list"
        );
    }

    #[test]
    fn test_invalid_observation_display() {
        let error = SignshError::invalid_observation("confidence 1.5 outside [0, 1]");
        assert_eq!(
            error.to_string(),
            "Invalid observation: confidence 1.5 outside [0, 1]"
        );
    }

    #[test]
    fn test_ipc_protocol_display() {
        let error = SignshError::IpcProtocol {
            message: "invalid message format".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "IPC protocol error: invalid message format"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: SignshError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: SignshError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: SignshError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SignshError>();
        assert_sync::<SignshError>();
    }
}
