use crate::defaults;
use crate::error::{Result, SignshError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub store: StoreConfig,
    pub resources: ResourcesConfig,
    pub server: ServerConfig,
}

/// Tuning of the commitment and sentence-assembly engine.
///
/// Immutable once handed to `SentenceEngine::new`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Observation window capacity.
    pub window_size: usize,
    /// Agreeing smoother outputs needed to commit a letter.
    pub hold_frames: usize,
    /// Hand-absence pause (seconds) that closes a word.
    pub word_pause_seconds: f64,
    /// Observations below this confidence do not vote.
    pub min_confidence: f32,
    /// Minimum similarity for lexical correction.
    pub correction_cutoff: f64,
    /// Candidates considered per correction.
    pub max_suggestions: usize,
}

/// Session store bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum live sessions; `None` disables LRU eviction.
    pub max_sessions: Option<usize>,
    /// Idle seconds after which a session may be dropped; `None` keeps it forever.
    pub idle_ttl_secs: Option<u64>,
}

/// Optional label table and word list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResourcesConfig {
    pub labels_path: Option<PathBuf>,
    pub wordlist_path: Option<PathBuf>,
}

/// IPC server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub socket_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::WINDOW_SIZE,
            hold_frames: defaults::HOLD_FRAMES,
            word_pause_seconds: defaults::WORD_PAUSE_SECONDS,
            min_confidence: defaults::MIN_CONFIDENCE,
            correction_cutoff: defaults::CORRECTION_CUTOFF,
            max_suggestions: defaults::MAX_SUGGESTIONS,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: Some(defaults::MAX_SESSIONS),
            idle_ttl_secs: None,
        }
    }
}

impl EngineConfig {
    /// Word pause as a `Duration`.
    ///
    /// Only meaningful after `validate`; an invalid value maps to zero.
    pub fn word_pause(&self) -> Duration {
        Duration::try_from_secs_f64(self.word_pause_seconds).unwrap_or(Duration::ZERO)
    }

    /// Reject values that would change the shape of the algorithm.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(invalid("engine.window_size", "must be at least 1"));
        }
        if self.hold_frames == 0 {
            return Err(invalid("engine.hold_frames", "must be at least 1"));
        }
        if !self.word_pause_seconds.is_finite() || self.word_pause_seconds < 0.0 {
            return Err(invalid(
                "engine.word_pause_seconds",
                "must be a non-negative number of seconds",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid("engine.min_confidence", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.correction_cutoff) {
            return Err(invalid("engine.correction_cutoff", "must be within [0, 1]"));
        }
        if self.max_suggestions == 0 {
            return Err(invalid("engine.max_suggestions", "must be at least 1"));
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sessions == Some(0) {
            return Err(invalid("store.max_sessions", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> SignshError {
    SignshError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values; the result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SignshError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SignshError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML or invalid
    /// values are still reported.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(SignshError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SIGNSH_LABELS → resources.labels_path
    /// - SIGNSH_WORDLIST → resources.wordlist_path
    /// - SIGNSH_SOCKET → server.socket_path
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(labels) = std::env::var("SIGNSH_LABELS")
            && !labels.is_empty()
        {
            self.resources.labels_path = Some(PathBuf::from(labels));
        }

        if let Ok(wordlist) = std::env::var("SIGNSH_WORDLIST")
            && !wordlist.is_empty()
        {
            self.resources.wordlist_path = Some(PathBuf::from(wordlist));
        }

        if let Ok(socket) = std::env::var("SIGNSH_SOCKET")
            && !socket.is_empty()
        {
            self.server.socket_path = Some(PathBuf::from(socket));
        }

        self
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.store.validate()
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/signsh/config.toml on Linux, or a relative
    /// `signsh/config.toml` when no config directory is known.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join("signsh")
            .join("config.toml")
    }
}
