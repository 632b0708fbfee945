//! Default configuration constants for signsh.
//!
//! Shared by `EngineConfig`, `StoreConfig` and the CLI so that every entry
//! point agrees on the same tuning.

/// Number of recent observations the majority vote looks at.
///
/// Eight frames at a typical 10-15 fps camera covers roughly half a second,
/// enough to outvote a single flickering misclassification.
pub const WINDOW_SIZE: usize = 8;

/// Consecutive agreeing smoother outputs required before a letter is committed.
pub const HOLD_FRAMES: usize = 6;

/// Seconds without a detected hand before the current word is closed.
pub const WORD_PAUSE_SECONDS: f64 = 1.2;

/// Classifier confidence below which an observation does not vote.
pub const MIN_CONFIDENCE: f32 = 0.5;

/// Minimum normalized similarity for a dictionary word to replace a token.
pub const CORRECTION_CUTOFF: f64 = 0.7;

/// Maximum number of dictionary candidates considered per correction.
pub const MAX_SUGGESTIONS: usize = 3;

/// Upper bound on live sessions before least-recently-active ones are evicted.
pub const MAX_SESSIONS: usize = 1024;

/// Client identifier used when the caller does not supply one.
pub const DEFAULT_CLIENT_ID: &str = "default";

/// Separator inserted between words.
pub const WORD_SEPARATOR: char = ' ';

/// Socket file name inside `$XDG_RUNTIME_DIR`.
pub const SOCKET_NAME: &str = "signsh.sock";
