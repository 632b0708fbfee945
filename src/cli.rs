//! Command-line interface for signsh
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Sign-to-text sentence engine
#[derive(Parser, Debug)]
#[command(
    name = "signsh",
    version,
    about = "Turn per-frame hand-sign classifications into words"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: commits and word breaks, -vv: everything)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter derived from `-q` / `-v`.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Parse a duration string.
///
/// Supports any duration format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`, `2m30s`).
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Idle TTL: a duration of at least one second.
fn parse_idle_ttl(s: &str) -> Result<Duration, String> {
    let ttl = parse_duration(s)?;
    if ttl < Duration::from_secs(1) {
        return Err(format!(
            "idle TTL must be at least 1s, got {}",
            humantime::format_duration(ttl)
        ));
    }
    Ok(ttl)
}

fn parse_max_sessions(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("session limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("confidence must be within [0, 1], got {value}"))
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the sentence engine behind the IPC socket (foreground)
    Daemon {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
        /// Drop sessions idle longer than this, in whole seconds. Examples: 30s, 5m
        #[arg(long, value_name = "DURATION", value_parser = parse_idle_ttl)]
        idle_ttl: Option<Duration>,
        /// Maximum number of live sessions
        #[arg(long, value_name = "N", value_parser = parse_max_sessions)]
        max_sessions: Option<usize>,
    },

    /// Send one observation to the daemon
    Observe {
        /// Client identifier (default: "default")
        #[arg(long, value_name = "ID")]
        client: Option<String>,
        /// Classifier label index
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        label: Option<i64>,
        /// Classifier confidence in [0, 1]
        #[arg(long, value_name = "C", default_value = "1.0", value_parser = parse_confidence)]
        confidence: f32,
        /// No hand in frame
        #[arg(long)]
        no_hand: bool,
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Print a client's current sentence
    Sentence {
        /// Client identifier (default: "default")
        #[arg(long, value_name = "ID")]
        client: Option<String>,
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Discard a client's session
    Reset {
        /// Client identifier (default: "default")
        #[arg(long, value_name = "ID")]
        client: Option<String>,
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Show loaded resources and live sessions
    Health {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Stop the daemon
    Shutdown {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/signsh.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Run a recorded JSON-lines trace through an in-process engine
    Replay {
        /// Trace file ("-" for stdin)
        file: PathBuf,
        /// Client identifier (default: "default")
        #[arg(long, value_name = "ID")]
        client: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["signsh"]).is_err());
    }

    #[test]
    fn test_log_filter_levels() {
        let cli = Cli::try_parse_from(["signsh", "health"]).unwrap();
        assert_eq!(cli.log_filter(), "info");
        let cli = Cli::try_parse_from(["signsh", "-v", "health"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");
        let cli = Cli::try_parse_from(["signsh", "-vv", "health"]).unwrap();
        assert_eq!(cli.log_filter(), "trace");
        let cli = Cli::try_parse_from(["signsh", "health", "-q", "-v"]).unwrap();
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_parse_daemon_with_socket() {
        let cli = Cli::try_parse_from(["signsh", "daemon", "--socket", "/tmp/s.sock"]).unwrap();
        match cli.command {
            Commands::Daemon {
                socket,
                idle_ttl,
                max_sessions,
            } => {
                assert_eq!(socket, Some(PathBuf::from("/tmp/s.sock")));
                assert!(idle_ttl.is_none());
                assert!(max_sessions.is_none());
            }
            other => panic!("Expected Daemon command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_observe_defaults() {
        let cli = Cli::try_parse_from(["signsh", "observe", "--label", "4"]).unwrap();
        match cli.command {
            Commands::Observe {
                client,
                label,
                confidence,
                no_hand,
                socket,
            } => {
                assert!(client.is_none());
                assert_eq!(label, Some(4));
                assert_eq!(confidence, 1.0);
                assert!(!no_hand);
                assert!(socket.is_none());
            }
            other => panic!("Expected Observe command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_observe_no_hand() {
        let cli = Cli::try_parse_from(["signsh", "observe", "--no-hand", "--client", "cam"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Observe {
                no_hand: true,
                label: None,
                ..
            }
        ));
    }

    #[test]
    fn test_observe_negative_label_reaches_daemon() {
        // Rejected by the engine, not by the argument parser
        let cli = Cli::try_parse_from(["signsh", "observe", "--label", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Observe {
                label: Some(-1),
                ..
            }
        ));
    }

    #[test]
    fn test_observe_rejects_out_of_range_confidence() {
        assert!(Cli::try_parse_from(["signsh", "observe", "--confidence", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["signsh", "observe", "--confidence", "abc"]).is_err());
    }

    #[test]
    fn test_parse_sentence_and_reset_with_client() {
        let cli = Cli::try_parse_from(["signsh", "sentence", "--client", "a"]).unwrap();
        assert!(matches!(cli.command, Commands::Sentence { client: Some(ref c), .. } if c == "a"));
        let cli = Cli::try_parse_from(["signsh", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { client: None, .. }));
    }

    #[test]
    fn test_parse_daemon_session_policy() {
        let cli = Cli::try_parse_from([
            "signsh",
            "daemon",
            "--idle-ttl",
            "1m30s",
            "--max-sessions",
            "64",
        ])
        .unwrap();
        match cli.command {
            Commands::Daemon {
                idle_ttl,
                max_sessions,
                ..
            } => {
                assert_eq!(idle_ttl, Some(Duration::from_secs(90)));
                assert_eq!(max_sessions, Some(64));
            }
            other => panic!("Expected Daemon command, got {:?}", other),
        }
    }

    #[test]
    fn test_daemon_rejects_sub_second_ttl_and_zero_sessions() {
        assert!(Cli::try_parse_from(["signsh", "daemon", "--idle-ttl", "500ms"]).is_err());
        assert!(Cli::try_parse_from(["signsh", "daemon", "--idle-ttl", "0"]).is_err());
        assert!(Cli::try_parse_from(["signsh", "daemon", "--max-sessions", "0"]).is_err());
        assert!(Cli::try_parse_from(["signsh", "daemon", "--idle-ttl", "1s"]).is_ok());
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from(["signsh", "replay", "trace.jsonl", "--client", "cam"]).unwrap();
        match cli.command {
            Commands::Replay { file, client } => {
                assert_eq!(file, PathBuf::from("trace.jsonl"));
                assert_eq!(client.as_deref(), Some("cam"));
            }
            other => panic!("Expected Replay command, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["signsh", "replay", "t.jsonl", "--idle-ttl", "5m"]).is_err());
    }

    #[test]
    fn test_parse_duration_formats() {
        assert_eq!(parse_duration("45"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_duration("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration(" 2h "), Ok(Duration::from_secs(7200)));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["signsh", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn test_global_config_after_command() {
        let cli = Cli::try_parse_from(["signsh", "daemon", "--config", "/etc/signsh.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/signsh.toml")));
    }
}
