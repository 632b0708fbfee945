use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::{OwoColorize, Stream};
use signsh::cli::{Cli, Commands};
use signsh::config::Config;
use signsh::daemon::run_daemon;
use signsh::engine::SentenceEngine;
use signsh::ipc::client::send_command;
use signsh::ipc::protocol::{Command, Response};
use signsh::ipc::server::IpcServer;
use signsh::replay::{ReplayEvent, ReplayReport, replay};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Daemon {
            socket,
            idle_ttl,
            max_sessions,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(ttl) = idle_ttl {
                config.store.idle_ttl_secs = Some(ttl.as_secs());
            }
            if max_sessions.is_some() {
                config.store.max_sessions = max_sessions;
            }
            run_daemon(config, socket).await?;
        }
        Commands::Observe {
            client,
            label,
            confidence,
            no_hand,
            socket,
        } => {
            let command = Command::Observe {
                client_id: client,
                label_index: label,
                confidence,
                hand_present: !no_hand && label.is_some(),
            };
            handle_ipc_command(socket, command).await?;
        }
        Commands::Sentence { client, socket } => {
            handle_ipc_command(socket, Command::Sentence { client_id: client }).await?;
        }
        Commands::Reset { client, socket } => {
            handle_ipc_command(socket, Command::Reset { client_id: client }).await?;
        }
        Commands::Health { socket } => {
            handle_ipc_command(socket, Command::Health).await?;
        }
        Commands::Shutdown { socket } => {
            handle_ipc_command(socket, Command::Shutdown).await?;
        }
        Commands::Replay { file, client } => {
            let config = load_config(cli.config.as_deref())?;
            handle_replay(&config, &file, client.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "signsh",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/signsh/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides apply on top of all three.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Send a command to the daemon and print its response.
async fn handle_ipc_command(socket: Option<PathBuf>, command: Command) -> Result<()> {
    let socket_path = socket.unwrap_or_else(IpcServer::default_socket_path);

    let response = send_command(&socket_path, command)
        .await
        .with_context(|| format!("Is the daemon running? (socket: {})", socket_path.display()))?;

    match response {
        Response::Ok => {
            println!("{}", "ok".if_supports_color(Stream::Stdout, |t| t.green()));
        }
        Response::Observation {
            prediction,
            confidence,
            committed,
            sentence,
            ..
        } => {
            println!(
                "  {} {} ({:.2})",
                "Prediction:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                prediction.as_deref().unwrap_or("-"),
                confidence
            );
            if let Some(symbol) = committed {
                println!(
                    "  {}  {}",
                    "Committed:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    symbol.if_supports_color(Stream::Stdout, |t| t.green())
                );
            }
            println!(
                "  {}   {}",
                "Sentence:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                sentence
            );
        }
        Response::Sentence { sentence } => {
            println!("{}", sentence);
        }
        Response::Health {
            labels_loaded,
            labels_count,
            wordlist_loaded,
            wordlist_size,
            sessions,
        } => {
            let client_version = signsh::version_string();
            println!("Health:");
            println!(
                "  {}   {}",
                "Version:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                client_version
            );
            println!(
                "  {}    {}",
                "Labels:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                if labels_loaded {
                    labels_count.to_string()
                } else {
                    "numeric".to_string()
                }
            );
            println!(
                "  {}  {}",
                "Wordlist:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                if wordlist_loaded {
                    format!("{} words", wordlist_size)
                } else {
                    "off".to_string()
                }
            );
            println!(
                "  {}  {}",
                "Sessions:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
                sessions
            );
        }
        Response::Error { message } => {
            eprintln!(
                "{} {}",
                "Error:".if_supports_color(Stream::Stderr, |t| t.red()),
                message
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Replay a trace file (or stdin) through a local engine.
fn handle_replay(config: &Config, file: &Path, client: Option<&str>) -> Result<()> {
    let engine = SentenceEngine::from_config(config)?;

    let report = if file == Path::new("-") {
        replay(&engine, client, std::io::stdin().lock())?
    } else {
        let trace = std::fs::File::open(file)
            .with_context(|| format!("Failed to open trace {}", file.display()))?;
        replay(&engine, client, BufReader::new(trace))?
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for event in &report.events {
        match event {
            ReplayEvent::Commit {
                t,
                symbol,
                appended: true,
            } => println!(
                "{:>8.2}s  {}",
                t,
                symbol.if_supports_color(Stream::Stdout, |s| s.green())
            ),
            ReplayEvent::Commit {
                t,
                symbol,
                appended: false,
            } => println!(
                "{:>8.2}s  {}",
                t,
                format!("{symbol} (repeat)").if_supports_color(Stream::Stdout, |s| s.dimmed())
            ),
            ReplayEvent::WordBreak { t, sentence } => println!(
                "{:>8.2}s  {} {:?}",
                t,
                "word".if_supports_color(Stream::Stdout, |s| s.cyan()),
                sentence
            ),
            ReplayEvent::Rejected { line, reason } => eprintln!(
                "{} line {}: {}",
                "skipped".if_supports_color(Stream::Stderr, |s| s.yellow()),
                line,
                reason
            ),
        }
    }

    println!(
        "{} frames, {} letters, {} rejected",
        report.frames,
        report.commits(),
        report.rejected()
    );
    println!("{}", report.sentence.if_supports_color(Stream::Stdout, |s| s.bold()));
}
