//! opencode -> cmux adapter.
//!
//! Reads opencode lifecycle events (NDJSON on stdin) and turns them into
//! desktop notifications, a status indicator and log lines via the cmux
//! CLI. Outside a cmux workspace the whole binary is a silent sink.

mod cmux;
mod debug;
mod events;
mod host;
mod router;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use cmux::{CmuxClient, CmuxEnv};
use events::HostEvent;
use host::HostClient;
use router::Router;

#[derive(Parser, Debug)]
#[command(name = "opencode-cmux")]
#[command(about = "Bridge opencode session events to cmux notifications")]
struct Args {
    /// Enable debug logging to the cache directory
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read host events from stdin and forward them to cmux (default)
    Run {
        /// Override the host session-query socket path
        #[arg(long)]
        host_socket: Option<PathBuf>,
    },
    /// Report whether a cmux environment was detected
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    debug::init_debug(args.debug);

    match args.command.unwrap_or(Command::Run { host_socket: None }) {
        Command::Run { host_socket } => run(host_socket).await,
        Command::Check => check(),
    }
}

/// Event loop: one JSON event per stdin line, until the host closes the
/// stream. A bad line never stops the loop.
async fn run(host_socket: Option<PathBuf>) -> Result<()> {
    let cmux = CmuxClient::new(CmuxEnv::from_env());
    if !cmux.is_active() {
        debug::debug_log("cmux environment not detected; running as a no-op sink");
    }
    let host = match host_socket {
        Some(path) => HostClient::new(path),
        None => HostClient::from_env(),
    };
    let router = Router::new(cmux, host);

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .context("failed to read event stream")?;
        if bytes_read == 0 {
            break; // host closed the stream
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match HostEvent::parse(line) {
            Ok(Some(event)) => router.handle_event(event),
            Ok(None) => {} // event kind we do not handle
            Err(e) => debug::diag(&format!("bad event: {:#}", e)),
        }
    }

    Ok(())
}

fn check() -> Result<()> {
    let env = CmuxEnv::from_env();
    if env.is_active() {
        println!("cmux environment active (socket: {})", env.socket_path.display());
        Ok(())
    } else {
        println!("cmux environment not detected");
        std::process::exit(1);
    }
}
