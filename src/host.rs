//! Session metadata lookup against the opencode host.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

/// Socket the host serves session queries on
const DEFAULT_SOCKET_PATH: &str = "/tmp/opencode.sock";

/// Session metadata as reported by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub title: String,
    #[serde(rename = "parentID", default)]
    pub parent_id: Option<String>,
}

impl Session {
    /// Sessions without a parent are top-level; the rest are subagent runs
    pub fn is_subagent(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Anything that can resolve a session id to its metadata
pub trait SessionSource {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>>;
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "sessionID")]
    session_id: &'a str,
}

/// Host client speaking one-line JSON request/reply over a Unix socket
pub struct HostClient {
    socket_path: PathBuf,
}

impl HostClient {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    /// Socket path from OPENCODE_SOCKET_PATH, or the default
    pub fn from_env() -> Self {
        let socket_path = std::env::var("OPENCODE_SOCKET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH));
        Self::new(socket_path)
    }
}

impl SessionSource for HostClient {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let stream = UnixStream::connect(&self.socket_path).with_context(|| {
            format!(
                "failed to connect to host socket {}",
                self.socket_path.display()
            )
        })?;
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .context("failed to set read timeout")?;
        stream
            .set_write_timeout(Some(Duration::from_secs(2)))
            .context("failed to set write timeout")?;

        let request = SessionRequest {
            kind: "session.get",
            session_id,
        };
        let json = serde_json::to_string(&request).context("failed to serialize session request")?;

        let mut writer = &stream;
        writeln!(writer, "{}", json).context("failed to send session request")?;
        writer.flush().context("failed to flush session request")?;

        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .context("failed to read session reply")?;

        let line = line.trim();
        if line.is_empty() || line == "null" {
            return Ok(None);
        }
        let session: Session =
            serde_json::from_str(line).with_context(|| format!("bad session reply: {}", line))?;
        Ok(Some(session))
    }
}
