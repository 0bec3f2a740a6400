//! Fire-and-forget client for the cmux CLI.
//!
//! Every operation is a no-op outside a cmux workspace and swallows all
//! failure modes. The notifier is a cosmetic side channel; the host agent
//! session must keep running whether or not cmux is installed or healthy.

use crate::cmux::env::CmuxEnv;
use crate::debug::diag;
use anyhow::{Context, Result};
use std::process::Command;

/// Severity levels accepted by `cmux log`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl LogLevel {
    /// Spelling the cmux CLI expects (`warn` is the ergonomic alias,
    /// cmux itself spells it `warning`)
    fn as_arg(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warn => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Outcome of one cmux invocation
#[derive(Debug)]
pub struct CmuxExit {
    /// Exit code, or None when killed by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

/// Seam for spawning the external binary, so tests can record argv
/// instead of executing anything
pub trait CmuxTransport {
    fn invoke(&self, args: &[String]) -> Result<CmuxExit>;
}

/// Production transport: spawn `cmux` with captured output
pub struct CmuxCommand;

impl CmuxTransport for CmuxCommand {
    fn invoke(&self, args: &[String]) -> Result<CmuxExit> {
        let output = Command::new("cmux")
            .args(args)
            .output()
            .context("failed to spawn cmux")?;
        Ok(CmuxExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Best-effort wrapper around the cmux subcommands
pub struct CmuxClient<T: CmuxTransport = CmuxCommand> {
    env: CmuxEnv,
    transport: T,
}

impl CmuxClient<CmuxCommand> {
    pub fn new(env: CmuxEnv) -> Self {
        Self {
            env,
            transport: CmuxCommand,
        }
    }
}

impl<T: CmuxTransport> CmuxClient<T> {
    pub fn with_transport(env: CmuxEnv, transport: T) -> Self {
        Self { env, transport }
    }

    pub fn is_active(&self) -> bool {
        self.env.is_active()
    }

    /// Send a desktop notification
    pub fn notify(&self, title: &str, subtitle: Option<&str>, body: Option<&str>) {
        let mut args = vec![
            "notify".to_string(),
            "--title".to_string(),
            title.to_string(),
        ];
        if let Some(subtitle) = subtitle {
            args.push("--subtitle".to_string());
            args.push(subtitle.to_string());
        }
        if let Some(body) = body {
            args.push("--body".to_string());
            args.push(body.to_string());
        }
        self.best_effort("notify", args);
    }

    /// Set (or overwrite) the status slot at `key`
    pub fn set_status(&self, key: &str, text: &str, icon: Option<&str>, color: Option<&str>) {
        let mut args = vec!["set-status".to_string(), key.to_string()];
        if let Some(icon) = icon {
            args.push("--icon".to_string());
            args.push(icon.to_string());
        }
        if let Some(color) = color {
            args.push("--color".to_string());
            args.push(color.to_string());
        }
        // Status text goes after `--`; that is the syntax cmux accepts
        args.push("--".to_string());
        args.push(text.to_string());
        self.best_effort("set-status", args);
    }

    /// Remove the status slot at `key` (clearing an absent key is fine)
    pub fn clear_status(&self, key: &str) {
        self.best_effort(
            "clear-status",
            vec!["clear-status".to_string(), key.to_string()],
        );
    }

    /// Append a line to the cmux log stream
    pub fn log(&self, message: &str, level: Option<LogLevel>, source: Option<&str>) {
        let mut args = vec!["log".to_string()];
        if let Some(level) = level {
            args.push("--level".to_string());
            args.push(level.as_arg().to_string());
        }
        if let Some(source) = source {
            args.push("--source".to_string());
            args.push(source.to_string());
        }
        args.push("--".to_string());
        args.push(message.to_string());
        self.best_effort("log", args);
    }

    /// Run one cmux invocation, swallowing every failure mode
    fn best_effort(&self, action: &str, args: Vec<String>) {
        if !self.env.is_active() {
            return;
        }
        match self.transport.invoke(&args) {
            Ok(exit) => match exit.code {
                Some(0) => {}
                Some(code) if !exit.stderr.is_empty() => {
                    diag(&format!("cmux {} exited {}: {}", action, code, exit.stderr));
                }
                Some(code) => {
                    diag(&format!("cmux {} exited {}", action, code));
                }
                None => {
                    diag(&format!("cmux {} terminated by signal", action));
                }
            },
            Err(e) => diag(&format!("cmux {} failed: {:#}", action, e)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn client() -> (CmuxClient<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::default();
        let client = CmuxClient::with_transport(active_env(), transport.clone());
        (client, transport)
    }

    mod inactive {
        use super::*;

        #[test]
        fn test_no_invocations_when_inactive() {
            let transport = RecordingTransport::default();
            let client = CmuxClient::with_transport(inactive_env(), transport.clone());

            client.notify("title", Some("sub"), Some("body"));
            client.set_status("opencode", "working", Some("terminal"), Some("#f59e0b"));
            client.clear_status("opencode");
            client.log("message", Some(LogLevel::Error), Some("opencode"));

            assert!(transport.calls().is_empty());
        }
    }

    mod argv {
        use super::*;

        #[test]
        fn test_notify_title_only() {
            let (client, transport) = client();
            client.notify("Done: my session", None, None);

            assert_eq!(
                transport.calls(),
                vec![vec![
                    "notify".to_string(),
                    "--title".to_string(),
                    "Done: my session".to_string(),
                ]]
            );
        }

        #[test]
        fn test_notify_with_subtitle_and_body() {
            let (client, transport) = client();
            client.notify("Has a question", Some("Pick a branch"), Some("details"));

            let call = &transport.calls()[0];
            assert_eq!(
                call,
                &vec![
                    "notify".to_string(),
                    "--title".to_string(),
                    "Has a question".to_string(),
                    "--subtitle".to_string(),
                    "Pick a branch".to_string(),
                    "--body".to_string(),
                    "details".to_string(),
                ]
            );
        }

        #[test]
        fn test_set_status_text_after_separator() {
            let (client, transport) = client();
            client.set_status("opencode", "working", Some("terminal"), Some("#f59e0b"));

            let call = &transport.calls()[0];
            assert_eq!(call[0], "set-status");
            assert_eq!(call[1], "opencode");
            let sep = call.iter().position(|a| a == "--").unwrap();
            assert_eq!(call[sep + 1], "working");
            assert_eq!(sep + 2, call.len());
        }

        #[test]
        fn test_set_status_without_hints() {
            let (client, transport) = client();
            client.set_status("opencode", "waiting", None, None);

            assert_eq!(
                transport.calls()[0],
                vec![
                    "set-status".to_string(),
                    "opencode".to_string(),
                    "--".to_string(),
                    "waiting".to_string(),
                ]
            );
        }

        #[test]
        fn test_clear_status() {
            let (client, transport) = client();
            client.clear_status("opencode");

            assert_eq!(
                transport.calls(),
                vec![vec!["clear-status".to_string(), "opencode".to_string()]]
            );
        }

        #[test]
        fn test_log_level_warn_spelled_warning() {
            let (client, transport) = client();
            client.log("heads up", Some(LogLevel::Warn), None);

            let call = &transport.calls()[0];
            let level = call.iter().position(|a| a == "--level").unwrap();
            assert_eq!(call[level + 1], "warning");
        }

        #[test]
        fn test_log_with_source_and_message_after_separator() {
            let (client, transport) = client();
            client.log("Done: session", Some(LogLevel::Success), Some("opencode"));

            assert_eq!(
                transport.calls()[0],
                vec![
                    "log".to_string(),
                    "--level".to_string(),
                    "success".to_string(),
                    "--source".to_string(),
                    "opencode".to_string(),
                    "--".to_string(),
                    "Done: session".to_string(),
                ]
            );
        }
    }

    mod semantics {
        use super::*;

        /// Overwrite semantics: the latest set-status per key wins
        #[test]
        fn test_set_status_overwrite_keeps_latest() {
            let (client, transport) = client();
            client.set_status("opencode", "working", None, None);
            client.set_status("opencode", "question", None, None);

            let mut latest: Option<String> = None;
            for call in transport.calls() {
                if call[0] == "set-status" && call[1] == "opencode" {
                    latest = call.last().cloned();
                }
            }
            assert_eq!(latest.as_deref(), Some("question"));
        }

        #[test]
        fn test_spawn_failure_is_swallowed() {
            let client = CmuxClient::with_transport(active_env(), FailingTransport);
            client.notify("title", None, None);
            client.set_status("opencode", "working", None, None);
            client.clear_status("opencode");
            client.log("message", None, None);
        }
    }
}
