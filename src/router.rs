//! Translation of host events into cmux actions.

use crate::cmux::{CmuxClient, CmuxTransport, LogLevel};
use crate::debug::{debug_log, diag};
use crate::events::{HostEvent, StatusKind};
use crate::host::{Session, SessionSource};

/// Status slot holding all opencode state in cmux
pub const STATUS_KEY: &str = "opencode";

/// Source tag attached to cmux log lines
const LOG_SOURCE: &str = "opencode";

/// Routes host events to the cmux client.
///
/// Stateless between events: each event is handled on its own, with session
/// metadata fetched fresh from the host when a title is needed.
pub struct Router<T: CmuxTransport, S: SessionSource> {
    cmux: CmuxClient<T>,
    host: S,
}

impl<T: CmuxTransport, S: SessionSource> Router<T, S> {
    pub fn new(cmux: CmuxClient<T>, host: S) -> Self {
        Self { cmux, host }
    }

    /// Handle one host event, issuing zero or more cmux calls
    pub fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::SessionStatus { session_id, status } => {
                self.handle_session_status(&session_id, status)
            }
            HostEvent::SessionError { session_id } => {
                self.handle_session_error(session_id.as_deref())
            }
            HostEvent::QuestionAsked { header } => self.handle_question(&header),
            HostEvent::QuestionClosed => self.cmux.clear_status(STATUS_KEY),
            HostEvent::PermissionAsk { title } => self.handle_permission(title.as_deref()),
            HostEvent::ToolExecuteBefore { tool } => {
                // Observed only: no cmux action, and never a veto
                debug_log(&format!(
                    "tool.execute.before: {}",
                    tool.as_deref().unwrap_or("unknown tool")
                ));
            }
        }
    }

    fn handle_session_status(&self, session_id: &str, status: StatusKind) {
        match status {
            StatusKind::Busy => {
                self.cmux
                    .set_status(STATUS_KEY, "working", Some("terminal"), Some("#f59e0b"));
            }
            StatusKind::Idle => {
                let session = self.lookup(session_id);
                let title = session
                    .as_ref()
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| session_id.to_string());

                if session.as_ref().is_some_and(|s| s.is_subagent()) {
                    // Subagent runs finish constantly; log only, no
                    // notification spam
                    self.cmux.log(
                        &format!("Subagent finished: {}", title),
                        Some(LogLevel::Info),
                        Some(LOG_SOURCE),
                    );
                } else {
                    self.cmux.notify(&format!("Done: {}", title), None, None);
                    self.cmux.log(
                        &format!("Done: {}", title),
                        Some(LogLevel::Success),
                        Some(LOG_SOURCE),
                    );
                }
                // Cleared for subagents too, the slot tracks the whole run
                self.cmux.clear_status(STATUS_KEY);
            }
            StatusKind::Other => {}
        }
    }

    fn handle_session_error(&self, session_id: Option<&str>) {
        let title = match session_id {
            Some(id) => self
                .lookup(id)
                .map(|s| s.title)
                .unwrap_or_else(|| id.to_string()),
            None => "unknown session".to_string(),
        };
        self.cmux.notify(&format!("Error: {}", title), None, None);
        self.cmux.log(
            &format!("Error in session: {}", title),
            Some(LogLevel::Error),
            Some(LOG_SOURCE),
        );
        self.cmux.clear_status(STATUS_KEY);
    }

    fn handle_question(&self, header: &str) {
        self.cmux
            .set_status(STATUS_KEY, "question", Some("help-circle"), Some("#a855f7"));
        self.cmux.notify("Has a question", Some(header), None);
        self.cmux.log(
            &format!("Question: {}", header),
            Some(LogLevel::Info),
            Some(LOG_SOURCE),
        );
    }

    fn handle_permission(&self, title: Option<&str>) {
        self.cmux.notify("Needs your permission", title, None);
        self.cmux
            .set_status(STATUS_KEY, "waiting", Some("lock"), Some("#ef4444"));
    }

    /// Fetch session metadata, degrading to None on any host failure
    fn lookup(&self, session_id: &str) -> Option<Session> {
        match self.host.get_session(session_id) {
            Ok(session) => session,
            Err(e) => {
                diag(&format!("session lookup failed for {}: {:#}", session_id, e));
                None
            }
        }
    }
}
