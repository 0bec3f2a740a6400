//! Wire types for the host event stream.
//!
//! Events arrive as newline-delimited JSON objects shaped
//! `{"type": "...", "properties": {...}}`. The host emits far more event
//! kinds than this adapter reacts to, so parsing goes through an envelope
//! and only the kinds we handle are lifted into [`HostEvent`].

use serde::Deserialize;
use serde_json::Value;

/// Raw event envelope as the host emits it
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: Value,
}

/// Missing or null `properties` deserializes like an empty object, so
/// optional fields still fall back instead of erroring
fn props_or_empty(value: Value) -> Value {
    if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value
    }
}

/// `session.status` sub-kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Busy,
    Idle,
    /// Sub-kinds we do not act on (the host also emits e.g. `retry`)
    Other,
}

#[derive(Debug, Deserialize)]
struct StatusProps {
    #[serde(rename = "sessionID")]
    session_id: String,
    status: StatusValue,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ErrorProps {
    #[serde(rename = "sessionID", default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionProps {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct Question {
    #[serde(default)]
    header: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PermissionProps {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolProps {
    #[serde(default)]
    tool: Option<String>,
}

/// Host events this adapter reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Session went busy or idle
    SessionStatus {
        session_id: String,
        status: StatusKind,
    },
    /// Session hit an error; the id may be absent
    SessionError { session_id: Option<String> },
    /// The agent asked the user a question
    QuestionAsked { header: String },
    /// A question was answered or dismissed
    QuestionClosed,
    /// Permission hook: the host is about to ask the user for approval.
    /// Observed only; this adapter never returns a decision.
    PermissionAsk { title: Option<String> },
    /// Pre-tool hook, observed only
    ToolExecuteBefore { tool: Option<String> },
}

impl HostEvent {
    /// Parse one NDJSON line from the host stream.
    ///
    /// Returns `Ok(None)` for event kinds this adapter does not handle.
    pub fn parse(line: &str) -> anyhow::Result<Option<HostEvent>> {
        let envelope: Envelope = serde_json::from_str(line)?;
        let event = match envelope.kind.as_str() {
            "session.status" => {
                let props: StatusProps = serde_json::from_value(props_or_empty(envelope.properties))?;
                let status = match props.status.kind.as_str() {
                    "busy" => StatusKind::Busy,
                    "idle" => StatusKind::Idle,
                    _ => StatusKind::Other,
                };
                Some(HostEvent::SessionStatus {
                    session_id: props.session_id,
                    status,
                })
            }
            "session.error" => {
                let props: ErrorProps = serde_json::from_value(props_or_empty(envelope.properties))?;
                Some(HostEvent::SessionError {
                    session_id: props.session_id,
                })
            }
            "question.asked" => {
                let props: QuestionProps = serde_json::from_value(props_or_empty(envelope.properties))?;
                let header = props
                    .questions
                    .into_iter()
                    .next()
                    .and_then(|q| q.header)
                    .unwrap_or_else(|| "Question".to_string());
                Some(HostEvent::QuestionAsked { header })
            }
            "question.replied" | "question.rejected" => Some(HostEvent::QuestionClosed),
            "permission.ask" => {
                let props: PermissionProps = serde_json::from_value(props_or_empty(envelope.properties))?;
                Some(HostEvent::PermissionAsk { title: props.title })
            }
            "tool.execute.before" => {
                let props: ToolProps = serde_json::from_value(props_or_empty(envelope.properties))?;
                Some(HostEvent::ToolExecuteBefore { tool: props.tool })
            }
            _ => None,
        };
        Ok(event)
    }
}
