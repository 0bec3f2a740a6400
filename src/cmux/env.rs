//! Probe for a running cmux instance.

use std::path::PathBuf;

/// Socket created by a running cmux instance
const DEFAULT_SOCKET_PATH: &str = "/tmp/cmux.sock";

/// Where to look for a running cmux instance.
///
/// Plain data rather than ambient `std::env` reads inside the predicate, so
/// the probe can be exercised in tests without process-level mocking.
#[derive(Debug, Clone)]
pub struct CmuxEnv {
    /// Socket path whose existence marks a live cmux
    pub socket_path: PathBuf,
    /// Workspace id cmux exports into its child processes
    pub workspace_id: Option<String>,
}

impl CmuxEnv {
    /// Build from the process environment
    pub fn from_env() -> Self {
        let socket_path = std::env::var("CMUX_SOCKET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH));
        let workspace_id = std::env::var("CMUX_WORKSPACE_ID")
            .ok()
            .filter(|v| !v.is_empty());
        Self {
            socket_path,
            workspace_id,
        }
    }

    /// Whether the host process is running inside a cmux workspace
    pub fn is_active(&self) -> bool {
        self.socket_path.exists() || self.workspace_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_socket() -> PathBuf {
        PathBuf::from("/nonexistent/cmux-test.sock")
    }

    #[test]
    fn test_inactive_without_socket_or_workspace() {
        let env = CmuxEnv {
            socket_path: missing_socket(),
            workspace_id: None,
        };
        assert!(!env.is_active());
    }

    #[test]
    fn test_active_when_socket_exists() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("cmux.sock");
        std::fs::write(&socket_path, b"").unwrap();

        let env = CmuxEnv {
            socket_path,
            workspace_id: None,
        };
        assert!(env.is_active());
    }

    #[test]
    fn test_active_when_workspace_id_set() {
        let env = CmuxEnv {
            socket_path: missing_socket(),
            workspace_id: Some("ws-1".to_string()),
        };
        assert!(env.is_active());
    }

    #[test]
    fn test_active_when_both_present() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("cmux.sock");
        std::fs::write(&socket_path, b"").unwrap();

        let env = CmuxEnv {
            socket_path,
            workspace_id: Some("ws-1".to_string()),
        };
        assert!(env.is_active());
    }
}
