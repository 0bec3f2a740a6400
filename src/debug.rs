//! Diagnostic logging.
//!
//! Failures of the optional notifier must never reach the host session, so
//! everything here goes to stderr and an opt-in debug file — never back
//! through `cmux log`, which would loop.

use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Tag prefixed to stderr diagnostic lines
pub const TAG: &str = "[opencode-cmux]";

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize file debug logging
pub fn init_debug(enabled: bool) {
    let _ = DEBUG_ENABLED.set(enabled);
    if enabled {
        // Clear log file on startup
        if let Some(path) = debug_log_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(
                &path,
                format!("=== opencode-cmux debug log started at {} ===\n", Utc::now()),
            );
        }
    }
}

/// Get the path to the debug log file
pub fn debug_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|c| c.join("opencode-cmux").join("debug.log"))
}

/// Check if debug logging is enabled
pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get().unwrap_or(&false)
}

/// Write a debug log message (no-op unless enabled)
pub fn debug_log(msg: &str) {
    if is_debug_enabled() {
        if let Some(path) = debug_log_path() {
            if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
                let timestamp = Utc::now().format("%H:%M:%S%.3f");
                let _ = writeln!(file, "[{}] {}", timestamp, msg);
            }
        }
    }
}

/// Report a swallowed failure: tagged stderr line plus a debug log entry
pub fn diag(msg: &str) {
    eprintln!("{} {}", TAG, msg);
    debug_log(msg);
}
