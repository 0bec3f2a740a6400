//! Detection of the cmux environment and a best-effort client for its CLI.

pub mod client;
pub mod env;

pub use client::{CmuxClient, CmuxCommand, CmuxTransport, LogLevel};
pub use env::CmuxEnv;
