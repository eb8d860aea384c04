use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// Trait for external process execution
///
/// Every orchestrator invocation goes through this seam, so services can be
/// tested against a recording mock instead of a real docker-compose binary.
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run a command with inherited stdio and return its exit code.
    ///
    /// Used for the forwarded subcommands (`up`, `logs -f`, `exec`, ...),
    /// which must stream output unbuffered and may block until the user
    /// interrupts them.
    fn stream(&self, argv: &[String], cwd: Option<&Path>) -> Result<i32>;

    /// Run a command, capture its standard output and return it.
    ///
    /// A non-zero exit is an error. Standard error is not captured.
    fn capture(&self, argv: &[String], cwd: Option<&Path>) -> Result<String>;
}
