use crate::domain::ProcessRunner;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallMode {
    Stream,
    Capture,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub mode: CallMode,
}

/// In-memory `ProcessRunner` that records every invocation instead of
/// spawning anything.
#[derive(Debug)]
pub struct MockRunner {
    calls: RwLock<Vec<RecordedCall>>,
    capture_output: RwLock<String>,
    stream_code: RwLock<i32>,
    fail_on: RwLock<Option<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            capture_output: RwLock::new(String::new()),
            stream_code: RwLock::new(0),
            fail_on: RwLock::new(None),
        }
    }

    /// What the next `capture` calls will print on stdout.
    pub fn set_capture_output(&self, output: &str) {
        *self.capture_output.write().unwrap() = output.to_string();
    }

    /// Exit code returned by `stream` calls (default 0).
    pub fn set_stream_code(&self, code: i32) {
        *self.stream_code.write().unwrap() = code;
    }

    /// Makes the given operation ("stream" or "capture") fail.
    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn clear_fail_on(&self) {
        *self.fail_on.write().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn capture_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| call.mode == CallMode::Capture)
            .count()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.read().unwrap().last().cloned()
    }

    fn record(&self, argv: &[String], cwd: Option<&Path>, mode: CallMode) {
        self.calls.write().unwrap().push(RecordedCall {
            argv: argv.to_vec(),
            cwd: cwd.map(Path::to_path_buf),
            mode,
        });
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for MockRunner {
    fn stream(&self, argv: &[String], cwd: Option<&Path>) -> Result<i32> {
        self.record(argv, cwd, CallMode::Stream);
        self.check_fail("stream")?;

        Ok(*self.stream_code.read().unwrap())
    }

    fn capture(&self, argv: &[String], cwd: Option<&Path>) -> Result<String> {
        self.record(argv, cwd, CallMode::Capture);
        self.check_fail("capture")?;

        Ok(self.capture_output.read().unwrap().clone())
    }
}
