use crate::domain::ProcessRunner;
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Runs external commands through `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn stream(&self, argv: &[String], cwd: Option<&Path>) -> Result<i32> {
        let (program, args) = split_argv(argv)?;
        debug!("executando {}", argv.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .with_context(|| format!("executando {program}"))?;

        Ok(exit_code(status))
    }

    fn capture(&self, argv: &[String], cwd: Option<&Path>) -> Result<String> {
        let (program, args) = split_argv(argv)?;
        debug!("capturando saída de {}", argv.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        // stderr stays on the terminal so the orchestrator's own diagnostics
        // reach the user even in capture mode.
        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("executando {program}"))?;

        if !output.status.success() {
            bail!(
                "{program} retornou status {:?}",
                exit_code(output.status)
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn split_argv(argv: &[String]) -> Result<(&String, &[String])> {
    match argv.split_first() {
        Some(parts) => Ok(parts),
        None => bail!("linha de comando vazia"),
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    // Shell convention for signal deaths.
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
