//! Child process execution.

use crate::error::FluxError;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Outcome of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (0 = success, -1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout followed by captured stderr.
    pub output: String,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an executable and captures its combined output.
///
/// Implementations spawn exactly one process per call and must stop it when
/// `cancel` fires, returning [`FluxError::Cancelled`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cancel: Option<&CancellationToken>,
    ) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cancel: Option<&CancellationToken>,
    ) -> Result<ProcessOutput> {
        let label = program_label(program);

        if cancel.is_some_and(|token| token.is_cancelled()) {
            return Err(FluxError::Cancelled { operation: label });
        }

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        debug!("Spawned {} (pid {:?})", label, child.id());

        // Dropping the wait future drops the child, which kills it.
        let output = match cancel {
            Some(token) => tokio::select! {
                result = child.wait_with_output() => result?,
                _ = token.cancelled() => {
                    warn!("Cancelled {} while running", label);
                    return Err(FluxError::Cancelled { operation: label });
                }
            },
            None => child.wait_with_output().await?,
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!("{} exited with code {}", label, exit_code);
        Ok(ProcessOutput::new(exit_code, combined))
    }
}

fn program_label(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
