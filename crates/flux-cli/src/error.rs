//! Error types for flux-cli

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::{Architecture, OsFamily};

/// Errors that can occur while resolving or running the Flux binary
#[derive(Error, Debug)]
pub enum FluxError {
    /// No packaged binary exists for the host platform
    #[error("Unsupported platform: {os} {arch} ({runtime_id})")]
    UnsupportedPlatform {
        os: OsFamily,
        arch: Architecture,
        runtime_id: String,
    },

    /// The platform is supported but its binary is missing on disk
    #[error("{} not found.", .path.display())]
    BinaryNotFound { path: PathBuf },

    /// A caller-supplied argument was rejected before spawning
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// Flux exited with a non-zero status
    #[error("flux {operation} failed with exit code {exit_code}: {output}")]
    OperationFailed {
        operation: String,
        exit_code: i32,
        output: String,
    },

    /// The caller's cancellation token fired while flux was running
    #[error("flux {operation} was cancelled")]
    Cancelled { operation: String },

    /// The flux binary could not be started or waited on
    #[error("Failed to run flux {operation} ({}): {source}", .path.display())]
    Spawn {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FluxError {
    pub(crate) fn invalid_argument(argument: &str, reason: impl Into<String>) -> Self {
        FluxError::InvalidArgument {
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }

    /// Captured flux output, present only for [`FluxError::OperationFailed`].
    pub fn output(&self) -> Option<&str> {
        match self {
            FluxError::OperationFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}
