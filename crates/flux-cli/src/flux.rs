//! The `Flux` handle: runs flux sub-commands against a resolved binary.

use crate::binary;
use crate::config::FluxConfig;
use crate::error::FluxError;
use crate::options::{InstallOptions, KustomizationOptions, OciSourceOptions, ReconcileOptions};
use crate::runner::{ProcessRunner, TokioProcessRunner};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Typed access to one flux binary.
///
/// The binary path is resolved once when the handle is built and reused for
/// every call. Clones share the runner; calls hold no mutable state, so
/// several may run concurrently.
#[derive(Clone)]
pub struct Flux {
    binary: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for Flux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flux").field("binary", &self.binary).finish()
    }
}

impl Flux {
    /// Wrap an already resolved binary and a runner.
    pub fn new(binary: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Flux {
            binary: binary.into(),
            runner,
        }
    }

    /// Resolve the binary for the running host from `config`.
    pub fn from_config(config: &FluxConfig) -> Result<Self> {
        let binary = binary::resolve_current(&config.install_dir)?;
        Ok(Self::new(binary, Arc::new(TokioProcessRunner::new())))
    }

    /// Resolve using [`FluxConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(&FluxConfig::from_env())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `flux install [--context <ctx>]`
    pub async fn install(
        &self,
        options: &InstallOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        self.execute(options.operation(), options.args(), cancel)
            .await
    }

    /// `flux create source oci <name> --url <url> ...`
    ///
    /// The URL is validated before anything is spawned.
    pub async fn create_oci_source(
        &self,
        options: &OciSourceOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let args = options.args()?;
        self.execute(options.operation(), args, cancel).await
    }

    /// `flux create kustomization <name> --source <source> ...`
    pub async fn create_kustomization(
        &self,
        options: &KustomizationOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let args = options.args()?;
        self.execute(options.operation(), args, cancel).await
    }

    /// `flux reconcile <source|kustomization> <name> --namespace <ns>`
    pub async fn reconcile(
        &self,
        options: &ReconcileOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let args = options.args()?;
        self.execute(options.operation(), args, cancel).await
    }

    /// Run one process and map its exit code. No retries.
    async fn execute(
        &self,
        operation: String,
        args: Vec<String>,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        info!("Running flux {}", operation);
        debug!("{:?} {:?}", self.binary, args);

        let output = match self.runner.run(&self.binary, &args, cancel).await {
            Ok(output) => output,
            Err(FluxError::Cancelled { .. }) => {
                warn!("flux {} cancelled", operation);
                return Err(FluxError::Cancelled { operation });
            }
            Err(FluxError::Io(source)) => {
                warn!("flux {} could not be run: {}", operation, source);
                return Err(FluxError::Spawn {
                    operation,
                    path: self.binary.clone(),
                    source,
                });
            }
            Err(e) => return Err(e),
        };

        if !output.success() {
            warn!("flux {} failed with exit code {}", operation, output.exit_code);
            return Err(FluxError::OperationFailed {
                operation,
                exit_code: output.exit_code,
                output: output.output,
            });
        }

        info!("flux {} succeeded", operation);
        Ok(())
    }
}
