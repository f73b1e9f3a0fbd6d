//! flux-cli: typed access to the Flux GitOps command-line binary
//!
//! This crate picks the packaged `flux` executable for the running platform,
//! builds argument vectors for a fixed set of sub-commands and runs them as
//! child processes, turning non-zero exit codes into [`FluxError`]s that
//! carry the captured output.
//!
//! ## Modules
//!
//! - [`platform`]  - `PlatformKey` detection (OS family, architecture, runtime id)
//! - [`binary`]    - binary table and path resolution
//! - [`options`]   - per-operation options and argument building
//! - [`runner`]    - `ProcessRunner` trait and the tokio implementation
//! - [`flux`]      - the `Flux` handle tying it together
//! - [`fakes`]     - scripted runner for tests
//!
//! ```no_run
//! use flux_cli::{Flux, ReconcilableResource, ReconcileOptions};
//!
//! # async fn demo() -> flux_cli::Result<()> {
//! let flux = Flux::from_env()?;
//! flux.reconcile(&ReconcileOptions::new(ReconcilableResource::Source, "podinfo"), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod fakes;
pub mod flux;
pub mod options;
pub mod platform;
pub mod resource;
pub mod runner;
pub mod telemetry;

pub use binary::{binary_name, resolve_binary, resolve_current, BINARY_TABLE};
pub use config::FluxConfig;
pub use error::FluxError;
pub use flux::Flux;
pub use options::{
    InstallOptions, KustomizationOptions, OciSourceOptions, ReconcileOptions, DEFAULT_NAMESPACE,
};
pub use platform::{Architecture, OsFamily, PlatformKey};
pub use resource::ReconcilableResource;
pub use runner::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use telemetry::init_tracing;
pub use tokio_util::sync::CancellationToken;

/// Result type for flux-cli operations
pub type Result<T> = std::result::Result<T, FluxError>;
