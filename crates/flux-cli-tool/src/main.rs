//! fluxw - run the packaged Flux CLI through flux-cli
//!
//! ## Commands
//!
//! - `install`: Install Flux into the current (or given) kube context
//! - `create source oci`: Create an OCIRepository source
//! - `create kustomization`: Create a Kustomization
//! - `reconcile`: Reconcile a source or kustomization
//! - `info`: Show platform and binary resolution details

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use flux_cli::{
    binary_name, init_tracing, CancellationToken, Flux, FluxConfig, InstallOptions,
    KustomizationOptions, OciSourceOptions, PlatformKey, ReconcilableResource, ReconcileOptions,
    DEFAULT_NAMESPACE,
};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "fluxw")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run the packaged Flux CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding the packaged flux binaries
    #[arg(long, global = true, env = "FLUX_CLI_INSTALL_DIR")]
    install_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install Flux onto the cluster
    Install {
        /// kubeconfig context to use
        #[arg(long)]
        context: Option<String>,
    },

    /// Create Flux resources
    Create {
        #[command(subcommand)]
        action: CreateAction,
    },

    /// Trigger a reconciliation
    Reconcile {
        /// Resource kind (source or kustomization)
        resource: ReconcilableResource,

        /// Resource name
        name: String,

        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },

    /// Show platform detection and binary resolution
    Info,
}

#[derive(Subcommand)]
enum CreateAction {
    /// Create a source
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },

    /// Create a Kustomization
    Kustomization {
        /// Kustomization name
        name: String,

        /// Source reference, e.g. OCIRepository/podinfo
        #[arg(long)]
        source: String,

        /// Path inside the source (default: repository root)
        #[arg(long, default_value = "")]
        path: String,

        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,

        #[arg(long, default_value = "5m")]
        interval: String,

        /// Comma-separated Kustomizations this one depends on
        #[arg(long, value_delimiter = ',')]
        depends_on: Option<Vec<String>>,

        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        prune: bool,

        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum SourceAction {
    /// Create an OCIRepository source
    Oci {
        /// Source name
        name: String,

        /// OCI repository URL
        #[arg(long)]
        url: String,

        #[arg(long, default_value = "latest")]
        tag: String,

        #[arg(long, default_value = "10m")]
        interval: String,

        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let config = match &cli.install_dir {
        Some(dir) => FluxConfig::new(dir),
        None => FluxConfig::from_env(),
    };

    // Ctrl-C kills the running flux process
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping flux");
            on_interrupt.cancel();
        }
    });

    run(cli.command, &config, &cancel).await
}

async fn run(command: Commands, config: &FluxConfig, cancel: &CancellationToken) -> Result<()> {
    match command {
        Commands::Install { context } => cmd_install(&resolve_flux(config)?, context, cancel).await,
        Commands::Create { action } => match action {
            CreateAction::Source {
                action:
                    SourceAction::Oci {
                        name,
                        url,
                        tag,
                        interval,
                        namespace,
                    },
            } => {
                let options = OciSourceOptions::new(&name, &url)
                    .with_tag(&tag)
                    .with_interval(&interval)
                    .with_namespace(&namespace);
                cmd_create_oci_source(&resolve_flux(config)?, &options, cancel).await
            }
            CreateAction::Kustomization {
                name,
                source,
                path,
                namespace,
                interval,
                depends_on,
                prune,
                wait,
            } => {
                let mut options = KustomizationOptions::new(&name, &source)
                    .with_path(&path)
                    .with_namespace(&namespace)
                    .with_interval(&interval)
                    .with_prune(prune)
                    .with_wait(wait);
                options.depends_on = depends_on;
                cmd_create_kustomization(&resolve_flux(config)?, &options, cancel).await
            }
        },
        Commands::Reconcile {
            resource,
            name,
            namespace,
        } => {
            let options = ReconcileOptions::new(resource, &name).with_namespace(&namespace);
            cmd_reconcile(&resolve_flux(config)?, &options, cancel).await
        }
        Commands::Info => cmd_info(config),
    }
}

/// `info` works without a binary; every other command needs one.
fn resolve_flux(config: &FluxConfig) -> Result<Flux> {
    Flux::from_config(config).context("Failed to locate the flux binary")
}

async fn cmd_install(
    flux: &Flux,
    context: Option<String>,
    cancel: &CancellationToken,
) -> Result<()> {
    let options = InstallOptions { context };
    flux.install(&options, Some(cancel))
        .await
        .context("Failed to install flux")?;

    println!("✓ Flux installed");
    Ok(())
}

async fn cmd_create_oci_source(
    flux: &Flux,
    options: &OciSourceOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    flux.create_oci_source(options, Some(cancel))
        .await
        .context("Failed to create OCI source")?;

    println!("✓ OCIRepository {}/{} created", options.namespace, options.name);
    Ok(())
}

async fn cmd_create_kustomization(
    flux: &Flux,
    options: &KustomizationOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    flux.create_kustomization(options, Some(cancel))
        .await
        .context("Failed to create Kustomization")?;

    println!("✓ Kustomization {}/{} created", options.namespace, options.name);
    Ok(())
}

async fn cmd_reconcile(
    flux: &Flux,
    options: &ReconcileOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    flux.reconcile(options, Some(cancel))
        .await
        .context(format!("Failed to reconcile {}", options.resource))?;

    println!(
        "✓ {} {}/{} reconciled",
        options.resource, options.namespace, options.name
    );
    Ok(())
}

/// Show platform and binary resolution details
fn cmd_info(config: &FluxConfig) -> Result<()> {
    let key = PlatformKey::current();

    println!("flux-cli Platform Info");
    println!("======================");
    println!();
    println!("OS family:   {}", key.os);
    println!("Arch:        {}", key.arch);
    println!("Runtime id:  {}", key.runtime_id);
    println!("Install dir: {}", config.install_dir.display());

    match binary_name(&key) {
        Ok(name) => println!("Binary name: {}", name),
        Err(e) => println!("Binary name: ({})", e),
    }
    match flux_cli::resolve_binary(&key, &config.install_dir) {
        Ok(path) => println!("Resolved:    {}", path.display()),
        Err(e) => println!("Resolved:    ✗ {}", e),
    }

    Ok(())
}
