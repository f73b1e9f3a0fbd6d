//! Runs `Flux` against a shell script standing in for the flux binary.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};

use flux_cli::{
    binary_name, CancellationToken, Flux, FluxConfig, FluxError, InstallOptions, PlatformKey,
    ReconcilableResource, ReconcileOptions,
};
use tempfile::tempdir;

const FAKE_FLUX: &str = r#"#!/bin/sh
case "$1" in
  install)
    echo "✔ installed $*"
    exit 0
    ;;
  reconcile)
    echo "► annotating $2 $3"
    echo "✗ $2 '$3' not found" >&2
    exit 1
    ;;
  *)
    exec sleep 30
    ;;
esac
"#;

fn write_fake_flux(dir: &Path, name: &str) {
    let path = dir.join(name);
    std::fs::write(&path, FAKE_FLUX).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

// Kept as one test so no script is being written while another test forks.
#[tokio::test]
async fn test_fake_binary_end_to_end() {
    let Ok(name) = binary_name(&PlatformKey::current()) else {
        eprintln!("skipping: no packaged flux binary for this host");
        return;
    };

    let dir = tempdir().unwrap();
    write_fake_flux(dir.path(), name);
    let flux = Flux::from_config(&FluxConfig::new(dir.path())).unwrap();
    assert!(flux.binary().ends_with(name));

    // success
    flux.install(&InstallOptions::new().with_context("kind-e2e"), None)
        .await
        .unwrap();

    // non-zero exit carries stdout and stderr
    let err = flux
        .reconcile(
            &ReconcileOptions::new(ReconcilableResource::Source, "podinfo"),
            None,
        )
        .await
        .unwrap_err();
    match &err {
        FluxError::OperationFailed {
            exit_code, output, ..
        } => {
            assert_eq!(*exit_code, 1);
            assert!(output.contains("► annotating source podinfo"));
            assert!(output.contains("✗ source 'podinfo' not found"));
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("podinfo"));

    // cancellation kills the long-running child
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = flux
        .create_kustomization(
            &flux_cli::KustomizationOptions::new("podinfo", "OCIRepository/podinfo"),
            Some(&token),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FluxError::Cancelled { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_from_config_reports_missing_binary() {
    if binary_name(&PlatformKey::current()).is_err() {
        return;
    }
    let dir = tempdir().unwrap();
    let err = Flux::from_config(&FluxConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, FluxError::BinaryNotFound { .. }));
}
