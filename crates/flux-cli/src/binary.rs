//! Flux binary resolution
//!
//! Maps a [`PlatformKey`] onto one of the packaged flux executables and
//! checks that it is present in the installation directory.

use crate::error::FluxError;
use crate::platform::{Architecture, OsFamily, PlatformKey};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One packaged binary per supported (OS, architecture, runtime id).
pub const BINARY_TABLE: &[(OsFamily, Architecture, &str, &str)] = &[
    (OsFamily::Unix, Architecture::X64, "osx-x64", "flux-osx-x64"),
    (OsFamily::Unix, Architecture::Arm64, "osx-arm64", "flux-osx-arm64"),
    (OsFamily::Unix, Architecture::X64, "linux-x64", "flux-linux-x64"),
    (OsFamily::Unix, Architecture::Arm64, "linux-arm64", "flux-linux-arm64"),
    (OsFamily::Windows, Architecture::X64, "win-x64", "flux-win-x64.exe"),
    (OsFamily::Windows, Architecture::Arm64, "win-arm64", "flux-win-arm64.exe"),
];

/// Look up the binary file name for a platform.
///
/// Exact match on all three parts. Touches no files.
pub fn binary_name(key: &PlatformKey) -> Result<&'static str> {
    BINARY_TABLE
        .iter()
        .find(|(os, arch, rid, _)| *os == key.os && *arch == key.arch && *rid == key.runtime_id)
        .map(|(_, _, _, name)| *name)
        .ok_or_else(|| FluxError::UnsupportedPlatform {
            os: key.os,
            arch: key.arch,
            runtime_id: key.runtime_id.clone(),
        })
}

/// Resolve the absolute path of the flux binary for `key` inside `install_dir`.
///
/// # Errors
///
/// - [`FluxError::UnsupportedPlatform`] when no table entry matches
/// - [`FluxError::BinaryNotFound`] when the file is missing
pub fn resolve_binary(key: &PlatformKey, install_dir: &Path) -> Result<PathBuf> {
    let name = binary_name(key)?;
    let path = std::path::absolute(install_dir.join(name))?;

    if !path.is_file() {
        return Err(FluxError::BinaryNotFound { path });
    }

    debug!("Resolved flux binary for {}: {:?}", key, path);
    Ok(path)
}

/// Resolve the flux binary for the running host.
pub fn resolve_current(install_dir: &Path) -> Result<PathBuf> {
    resolve_binary(&PlatformKey::current(), install_dir)
}
