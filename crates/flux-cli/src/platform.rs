//! Host platform detection
//!
//! A [`PlatformKey`] is the (OS family, CPU architecture, runtime identifier)
//! triple used to pick a packaged flux binary. It is computed from the host
//! by [`PlatformKey::current`], or built directly so tests can inject any
//! tuple.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// Linux, macOS and other Unix-likes
    Unix,
    /// Windows NT
    Windows,
}

impl OsFamily {
    /// OS family of the running process.
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Unix => write!(f, "unix"),
            OsFamily::Windows => write!(f, "windows"),
        }
    }
}

/// CPU architecture of the running process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
    Arm,
    Arm64,
    /// Anything else the toolchain can target
    Unknown,
}

impl Architecture {
    /// Architecture of the running process.
    pub fn current() -> Self {
        Self::from_target_arch(std::env::consts::ARCH)
    }

    /// Map a Rust `target_arch` name onto an [`Architecture`].
    pub fn from_target_arch(arch: &str) -> Self {
        match arch {
            "x86" => Architecture::X86,
            "x86_64" => Architecture::X64,
            "arm" => Architecture::Arm,
            "aarch64" => Architecture::Arm64,
            _ => Architecture::Unknown,
        }
    }

    /// Suffix used in runtime identifiers (`x64`, `arm64`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform triple used for binary lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformKey {
    pub os: OsFamily,
    pub arch: Architecture,
    /// Runtime identifier such as `linux-x64` or `win-arm64`
    pub runtime_id: String,
}

impl PlatformKey {
    /// Create a key from explicit parts.
    pub fn new(os: OsFamily, arch: Architecture, runtime_id: impl Into<String>) -> Self {
        PlatformKey {
            os,
            arch,
            runtime_id: runtime_id.into(),
        }
    }

    /// Key describing the running process.
    pub fn current() -> Self {
        let arch = Architecture::current();
        let runtime_id = runtime_id_for(std::env::consts::OS, std::env::consts::ARCH);
        PlatformKey::new(OsFamily::current(), arch, runtime_id)
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.runtime_id)
    }
}

/// Build a runtime identifier from Rust's `target_os` and `target_arch` names.
///
/// Known values follow the `<os>-<arch>` convention of the packaged binaries
/// (`osx-arm64`, `linux-x64`, `win-x64`); unknown ones pass through unchanged
/// so they fail lookup instead of being guessed.
pub fn runtime_id_for(target_os: &str, target_arch: &str) -> String {
    let os = match target_os {
        "macos" => "osx",
        "windows" => "win",
        other => other,
    };
    let arch = match Architecture::from_target_arch(target_arch) {
        Architecture::Unknown => target_arch,
        known => known.as_str(),
    };
    format!("{os}-{arch}")
}
