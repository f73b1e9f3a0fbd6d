//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the binary installation directory.
pub const INSTALL_DIR_ENV: &str = "FLUX_CLI_INSTALL_DIR";

/// Where to look for the packaged flux binaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluxConfig {
    /// Directory holding `flux-<rid>[.exe]`
    pub install_dir: PathBuf,
}

impl Default for FluxConfig {
    fn default() -> Self {
        FluxConfig {
            install_dir: std::env::var_os(INSTALL_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(executable_dir),
        }
    }
}

impl FluxConfig {
    /// Create a new config from environment variables
    ///
    /// Falls back to the directory of the running executable, where the
    /// binaries are shipped alongside the host application.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific installation directory
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        FluxConfig {
            install_dir: install_dir.into(),
        }
    }

    pub fn with_install_dir(mut self, install_dir: &Path) -> Self {
        self.install_dir = install_dir.to_path_buf();
        self
    }
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
