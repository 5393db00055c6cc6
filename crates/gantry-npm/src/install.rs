//! Dependency installation
//!
//! Picks the install tool the same way the surrounding ecosystem would:
//! a yarn.lock means yarn owns the lockfile, a package-lock.json means
//! `npm ci` can reproduce it exactly, and anything else falls back to a
//! plain `npm install`. Auditing is deferred to a later pipeline stage.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use gantry_core::error::{NpmError, Result};

/// The install command selected for a package directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Installer {
    /// `yarn install`
    Yarn,
    /// `npm ci`
    NpmCi,
    /// `npm install --no-audit`
    NpmInstall,
}

impl Installer {
    /// The tool binary and arguments this installer runs
    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Yarn => ("yarn", &["install"]),
            Self::NpmCi => ("npm", &["ci"]),
            Self::NpmInstall => ("npm", &["install", "--no-audit"]),
        }
    }
}

impl std::fmt::Display for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (tool, args) = self.command();
        write!(f, "{} {}", tool, args.join(" "))
    }
}

/// Select the install command for a package directory
///
/// `always_npm_install` forces `npm install` even when a package-lock.json
/// would allow `npm ci`; a yarn.lock always wins.
pub fn select_installer(dir: &Path, always_npm_install: bool) -> Installer {
    if dir.join("yarn.lock").exists() {
        Installer::Yarn
    } else if always_npm_install {
        Installer::NpmInstall
    } else if dir.join("package-lock.json").exists() {
        Installer::NpmCi
    } else {
        Installer::NpmInstall
    }
}

/// Install dependencies in a package directory
///
/// Returns the installer that ran, for reporting.
#[instrument(fields(dir = %dir.display(), always_npm_install))]
pub fn install_dependencies(dir: &Path, always_npm_install: bool) -> Result<Installer> {
    let installer = select_installer(dir, always_npm_install);
    let (tool, args) = installer.command();

    let bin = which::which(tool).map_err(|_| NpmError::ToolNotFound(tool.to_string()))?;

    let start = std::time::Instant::now();
    let output = Command::new(bin)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| NpmError::CommandFailed {
            command: installer.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NpmError::CommandFailed {
            command: installer.to_string(),
            reason: stderr.trim().to_string(),
        }
        .into());
    }

    info!(
        installer = %installer,
        duration_ms = start.elapsed().as_millis(),
        "installed dependencies"
    );
    Ok(installer)
}
