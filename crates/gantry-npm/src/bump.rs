//! Version bumping through `npm version`
//!
//! The pipeline does not compute the next version itself; npm does, and the
//! output is validated against the exact tag shape a plain release bump
//! produces. Anything else aborts the step.

use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use tracing::{info, instrument};

use gantry_core::error::{NpmError, Result};
use gantry_core::BumpLevel;

const DIRTY_MESSAGE: &str = "Git working directory not clean.";

/// Run `npm version <level>` in a cloned repository
///
/// `base_directory` points at a sub-package inside the repository; npm
/// refuses to version a directory without its own `.git`, so a placeholder
/// is created there first.
///
/// Returns the new version tag (`vX.Y.Z`) npm printed.
#[instrument(fields(repo_dir = %repo_dir.display(), base_directory = ?base_directory, level = %level))]
pub fn bump_package(
    repo_dir: &Path,
    base_directory: Option<&Path>,
    level: BumpLevel,
) -> Result<String> {
    let work_dir = work_dir(repo_dir, base_directory);

    if work_dir != repo_dir {
        // npm version refuses to run in a subdirectory without this
        std::fs::create_dir_all(work_dir.join(".git"))?;
    }

    let npm = which::which("npm").map_err(|_| NpmError::ToolNotFound("npm".to_string()))?;

    let start = std::time::Instant::now();
    let output = Command::new(npm)
        .args(["version", level.as_str()])
        .current_dir(&work_dir)
        .output()
        .map_err(|e| NpmError::CommandFailed {
            command: format!("npm version {}", level),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if stdout.contains(DIRTY_MESSAGE) || stderr.contains(DIRTY_MESSAGE) {
        return Err(NpmError::DirtyWorkingDirectory.into());
    }

    if !output.status.success() {
        return Err(NpmError::CommandFailed {
            command: format!("npm version {}", level),
            reason: stderr.trim().to_string(),
        }
        .into());
    }

    let tag = parse_bump_output(&stdout)?;

    info!(
        %tag,
        duration_ms = start.elapsed().as_millis(),
        "bumped package version"
    );
    Ok(tag)
}

fn work_dir(repo_dir: &Path, base_directory: Option<&Path>) -> PathBuf {
    match base_directory {
        Some(base) if base.as_os_str() != "." && !base.as_os_str().is_empty() => {
            repo_dir.join(base)
        }
        _ => repo_dir.to_path_buf(),
    }
}

/// Validate `npm version` output and extract the new tag
///
/// npm prints the new tag as its last line; pre/post-version scripts may
/// print above it. The tag must be a plain `vX.Y.Z`.
pub fn parse_bump_output(stdout: &str) -> std::result::Result<String, NpmError> {
    let tag_re = Regex::new(r"^v\d+\.\d+\.\d+$").unwrap();

    let last_line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if tag_re.is_match(last_line) {
        Ok(last_line.to_string())
    } else {
        Err(NpmError::BumpFailed {
            output: stdout.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_tag() {
        assert_eq!(parse_bump_output("v1.2.4\n").unwrap(), "v1.2.4");
    }

    #[test]
    fn test_parse_tag_after_script_output() {
        let output = "> explorer-cli@1.2.3 preversion\n> npm test\n\nv1.2.4\n";
        assert_eq!(parse_bump_output(output).unwrap(), "v1.2.4");
    }

    #[test]
    fn test_parse_rejects_prerelease_tag() {
        let result = parse_bump_output("v1.2.4-beta.0\n");
        assert!(matches!(result, Err(NpmError::BumpFailed { .. })));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = parse_bump_output("npm ERR! something went wrong\n");
        assert!(matches!(result, Err(NpmError::BumpFailed { .. })));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_bump_output("").is_err());
    }

    #[test]
    fn test_work_dir_root() {
        let repo = Path::new("/tmp/repo");
        assert_eq!(work_dir(repo, None), PathBuf::from("/tmp/repo"));
        assert_eq!(
            work_dir(repo, Some(Path::new("."))),
            PathBuf::from("/tmp/repo")
        );
    }

    #[test]
    fn test_work_dir_sub_package() {
        let repo = Path::new("/tmp/repo");
        assert_eq!(
            work_dir(repo, Some(Path::new("packages/cli"))),
            PathBuf::from("/tmp/repo/packages/cli")
        );
    }
}
