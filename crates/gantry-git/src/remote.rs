//! Remote operations
//!
//! Push, signoff rebase, and remote head lookup shell out to the git CLI so
//! the runner's ambient authentication applies.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::repository::{GitRepo, Result};
use gantry_core::error::GitError;

/// A repository reference in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Parse an `owner/name` reference
    pub fn parse(reference: &str) -> Result<Self> {
        match reference.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GitError::InvalidRepository(reference.to_string())),
        }
    }

    /// HTTPS clone URL for this repository
    pub fn https_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Push a branch using the git CLI
#[instrument(fields(dir = %dir.display(), remote, branch))]
pub fn git_push(dir: &Path, remote: &str, branch: &str) -> Result<()> {
    let start = std::time::Instant::now();
    let output = Command::new("git")
        .args(["push", remote, branch])
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::PushFailed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::PushFailed(stderr.trim().to_string()));
    }

    info!(
        remote,
        branch,
        duration_ms = start.elapsed().as_millis(),
        "pushed branch"
    );
    Ok(())
}

/// Sign off the most recent commit
///
/// `npm version` authors the bump commit without a Signed-off-by trailer;
/// this rewrites it in place before pushing.
#[instrument(fields(dir = %dir.display()))]
pub fn rebase_signoff(dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["rebase", "HEAD~1", "--signoff"])
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::RebaseFailed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::RebaseFailed(stderr.trim().to_string()));
    }

    info!("signed off version commit");
    Ok(())
}

/// Look up the head commit id of a remote branch
///
/// Returns `None` when the remote has no such branch.
pub fn remote_head(dir: &Path, remote: &str, branch: &str) -> Result<Option<String>> {
    let refspec = format!("refs/heads/{}", branch);
    let output = Command::new("git")
        .args(["ls-remote", remote, &refspec])
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::RemoteNotFound(format!("{}: {}", remote, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::RemoteNotFound(format!(
            "{}: {}",
            remote,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .split_whitespace()
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string))
}

impl GitRepo {
    /// Check whether the local HEAD matches the remote branch head
    #[instrument(skip(self), fields(remote, branch))]
    pub fn is_sync(&self, remote: &str, branch: &str) -> Result<bool> {
        let local = self.head_id()?.to_string();
        let remote_id = remote_head(self.path(), remote, branch)?;

        let synced = remote_id.as_deref() == Some(local.as_str());
        info!(%local, ?remote_id, synced, "compared branch heads");
        Ok(synced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let r = RepoRef::parse("myorg/explorer-cli").unwrap();
        assert_eq!(r.owner, "myorg");
        assert_eq!(r.name, "explorer-cli");
        assert_eq!(r.to_string(), "myorg/explorer-cli");
    }

    #[test]
    fn test_repo_ref_https_url() {
        let r = RepoRef::parse("myorg/explorer-cli").unwrap();
        assert_eq!(
            r.https_url(),
            "https://github.com/myorg/explorer-cli.git"
        );
    }

    #[test]
    fn test_repo_ref_rejects_malformed() {
        assert!(RepoRef::parse("no-slash").is_err());
        assert!(RepoRef::parse("/name").is_err());
        assert!(RepoRef::parse("owner/").is_err());
        assert!(RepoRef::parse("a/b/c").is_err());
    }
}
