//! Git repository operations

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use tracing::{info, instrument};

use gantry_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound(path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = Repository::discover(start_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::NotARepository(start_path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the HEAD commit id
    pub fn head_id(&self) -> Result<git2::Oid> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id())
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            // Detached HEAD
            Ok(None)
        }
    }

    /// Check if the working directory is clean (no uncommitted changes)
    pub fn is_clean(&self) -> Result<bool> {
        let statuses = self.repo.statuses(None)?;

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_wt_new()
                || status.is_wt_modified()
                || status.is_wt_deleted()
            {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Clone a single branch of a repository into a destination directory
///
/// Shells out to the git CLI so the runner's ambient credential helpers
/// apply; libgit2 would need an explicit credential callback for every
/// authentication scheme a runner might use.
#[instrument(fields(url, dest = %dest.display(), branch))]
pub fn clone_branch(url: &str, dest: &Path, branch: &str) -> Result<GitRepo> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| GitError::CloneFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
    }

    let start = std::time::Instant::now();
    let output = Command::new("git")
        .args(["clone", "--branch", branch, "--single-branch", url])
        .arg(dest)
        .output()
        .map_err(|e| GitError::CloneFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CloneFailed {
            url: url.to_string(),
            reason: stderr.trim().to_string(),
        });
    }

    info!(
        url,
        branch,
        duration_ms = start.elapsed().as_millis(),
        "cloned branch"
    );
    GitRepo::open(dest)
}
