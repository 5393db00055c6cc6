//! CI pipeline context
//!
//! The values a CI runner provides through its environment, captured once at
//! startup into an explicit struct. Library code never reads process
//! environment variables itself.

use std::path::PathBuf;

use chrono::Local;

/// Context for one pipeline run
#[derive(Debug, Clone)]
pub struct CiContext {
    /// Repository in `owner/name` form
    pub repository: String,
    /// Branch the pipeline operates on
    pub branch: String,
    /// Runner-provided scratch directory
    pub runner_temp: PathBuf,
}

impl CiContext {
    /// Create a new context
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        runner_temp: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            runner_temp: runner_temp.into(),
        }
    }

    /// Repository name without the owner prefix
    pub fn repo_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// Per-run scratch directory for a registry clone
    ///
    /// Timestamped so concurrent runs on one runner never collide. The
    /// directory is not cleaned up here; CI runners dispose of their temp
    /// space after the job.
    pub fn clone_root(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d%H%M%S");
        self.runner_temp.join(format!(".tmp-npm-registry-{}", stamp))
    }

    /// Destination directory for cloning this repository
    pub fn clone_dir(&self) -> PathBuf {
        self.clone_root().join(self.repo_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        let ctx = CiContext::new("myorg/explorer-cli", "main", "/tmp");
        assert_eq!(ctx.repo_name(), "explorer-cli");
    }

    #[test]
    fn test_repo_name_without_owner() {
        let ctx = CiContext::new("explorer-cli", "main", "/tmp");
        assert_eq!(ctx.repo_name(), "explorer-cli");
    }

    #[test]
    fn test_clone_root_under_runner_temp() {
        let ctx = CiContext::new("myorg/explorer-cli", "main", "/tmp/runner");
        let root = ctx.clone_root();

        assert!(root.starts_with("/tmp/runner"));
        let name = root.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".tmp-npm-registry-"));
    }

    #[test]
    fn test_clone_dir_ends_with_repo_name() {
        let ctx = CiContext::new("myorg/explorer-cli", "main", "/tmp/runner");
        assert!(ctx.clone_dir().ends_with("explorer-cli"));
    }
}
