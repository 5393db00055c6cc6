//! Gantry Git - Git operations for the gantry release pipeline
//!
//! This crate wraps the repository operations the pipeline needs: cloning a
//! branch into a scratch directory, pushing it back, signing off the bump
//! commit, and verifying the branch stayed in sync with its remote.

mod remote;
mod repository;

pub use remote::{git_push, rebase_signoff, remote_head, RepoRef};
pub use repository::{clone_branch, GitRepo, Result};
