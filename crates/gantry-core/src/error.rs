//! Error types for gantry

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using GantryError
pub type Result<T> = std::result::Result<T, GantryError>;

/// Main error type for gantry operations
#[derive(Debug, Error)]
pub enum GantryError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registry resolution errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Package manifest errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// npm/yarn invocation errors
    #[error(transparent)]
    Npm(#[from] NpmError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Registry resolution errors
///
/// Produced while turning raw credential fields into a resolved registry
/// configuration. All of these abort the calling pipeline step.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required credential field is absent
    #[error("Missing required registry field: {0}")]
    MissingField(String),

    /// No usable authentication method could be resolved
    #[error("Missing credentials: provide {0}")]
    MissingCredentials(String),

    /// The package version carries components the pipeline owns
    #[error("Invalid package version: {0}")]
    InvalidVersion(String),
}

/// Package manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Package manifest not found
    #[error("Package manifest not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse manifest
    #[error("Failed to parse manifest: {0}")]
    ParseError(String),

    /// Failed to update manifest
    #[error("Failed to update manifest: {0}")]
    UpdateError(String),
}

/// npm/yarn invocation errors
#[derive(Debug, Error)]
pub enum NpmError {
    /// Required tool binary is not on PATH
    #[error("Required tool not found on PATH: {0}")]
    ToolNotFound(String),

    /// Command exited with a failure status
    #[error("Command failed: {command} - {reason}")]
    CommandFailed { command: String, reason: String },

    /// npm refused to version a dirty working directory
    #[error("Working directory has uncommitted changes")]
    DirtyWorkingDirectory,

    /// `npm version` produced unrecognizable output
    #[error("Version bump failed: {output}")]
    BumpFailed { output: String },
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Failed to clone
    #[error("Failed to clone {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    /// Failed to push
    #[error("Failed to push to remote: {0}")]
    PushFailed(String),

    /// Failed to rebase
    #[error("Failed to rebase: {0}")]
    RebaseFailed(String),

    /// Local branch diverged from its remote after a push
    #[error("Branch {branch} is not in sync with its remote")]
    OutOfSync { branch: String },

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Malformed `owner/name` repository reference
    #[error("Invalid repository reference: {0}")]
    InvalidRepository(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

impl GantryError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
