//! Semantic version trunk parsing

use serde::{Deserialize, Serialize};

use gantry_core::error::{ManifestError, Result};

/// Decomposed components of a semantic version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTrunks {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
    /// Pre-release identifier
    pub prerelease: Option<String>,
    /// Build metadata
    pub metadata: Option<String>,
}

impl VersionTrunks {
    /// Create new version trunks
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            metadata: None,
        }
    }

    /// Set prerelease
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Set build metadata
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Parse a version string, tolerating a leading `v`
    pub fn parse(version: &str) -> Result<Self> {
        let stripped = version.strip_prefix('v').unwrap_or(version);

        let v = semver::Version::parse(stripped).map_err(|e| {
            ManifestError::ParseError(format!("invalid semantic version '{}': {}", version, e))
        })?;

        Ok(Self {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            prerelease: if v.pre.is_empty() {
                None
            } else {
                Some(v.pre.to_string())
            },
            metadata: if v.build.is_empty() {
                None
            } else {
                Some(v.build.to_string())
            },
        })
    }

    /// Whether this is a plain release version, with no pre-release
    /// identifier and no build metadata
    pub fn is_plain_release(&self) -> bool {
        self.prerelease.is_none() && self.metadata.is_none()
    }
}

impl std::fmt::Display for VersionTrunks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }

        if let Some(meta) = &self.metadata {
            write!(f, "+{}", meta)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let v = VersionTrunks::parse("1.2.3").unwrap();

        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.is_plain_release());
    }

    #[test]
    fn test_parse_with_v_prefix() {
        let v = VersionTrunks::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_parse_with_prerelease() {
        let v = VersionTrunks::parse("1.2.3-beta.1").unwrap();

        assert_eq!(v.prerelease, Some("beta.1".to_string()));
        assert!(!v.is_plain_release());
    }

    #[test]
    fn test_parse_with_metadata() {
        let v = VersionTrunks::parse("1.2.3+build.7").unwrap();

        assert_eq!(v.metadata, Some("build.7".to_string()));
        assert!(!v.is_plain_release());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(VersionTrunks::parse("not-a-version").is_err());
        assert!(VersionTrunks::parse("1.2").is_err());
    }

    #[test]
    fn test_display() {
        let v = VersionTrunks::new(1, 2, 3)
            .with_prerelease("beta.1")
            .with_metadata("build.7");

        assert_eq!(v.to_string(), "1.2.3-beta.1+build.7");
    }
}
