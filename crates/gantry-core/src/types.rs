//! Core types for gantry

use serde::{Deserialize, Serialize};

/// Version bump level passed to `npm version`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    #[default]
    Patch,
}

impl BumpLevel {
    /// Returns the string representation of the bump level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BumpLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown bump level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bump_level_from_str() {
        assert_eq!(BumpLevel::from_str("major").unwrap(), BumpLevel::Major);
        assert_eq!(BumpLevel::from_str("PATCH").unwrap(), BumpLevel::Patch);
        assert!(BumpLevel::from_str("prerelease").is_err());
    }

    #[test]
    fn test_bump_level_default() {
        assert_eq!(BumpLevel::default(), BumpLevel::Patch);
    }

    #[test]
    fn test_bump_level_display() {
        assert_eq!(BumpLevel::Minor.to_string(), "minor");
    }
}
