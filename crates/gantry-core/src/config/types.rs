//! Configuration types

use serde::{Deserialize, Serialize};

/// Main configuration for gantry
///
/// Carries only non-secret values. Passwords and token credentials never
/// appear in the config file; they arrive through CLI flags or environment
/// variables at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package expectations for the pipeline
    pub package: PackageConfig,

    /// Dependency installation configuration
    pub install: InstallConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Registry field defaults for both roles
    pub registry: RegistriesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: PackageConfig::default(),
            install: InstallConfig::default(),
            git: GitConfig::default(),
            registry: RegistriesConfig::default(),
        }
    }
}

/// Package expectations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Expected package name; checked against the manifest when set
    pub name: Option<String>,

    /// Node.js version the pipeline builds and tests with
    pub node_version: Option<String>,
}

/// Dependency installation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Always use `npm install`, even when a lockfile would allow `npm ci`
    pub always_npm_install: bool,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote name
    pub remote: String,

    /// Whether to sign off the version-bump commit
    pub signoff: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            signoff: true,
        }
    }
}

/// Registry field defaults for the publish and install roles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistriesConfig {
    /// Publish-role registry fields
    pub publish: RegistryFields,

    /// Install-role registry fields
    pub install: RegistryFields,
}

/// Non-secret credential fields for one registry role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFields {
    /// Account email
    pub email: Option<String>,

    /// Account username (password comes from the environment)
    pub username: Option<String>,

    /// Registry URL
    pub registry: Option<String>,

    /// Package scope, without the leading `@`
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.git.remote, "origin");
        assert!(config.git.signoff);
        assert!(!config.install.always_npm_install);
        assert!(config.package.name.is_none());
        assert!(config.registry.publish.email.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [registry.install]
            email = "ci@example.com"
            registry = "https://registry.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.registry.install.email.as_deref(),
            Some("ci@example.com")
        );
        assert_eq!(config.git.remote, "origin");
        assert!(config.registry.publish.email.is_none());
    }
}
