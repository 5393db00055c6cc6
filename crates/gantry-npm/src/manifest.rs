//! npm package.json handling

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gantry_core::error::{ManifestError, Result};

use crate::version::VersionTrunks;

/// package.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<HashMap<String, String>>,

    /// Dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<HashMap<String, String>>,

    /// Dev dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<HashMap<String, String>>,

    /// Whether package is private
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    /// Publish configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_config: Option<PublishConfig>,

    /// Preserve other fields
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

/// publishConfig block of package.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConfig {
    /// Registry the package publishes to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Access level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    /// Preserve other fields
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl PackageJson {
    /// Load package.json from path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ManifestError::NotFound(path.to_path_buf()))?;

        serde_json::from_str(&content)
            .map_err(|e| ManifestError::ParseError(e.to_string()).into())
    }

    /// Save package.json to path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::UpdateError(e.to_string()))?;

        // Ensure trailing newline
        let content = if content.ends_with('\n') {
            content
        } else {
            format!("{}\n", content)
        };

        std::fs::write(path, content)
            .map_err(|e| ManifestError::UpdateError(e.to_string()).into())
    }

    /// Scope of a `@scope/name` package name, without the `@`
    pub fn scope(&self) -> Option<&str> {
        let rest = self.name.strip_prefix('@')?;
        rest.split_once('/').map(|(scope, _)| scope)
    }

    /// Registry declared under publishConfig, if any
    pub fn declared_registry(&self) -> Option<&str> {
        self.publish_config
            .as_ref()
            .and_then(|pc| pc.registry.as_deref())
    }

    /// Take a read-only snapshot of the manifest
    pub fn info(&self, manifest_path: impl Into<PathBuf>) -> Result<PackageInfo> {
        let trunks = VersionTrunks::parse(&self.version)?;

        Ok(PackageInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            trunks,
            registry: self.declared_registry().map(str::to_owned),
            scope: self.scope().map(str::to_owned),
            manifest_path: manifest_path.into(),
            private: self.private.unwrap_or(false),
        })
    }
}

/// Read-only snapshot of a package manifest
///
/// Loaded once per pipeline run and handed to the registry resolver; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package name
    pub name: String,
    /// Current version string
    pub version: String,
    /// Decomposed version components
    pub trunks: VersionTrunks,
    /// Registry declared in the manifest, if any
    pub registry: Option<String>,
    /// Scope taken from a `@scope/name` package name
    pub scope: Option<String>,
    /// Path to the manifest
    pub manifest_path: PathBuf,
    /// Whether this is a private package
    pub private: bool,
}

/// Load a manifest and snapshot it in one step
pub fn read_package_info(dir: &Path) -> Result<PackageInfo> {
    let manifest_path = dir.join("package.json");
    let manifest = PackageJson::load(&manifest_path)?;
    manifest.info(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(&path, r#"{"name": "test", "version": "1.0.0"}"#).unwrap();

        let pkg = PackageJson::load(&path).unwrap();
        assert_eq!(pkg.name, "test");
        assert_eq!(pkg.version, "1.0.0");
        assert!(pkg.publish_config.is_none());
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let result = PackageJson::load(&temp.path().join("package.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(PackageJson::load(&path).is_err());
    }

    #[test]
    fn test_scope() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(
            &path,
            r#"{"name": "@myorg/explorer-cli", "version": "1.0.0"}"#,
        )
        .unwrap();

        let pkg = PackageJson::load(&path).unwrap();
        assert_eq!(pkg.scope(), Some("myorg"));
    }

    #[test]
    fn test_scope_unscoped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(&path, r#"{"name": "explorer-cli", "version": "1.0.0"}"#).unwrap();

        let pkg = PackageJson::load(&path).unwrap();
        assert_eq!(pkg.scope(), None);
    }

    #[test]
    fn test_publish_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(
            &path,
            r#"{
                "name": "@myorg/explorer-cli",
                "version": "1.2.3",
                "publishConfig": {
                    "registry": "https://registry.example.com",
                    "access": "public"
                }
            }"#,
        )
        .unwrap();

        let pkg = PackageJson::load(&path).unwrap();
        assert_eq!(
            pkg.declared_registry(),
            Some("https://registry.example.com")
        );
    }

    #[test]
    fn test_info_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(
            &path,
            r#"{
                "name": "@myorg/explorer-cli",
                "version": "1.2.3",
                "publishConfig": {"registry": "https://registry.example.com"}
            }"#,
        )
        .unwrap();

        let info = read_package_info(temp.path()).unwrap();
        assert_eq!(info.name, "@myorg/explorer-cli");
        assert_eq!(info.scope.as_deref(), Some("myorg"));
        assert_eq!(
            info.registry.as_deref(),
            Some("https://registry.example.com")
        );
        assert_eq!(info.trunks, VersionTrunks::new(1, 2, 3));
        assert!(!info.private);
    }

    #[test]
    fn test_save() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(&path, r#"{"name": "test", "version": "1.0.0"}"#).unwrap();

        let mut pkg = PackageJson::load(&path).unwrap();
        pkg.version = "2.0.0".to_string();
        pkg.save(&path).unwrap();

        let loaded = PackageJson::load(&path).unwrap();
        assert_eq!(loaded.version, "2.0.0");
    }

    #[test]
    fn test_preserves_extra_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");

        std::fs::write(
            &path,
            r#"{"name": "test", "version": "1.0.0", "customField": "value"}"#,
        )
        .unwrap();

        let mut pkg = PackageJson::load(&path).unwrap();
        assert!(pkg.other.contains_key("customField"));

        pkg.version = "2.0.0".to_string();
        pkg.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("customField"));
    }
}
