//! npm user-config (.npmrc) authentication writer
//!
//! Materializes a resolved registry configuration as npm configuration
//! lines, the same format npm itself reads: an `_authToken` entry for token
//! credentials, or a `username`/`_password`/`email` triplet for basic auth,
//! keyed by the registry URL with its scheme stripped.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{debug, info};

use gantry_core::error::{RegistryError, Result};

use crate::registry::{Credential, ResolvedRegistry};

/// Handle to an npm configuration file
pub struct Npmrc {
    path: PathBuf,
}

impl Npmrc {
    /// Use the npm configuration file at the given path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write authentication for a resolved registry
    ///
    /// Existing lines for the same registry key (and the same scope mapping)
    /// are replaced, so re-running a pipeline step does not accumulate
    /// duplicates. Other lines are preserved.
    pub fn apply(&self, registry: &ResolvedRegistry) -> Result<()> {
        let lines = render(registry)?;
        let key = registry_key(registry.registry.as_deref().unwrap_or_default());

        let mut kept: Vec<String> = Vec::new();
        if self.path.exists() {
            let existing = std::fs::read_to_string(&self.path)?;
            for line in existing.lines() {
                if is_superseded(line, &key, registry.scope.as_deref()) {
                    debug!(line, "replacing npmrc line");
                    continue;
                }
                kept.push(line.to_string());
            }
        }

        kept.extend(lines);
        std::fs::write(&self.path, format!("{}\n", kept.join("\n")))?;

        info!(
            path = %self.path.display(),
            registry = %registry.location(),
            "wrote registry authentication"
        );
        Ok(())
    }
}

/// Render the npm configuration lines for a resolved registry
///
/// Fails with `MissingField("registry")` when no registry URL was resolved;
/// there is nothing to key the auth entries on.
pub fn render(registry: &ResolvedRegistry) -> std::result::Result<Vec<String>, RegistryError> {
    let url = registry
        .registry
        .as_deref()
        .ok_or_else(|| RegistryError::MissingField("registry".to_string()))?;
    let key = registry_key(url);

    let mut lines = Vec::new();

    match &registry.scope {
        Some(scope) => lines.push(format!("@{}:registry={}", scope, url)),
        None => lines.push(format!("registry={}", url)),
    }

    match &registry.credential {
        Credential::Token(token) => {
            lines.push(format!("{}:_authToken={}", key, token));
        }
        Credential::UsernamePassword { username, password } => {
            lines.push(format!("{}:username={}", key, username));
            lines.push(format!("{}:_password={}", key, BASE64.encode(password)));
        }
    }

    lines.push(format!("{}:email={}", key, registry.email));

    Ok(lines)
}

/// Registry URL as an npmrc key: scheme stripped, trailing slash ensured
fn registry_key(url: &str) -> String {
    let stripped = match url.find("//") {
        Some(pos) => &url[pos..],
        None => url,
    };

    if stripped.ends_with('/') {
        stripped.to_string()
    } else {
        format!("{}/", stripped)
    }
}

fn is_superseded(line: &str, key: &str, scope: Option<&str>) -> bool {
    let line = line.trim();

    if line.starts_with(key) {
        return true;
    }

    match scope {
        Some(scope) => line.starts_with(&format!("@{}:registry=", scope)),
        None => line.starts_with("registry="),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryRole;
    use tempfile::TempDir;

    fn token_registry() -> ResolvedRegistry {
        ResolvedRegistry {
            role: RegistryRole::Install,
            email: "ci@example.com".to_string(),
            credential: Credential::Token("secret-token".to_string()),
            registry: Some("https://registry.example.com".to_string()),
            scope: None,
        }
    }

    fn basic_registry() -> ResolvedRegistry {
        ResolvedRegistry {
            role: RegistryRole::Install,
            email: "ci@example.com".to_string(),
            credential: Credential::UsernamePassword {
                username: "robot".to_string(),
                password: "hunter2".to_string(),
            },
            registry: Some("https://registry.example.com".to_string()),
            scope: Some("myorg".to_string()),
        }
    }

    #[test]
    fn test_registry_key() {
        assert_eq!(
            registry_key("https://registry.example.com"),
            "//registry.example.com/"
        );
        assert_eq!(
            registry_key("https://registry.example.com/nested"),
            "//registry.example.com/nested/"
        );
    }

    #[test]
    fn test_render_token() {
        let lines = render(&token_registry()).unwrap();

        assert_eq!(
            lines,
            vec![
                "registry=https://registry.example.com".to_string(),
                "//registry.example.com/:_authToken=secret-token".to_string(),
                "//registry.example.com/:email=ci@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_basic_auth() {
        let lines = render(&basic_registry()).unwrap();

        assert_eq!(lines[0], "@myorg:registry=https://registry.example.com");
        assert_eq!(lines[1], "//registry.example.com/:username=robot");
        // "hunter2" in base64
        assert_eq!(
            lines[2],
            "//registry.example.com/:_password=aHVudGVyMg=="
        );
        assert_eq!(lines[3], "//registry.example.com/:email=ci@example.com");
    }

    #[test]
    fn test_render_without_registry_fails() {
        let mut registry = token_registry();
        registry.registry = None;

        let result = render(&registry);
        assert!(matches!(result, Err(RegistryError::MissingField(_))));
    }

    #[test]
    fn test_apply_creates_file() {
        let temp = TempDir::new().unwrap();
        let npmrc = Npmrc::at(temp.path().join(".npmrc"));

        npmrc.apply(&token_registry()).unwrap();

        let content = std::fs::read_to_string(npmrc.path()).unwrap();
        assert!(content.contains("_authToken=secret-token"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_apply_twice_does_not_duplicate() {
        let temp = TempDir::new().unwrap();
        let npmrc = Npmrc::at(temp.path().join(".npmrc"));

        npmrc.apply(&token_registry()).unwrap();
        npmrc.apply(&token_registry()).unwrap();

        let content = std::fs::read_to_string(npmrc.path()).unwrap();
        assert_eq!(
            content.matches("_authToken=secret-token").count(),
            1,
            "auth lines accumulated: {}",
            content
        );
    }

    #[test]
    fn test_apply_preserves_unrelated_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".npmrc");
        std::fs::write(&path, "save-exact=true\n").unwrap();

        let npmrc = Npmrc::at(&path);
        npmrc.apply(&token_registry()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("save-exact=true"));
        assert!(content.contains("_authToken=secret-token"));
    }
}
