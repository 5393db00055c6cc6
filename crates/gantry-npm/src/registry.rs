//! Registry configuration resolution
//!
//! Turns raw, optionally-absent credential fields into a validated,
//! fully-resolved registry configuration, or fails with a precise reason.
//! Pure validation and derivation; no I/O happens here.

use serde::{Deserialize, Serialize};
use tracing::warn;

use gantry_core::config::RegistryFields;
use gantry_core::error::RegistryError;

use crate::manifest::PackageInfo;

/// Result type for registry resolution
pub type Result<T> = std::result::Result<T, RegistryError>;

/// The two registry configurations a pipeline needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryRole {
    /// Registry the built package publishes to
    Publish,
    /// Registry dependencies install from
    Install,
}

impl RegistryRole {
    /// Returns the string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Install => "install",
        }
    }
}

impl std::fmt::Display for RegistryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved authentication method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credential {
    /// Opaque token credential
    Token(String),
    /// Username and password
    UsernamePassword { username: String, password: String },
}

impl Credential {
    /// Get the credential as a token string (if applicable)
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(t) => Some(t),
            _ => None,
        }
    }

    /// Get username (if applicable)
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::UsernamePassword { username, .. } => Some(username),
            _ => None,
        }
    }

    /// Get password (if applicable)
    pub fn password(&self) -> Option<&str> {
        match self {
            Self::UsernamePassword { password, .. } => Some(password),
            _ => None,
        }
    }
}

/// Raw credential fields for one registry role
///
/// All fields are optional at this level; `resolve` decides which
/// combinations are sufficient. Empty strings count as absent, since CI
/// configurations routinely pass empty strings for unset inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialSet {
    /// Account email
    pub email: Option<String>,
    /// Account username
    pub username: Option<String>,
    /// Account password
    pub password: Option<String>,
    /// Token credential, preferred over username/password
    pub token: Option<String>,
    /// Registry URL
    pub registry: Option<String>,
    /// Package scope, without the leading `@`
    pub scope: Option<String>,
}

impl CredentialSet {
    /// Create an empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from non-secret config-file fields
    pub fn from_config(fields: &RegistryFields) -> Self {
        Self {
            email: fields.email.clone(),
            username: fields.username.clone(),
            password: None,
            token: None,
            registry: fields.registry.clone(),
            scope: fields.scope.clone(),
        }
    }

    /// Set email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set token credential
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set registry URL
    pub fn registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Set scope
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Overlay explicitly-provided fields on top of this set
    pub fn overridden_by(mut self, other: &CredentialSet) -> Self {
        if non_empty(&other.email).is_some() {
            self.email = other.email.clone();
        }
        if non_empty(&other.username).is_some() {
            self.username = other.username.clone();
        }
        if non_empty(&other.password).is_some() {
            self.password = other.password.clone();
        }
        if non_empty(&other.token).is_some() {
            self.token = other.token.clone();
        }
        if non_empty(&other.registry).is_some() {
            self.registry = other.registry.clone();
        }
        if non_empty(&other.scope).is_some() {
            self.scope = other.scope.clone();
        }
        self
    }
}

/// Fully-resolved registry configuration
///
/// Immutable once produced; handed onward to the login and install/publish
/// steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRegistry {
    /// Which role this configuration serves
    pub role: RegistryRole,
    /// Account email
    pub email: String,
    /// Resolved authentication method
    pub credential: Credential,
    /// Registry URL; absent is a caller-level warning, not an error
    pub registry: Option<String>,
    /// Package scope, without the leading `@`
    pub scope: Option<String>,
}

impl ResolvedRegistry {
    /// Name of the resolved authentication method
    pub fn auth_method(&self) -> &'static str {
        match self.credential {
            Credential::Token(_) => "token",
            Credential::UsernamePassword { .. } => "basic",
        }
    }

    /// Human-readable `@scope:registry` location string
    pub fn location(&self) -> String {
        let registry = self
            .registry
            .as_deref()
            .unwrap_or("(undefined registry)");
        match &self.scope {
            Some(scope) => format!("@{}:{}", scope, registry),
            None => registry.to_string(),
        }
    }
}

/// Resolve raw credential fields into a registry configuration
///
/// Validation order: email, authentication method, manifest version
/// invariant, registry/scope derivation. The first violated constraint wins.
///
/// A token takes priority over a username/password pair even when both are
/// supplied; the ignored pair is reported through a tracing warning.
///
/// Only the publish role derives absent registry/scope values from the
/// manifest. An absent registry is never fatal here; callers are expected to
/// warn.
pub fn resolve(
    role: RegistryRole,
    fields: &CredentialSet,
    manifest: Option<&PackageInfo>,
) -> Result<ResolvedRegistry> {
    let email = non_empty(&fields.email)
        .ok_or_else(|| RegistryError::MissingField("email".to_string()))?;

    let credential = resolve_credential(fields)?;

    if let Some(info) = manifest {
        if !info.trunks.is_plain_release() {
            return Err(RegistryError::InvalidVersion(format!(
                "version '{}' carries a pre-release or build-metadata component; \
                 the pipeline adjusts those based on branch and build parameters",
                info.version
            )));
        }
    }

    let registry = non_empty(&fields.registry)
        .map(str::to_owned)
        .or_else(|| match role {
            RegistryRole::Publish => manifest.and_then(|m| m.registry.clone()),
            RegistryRole::Install => None,
        });

    let scope = non_empty(&fields.scope)
        .map(str::to_owned)
        .or_else(|| match role {
            RegistryRole::Publish => manifest.and_then(|m| m.scope.clone()),
            RegistryRole::Install => None,
        });

    Ok(ResolvedRegistry {
        role,
        email: email.to_string(),
        credential,
        registry,
        scope,
    })
}

fn resolve_credential(fields: &CredentialSet) -> Result<Credential> {
    let username = non_empty(&fields.username);
    let password = non_empty(&fields.password);

    if let Some(token) = non_empty(&fields.token) {
        if username.is_some() || password.is_some() {
            warn!("both a token and a username/password pair are supplied; using the token");
        }
        return Ok(Credential::Token(token.to_string()));
    }

    match (username, password) {
        (Some(username), Some(password)) => Ok(Credential::UsernamePassword {
            username: username.to_string(),
            password: password.to_string(),
        }),
        (Some(_), None) => Err(RegistryError::MissingField("password".to_string())),
        (None, Some(_)) => Err(RegistryError::MissingField("username".to_string())),
        (None, None) => Err(RegistryError::MissingCredentials(
            "token or username/password pair".to_string(),
        )),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
