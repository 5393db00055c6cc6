//! Configuration validation

use url::Url;

use crate::error::{ConfigError, Result};

use super::types::{Config, RegistryFields};

/// Validate a loaded configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(name) = &config.package.name {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package.name".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
    }

    if let Some(version) = &config.package.node_version {
        if version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package.node_version".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
    }

    validate_registry_fields("registry.publish", &config.registry.publish)?;
    validate_registry_fields("registry.install", &config.registry.install)?;

    Ok(())
}

fn validate_registry_fields(section: &str, fields: &RegistryFields) -> Result<()> {
    if let Some(registry) = &fields.registry {
        if Url::parse(registry).is_err() {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.registry", section),
                message: format!("'{}' is not a valid URL", registry),
            }
            .into());
        }
    }

    if let Some(scope) = &fields.scope {
        if scope.starts_with('@') {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.scope", section),
                message: "scope is written without the leading '@'".to_string(),
            }
            .into());
        }
    }

    Ok(())
}
