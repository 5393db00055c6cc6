//! Exit codes for the CLI

#![allow(dead_code)]

use gantry_core::error::{
    ConfigError, GantryError, GitError, ManifestError, NpmError, RegistryError,
};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Registry resolution error
pub const REGISTRY_ERROR: i32 = 3;

/// Package manifest error
pub const MANIFEST_ERROR: i32 = 4;

/// npm/yarn invocation error
pub const NPM_ERROR: i32 = 5;

/// Git error
pub const GIT_ERROR: i32 = 6;

/// Map an error to its exit code
///
/// Library errors reach the CLI either wrapped in the `GantryError` umbrella
/// or as a bare family; both map to the same code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<GantryError>() {
        return match e {
            GantryError::Config(_) => CONFIG_ERROR,
            GantryError::Registry(_) => REGISTRY_ERROR,
            GantryError::Manifest(_) => MANIFEST_ERROR,
            GantryError::Npm(_) => NPM_ERROR,
            GantryError::Git(_) => GIT_ERROR,
            _ => ERROR,
        };
    }

    if err.downcast_ref::<ConfigError>().is_some() {
        CONFIG_ERROR
    } else if err.downcast_ref::<RegistryError>().is_some() {
        REGISTRY_ERROR
    } else if err.downcast_ref::<ManifestError>().is_some() {
        MANIFEST_ERROR
    } else if err.downcast_ref::<NpmError>().is_some() {
        NPM_ERROR
    } else if err.downcast_ref::<GitError>().is_some() {
        GIT_ERROR
    } else {
        ERROR
    }
}
