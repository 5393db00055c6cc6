//! Gantry npm - Package manifest handling, registry resolution, and npm
//! invocation
//!
//! This crate owns everything npm-shaped in the pipeline: reading
//! package.json, resolving registry credentials for the publish and install
//! roles, writing npm authentication, installing dependencies, and running
//! `npm version`.

pub mod bump;
pub mod install;
pub mod manifest;
pub mod npmrc;
pub mod registry;
pub mod version;

pub use bump::bump_package;
pub use install::{install_dependencies, select_installer, Installer};
pub use manifest::{read_package_info, PackageInfo, PackageJson};
pub use npmrc::Npmrc;
pub use registry::{resolve, Credential, CredentialSet, RegistryRole, ResolvedRegistry};
pub use version::VersionTrunks;
