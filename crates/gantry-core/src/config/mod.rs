//! Configuration management

mod defaults;
mod loader;
mod types;
mod validation;

pub use defaults::{config_file_names, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
pub use loader::{find_config, load_config, load_config_from_dir, load_config_or_default};
pub use types::{Config, GitConfig, InstallConfig, PackageConfig, RegistriesConfig, RegistryFields};
pub use validation::validate_config;
