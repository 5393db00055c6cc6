//! Setup command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use gantry_core::config::{load_config_or_default, Config};
use gantry_core::error::ConfigError;
use gantry_npm::install::{install_dependencies, Installer};
use gantry_npm::manifest::read_package_info;
use gantry_npm::registry::{resolve, CredentialSet, RegistryRole, ResolvedRegistry};
use gantry_npm::Npmrc;

use crate::cli::{output, Cli, OutputFormat};

/// Bootstrap the build environment before a build/test stage
#[derive(Debug, Args)]
pub struct SetupCommand {
    /// Checked-out project workspace
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Node.js version the pipeline builds and tests with
    #[arg(long, env = "GANTRY_NODE_VERSION")]
    pub node_version: Option<String>,

    /// Force `npm install` even when a package-lock.json is present
    #[arg(long, env = "GANTRY_ALWAYS_NPM_INSTALL")]
    pub always_npm_install: bool,

    /// Resolve and authenticate only; skip dependency installation
    #[arg(long)]
    pub skip_install: bool,

    /// Publish registry account email
    #[arg(long, env = "GANTRY_PUBLISH_EMAIL")]
    pub publish_email: Option<String>,

    /// Publish registry username
    #[arg(long, env = "GANTRY_PUBLISH_USERNAME")]
    pub publish_username: Option<String>,

    /// Publish registry password
    #[arg(long, env = "GANTRY_PUBLISH_PASSWORD", hide_env_values = true)]
    pub publish_password: Option<String>,

    /// Publish registry token credential
    #[arg(long, env = "GANTRY_PUBLISH_TOKEN", hide_env_values = true)]
    pub publish_token: Option<String>,

    /// Publish registry URL
    #[arg(long, env = "GANTRY_PUBLISH_REGISTRY")]
    pub publish_registry: Option<String>,

    /// Publish registry scope, without the leading `@`
    #[arg(long, env = "GANTRY_PUBLISH_SCOPE")]
    pub publish_scope: Option<String>,

    /// Install registry account email
    #[arg(long, env = "GANTRY_INSTALL_EMAIL")]
    pub install_email: Option<String>,

    /// Install registry username
    #[arg(long, env = "GANTRY_INSTALL_USERNAME")]
    pub install_username: Option<String>,

    /// Install registry password
    #[arg(long, env = "GANTRY_INSTALL_PASSWORD", hide_env_values = true)]
    pub install_password: Option<String>,

    /// Install registry token credential
    #[arg(long, env = "GANTRY_INSTALL_TOKEN", hide_env_values = true)]
    pub install_token: Option<String>,

    /// Install registry URL
    #[arg(long, env = "GANTRY_INSTALL_REGISTRY")]
    pub install_registry: Option<String>,

    /// Install registry scope, without the leading `@`
    #[arg(long, env = "GANTRY_INSTALL_SCOPE")]
    pub install_scope: Option<String>,
}

impl SetupCommand {
    /// Execute the setup command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(skip_install = self.skip_install, "executing setup command");
        let workspace = match &self.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let (config, _) = load_config_or_default(&workspace);

        let pkg = read_package_info(&workspace)?;
        if let Some(expected) = &config.package.name {
            if expected != &pkg.name {
                return Err(ConfigError::InvalidValue {
                    field: "package.name".to_string(),
                    message: format!("manifest declares '{}', expected '{}'", pkg.name, expected),
                }
                .into());
            }
        }
        info!(package = %pkg.name, version = %pkg.version, "package information");

        let publish_fields = CredentialSet::from_config(&config.registry.publish)
            .overridden_by(&self.publish_overrides());
        let publish = resolve(RegistryRole::Publish, &publish_fields, Some(&pkg))?;

        let install_fields = CredentialSet::from_config(&config.registry.install)
            .overridden_by(&self.install_overrides());
        let install = resolve(RegistryRole::Install, &install_fields, None)?;

        if publish.registry.is_none() {
            warn!("publish registry is undefined");
            if !cli.quiet {
                output::warning("publish registry is undefined; npm defaults will apply");
            }
        }

        // Login: materialize install-registry auth for the project
        if install.registry.is_some() {
            Npmrc::at(workspace.join(".npmrc")).apply(&install)?;
        } else {
            warn!("install registry is undefined, skipping login");
            if !cli.quiet {
                output::warning("install registry is undefined; skipping registry login");
            }
        }

        let installer = if self.skip_install {
            None
        } else {
            let always = self.always_npm_install || config.install.always_npm_install;
            Some(install_dependencies(&workspace, always)?)
        };

        self.output_result(&config, &pkg.name, &pkg.version, &publish, &install, installer, cli)
    }

    fn publish_overrides(&self) -> CredentialSet {
        CredentialSet {
            email: self.publish_email.clone(),
            username: self.publish_username.clone(),
            password: self.publish_password.clone(),
            token: self.publish_token.clone(),
            registry: self.publish_registry.clone(),
            scope: self.publish_scope.clone(),
        }
    }

    fn install_overrides(&self) -> CredentialSet {
        CredentialSet {
            email: self.install_email.clone(),
            username: self.install_username.clone(),
            password: self.install_password.clone(),
            token: self.install_token.clone(),
            registry: self.install_registry.clone(),
            scope: self.install_scope.clone(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn output_result(
        &self,
        config: &Config,
        package: &str,
        version: &str,
        publish: &ResolvedRegistry,
        install: &ResolvedRegistry,
        installer: Option<Installer>,
        cli: &Cli,
    ) -> anyhow::Result<()> {
        let node_version = self
            .node_version
            .as_deref()
            .or(config.package.node_version.as_deref());

        match cli.format {
            OutputFormat::Json => {
                // Credentials stay out of the report; only their method is named
                let output = serde_json::json!({
                    "package": package,
                    "version": version,
                    "node_version": node_version,
                    "publish_registry": registry_summary(publish),
                    "install_registry": registry_summary(install),
                    "installer": installer,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Environment Setup"));
                    println!();
                    println!(
                        "  Package:          {} v{}",
                        style(package).cyan(),
                        version
                    );
                    if let Some(node) = node_version {
                        println!("  Node.js:          {}", node);
                    }
                    println!("  Publish registry: {}", publish.location());
                    println!("  Install registry: {}", install.location());
                    if let Some(installer) = installer {
                        println!("  Installed with:   {}", style(installer).green());
                    }
                }
                output::success("environment ready");
            }
        }
        Ok(())
    }
}

fn registry_summary(registry: &ResolvedRegistry) -> serde_json::Value {
    serde_json::json!({
        "registry": registry.registry,
        "scope": registry.scope,
        "auth": registry.auth_method(),
    })
}
