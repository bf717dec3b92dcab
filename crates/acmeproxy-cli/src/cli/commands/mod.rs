//! Command implementations.

pub mod challenge;
pub mod check;
pub mod providers;
pub mod serve;

use acmeproxy_providers::builtin_registry;
use acmeproxy_srv::{AuthorizationModel, ConfigErrors, ProxyConfig};
use colored::Colorize;
use std::path::Path;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format
    pub output_format: OutputFormat,
}

/// Load the config file and resolve it against the built-in backends.
///
/// Every configuration error is printed before failing.
pub fn load_model(path: &Path) -> anyhow::Result<(ProxyConfig, AuthorizationModel)> {
    let config = ProxyConfig::load(path)?;
    match config.build_model(&builtin_registry()) {
        Ok(model) => Ok((config, model)),
        Err(errors) => {
            print_config_errors(&errors);
            anyhow::bail!("{} is invalid ({} error(s))", path.display(), errors.len())
        }
    }
}

fn print_config_errors(errors: &ConfigErrors) {
    eprintln!("{}", "Configuration errors:".red().bold());
    for error in errors {
        eprintln!("  {} {error}", "-".red());
    }
}
