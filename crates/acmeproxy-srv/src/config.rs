//! Proxy configuration file.
//!
//! YAML by default; a `.toml` extension selects TOML.
//!
//! ```yaml
//! server: 127.0.0.1:8088
//! providers:
//!   - zone: example.com
//!     provider: cloudflare
//!     config:
//!       api_token: your_token_here
//! users:
//!   - name: example
//!     token: abc123
//!     allowedZones:
//!       - foo.example.com
//! ```

use acmeproxy_core::{ProviderRegistry, ProviderSpec, UserSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::authz::AuthorizationModel;
use crate::error::{ConfigErrors, SrvError};

/// Path used when neither `--config` nor `CONFIG_PATH` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Format of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `.toml` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listen address (default: 127.0.0.1:8088). A bare `:port` listens on
    /// all interfaces.
    #[serde(default = "default_server")]
    pub server: String,

    /// One backend per zone.
    #[serde(default)]
    pub providers: Vec<ProviderSpec>,

    /// Callers and their allowed zones.
    #[serde(default)]
    pub users: Vec<UserSpec>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            providers: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SrvError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|message| {
            SrvError::ConfigFile {
                path: path.to_path_buf(),
                message,
            }
        })
    }

    /// Parse config text in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        if self.server.starts_with(':') {
            format!("0.0.0.0{}", self.server)
        } else {
            self.server.clone()
        }
    }

    /// Resolve providers and users into an authorization model.
    pub fn build_model(&self, registry: &ProviderRegistry) -> Result<AuthorizationModel, ConfigErrors> {
        AuthorizationModel::build(&self.providers, &self.users, registry)
    }
}

fn default_server() -> String {
    String::from("127.0.0.1:8088")
}
