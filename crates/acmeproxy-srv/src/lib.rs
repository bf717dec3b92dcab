//! acmeproxy-srv: DNS-01 challenge proxy.
//!
//! Lets ACME clients publish and remove `_acme-challenge` TXT records without
//! holding DNS vendor credentials. Each caller is granted a list of zones;
//! each zone is served by exactly one DNS backend.
//!
//! # Architecture
//!
//! - [`config`] - the YAML/TOML file: listen address, providers, users
//! - [`authz`] - the [`AuthorizationModel`] built once at startup: every
//!   user's zone rules resolved to one provider instance, plus request routing
//! - [`challenge`] - the [`ChallengeCoordinator`]: idempotent present and
//!   value-exact cleanup against the routed provider
//! - [`server`] - axum transport: `POST /present`, `POST /cleanup` behind
//!   HTTP Basic auth
//!
//! Configuration mistakes are all collected into one [`ConfigErrors`] list and
//! stop the process before it serves anything.

pub mod authz;
pub mod challenge;
pub mod config;
pub mod error;
pub mod server;

// Re-exports for convenience.
pub use authz::{AuthorizationModel, AuthorizedUser, ProviderInstance, ZoneRule};
pub use challenge::ChallengeCoordinator;
pub use config::ProxyConfig;
pub use error::{ChallengeError, ConfigError, ConfigErrors, SrvError};

/// Result type for acmeproxy-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
