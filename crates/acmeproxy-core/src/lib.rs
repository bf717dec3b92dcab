//! Core types and traits for acmeproxy.
//!
//! This crate provides the pieces every other acmeproxy crate agrees on:
//!
//! - **Types**: DNS records, challenge requests and the raw config specs
//! - **Providers**: the [`ProviderAdapter`] capability and the [`ProviderRegistry`]
//!   that builds adapters from opaque settings
//! - **Zones**: suffix matching and name normalization helpers
//! - **Errors**: [`AdapterError`] for everything a backend can report
//!
//! # Example
//!
//! ```rust,ignore
//! use acmeproxy_core::{DnsRecord, ProviderRegistry};
//!
//! let registry = ProviderRegistry::new();
//! let adapter = registry.build("memory", &serde_json::json!({}))?;
//! adapter.append_records("example.com", &[DnsRecord::txt("_acme-challenge.example.com", "token")]).await?;
//! ```

#![doc(html_root_url = "https://docs.rs/acmeproxy-core/0.1.0")]

mod error;
mod provider;
mod registry;
pub mod types;
pub mod zone;

pub use error::{AdapterError, Result};
pub use provider::ProviderAdapter;
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use types::*;
