//! DNS backend adapters and the challenge client for acmeproxy.
//!
//! - [`builtin_registry`] returns a [`ProviderRegistry`] with every adapter in
//!   this crate registered under its backend id
//! - [`AcmeProxyClient`] calls `/present` and `/cleanup` on a running proxy

#![doc(html_root_url = "https://docs.rs/acmeproxy-providers/0.1.0")]

mod client;
mod config;
pub mod cloudflare;
pub mod memory;

use std::sync::Arc;

pub use acmeproxy_core::{AdapterError, ProviderAdapter, ProviderRegistry, Result};
pub use client::{AcmeProxyClient, AcmeProxyClientBuilder, ChallengeResponse, ClientError};
pub use cloudflare::CloudflareProvider;
pub use config::*;
pub use memory::MemoryProvider;

/// Registry with every adapter shipped in this crate
#[must_use]
pub fn builtin_registry() -> ProviderRegistry {
    ProviderRegistry::new()
        .with(memory::BACKEND, |settings| {
            Ok(Arc::new(MemoryProvider::from_settings(settings)?) as Arc<dyn ProviderAdapter>)
        })
        .with(cloudflare::BACKEND, |settings| {
            Ok(Arc::new(CloudflareProvider::from_settings(settings)?) as Arc<dyn ProviderAdapter>)
        })
}
