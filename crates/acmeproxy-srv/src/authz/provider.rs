//! A live backend bound to one zone.

use acmeproxy_core::{DnsRecord, ProviderAdapter, ProviderSpec};
use std::fmt;
use std::sync::Arc;

use crate::error::ChallengeError;

/// Adapter plus the zone it manages.
///
/// Built once per distinct provider zone and shared by every rule and
/// request that routes to it.
pub struct ProviderInstance {
    zone: String,
    backend: String,
    settings: serde_json::Value,
    adapter: Arc<dyn ProviderAdapter>,
}

impl ProviderInstance {
    /// Bind `adapter` to `zone`; `spec` is kept to detect conflicting duplicates.
    pub fn new(zone: impl Into<String>, spec: &ProviderSpec, adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            zone: zone.into(),
            backend: spec.provider.clone(),
            settings: spec.config.clone(),
            adapter,
        }
    }

    /// Normalized zone (no trailing dot)
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Backend id from the config
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Returns true if `spec` would build the same instance
    pub fn same_backend(&self, spec: &ProviderSpec) -> bool {
        self.backend == spec.provider && self.settings == spec.config
    }

    /// All records in this zone
    pub async fn get_records(&self) -> Result<Vec<DnsRecord>, ChallengeError> {
        self.adapter
            .get_records(&self.zone)
            .await
            .map_err(|source| self.adapter_error("get records", source))
    }

    /// Append records to this zone
    pub async fn append_records(&self, records: &[DnsRecord]) -> Result<Vec<DnsRecord>, ChallengeError> {
        self.adapter
            .append_records(&self.zone, records)
            .await
            .map_err(|source| self.adapter_error("append records", source))
    }

    /// Delete records from this zone
    pub async fn delete_records(&self, records: &[DnsRecord]) -> Result<Vec<DnsRecord>, ChallengeError> {
        self.adapter
            .delete_records(&self.zone, records)
            .await
            .map_err(|source| self.adapter_error("delete records", source))
    }

    fn adapter_error(&self, action: &'static str, source: acmeproxy_core::AdapterError) -> ChallengeError {
        ChallengeError::Adapter {
            action,
            provider: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for ProviderInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.backend, self.zone)
    }
}

impl fmt::Debug for ProviderInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Settings hold credentials; keep them out of logs.
        f.debug_struct("ProviderInstance")
            .field("zone", &self.zone)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
