//! In-process DNS backend.
//!
//! Keeps records in memory for the life of the process. Useful for dry runs
//! and for exercising the proxy without vendor credentials.
//!
//! Settings (all optional):
//!
//! ```yaml
//! config:
//!   relative_names: true   # store names relative to the zone, like Cloudflare's UI
//! ```

use acmeproxy_core::{zone, DnsRecord, ProviderAdapter, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Backend id
pub const BACKEND: &str = "memory";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemorySettings {
    #[serde(default)]
    relative_names: bool,
}

/// Records held in memory, keyed by zone
#[derive(Debug, Default)]
pub struct MemoryProvider {
    zones: RwLock<HashMap<String, Vec<DnsRecord>>>,
    next_id: AtomicU64,
    relative_names: bool,
}

impl MemoryProvider {
    /// Empty store that keeps names fully qualified
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store names relative to their zone
    #[must_use]
    pub const fn with_relative_names(mut self) -> Self {
        self.relative_names = true;
        self
    }

    /// Build from a config settings blob; `null` means defaults
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self> {
        let settings: MemorySettings = if settings.is_null() {
            MemorySettings::default()
        } else {
            serde_json::from_value(settings.clone())
                .map_err(|e| acmeproxy_core::AdapterError::settings(e.to_string()))?
        };
        Ok(Self {
            relative_names: settings.relative_names,
            ..Self::default()
        })
    }

    fn stored_name(&self, name: &str, zone_name: &str) -> String {
        if !self.relative_names {
            return name.to_string();
        }
        // Second candidate is the relative form (or "@" for the apex).
        zone::name_candidates(name, zone_name)
            .into_iter()
            .nth(1)
            .unwrap_or_else(|| name.to_string())
    }
}

#[async_trait]
impl ProviderAdapter for MemoryProvider {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let zones = self.zones.read().await;
        Ok(zones.get(zone).cloned().unwrap_or_default())
    }

    async fn append_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let mut zones = self.zones.write().await;
        let stored = zones.entry(zone.to_string()).or_default();

        let mut added = Vec::with_capacity(records.len());
        for record in records {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            let record = DnsRecord {
                id: Some(id.to_string()),
                name: self.stored_name(&record.name, zone),
                ..record.clone()
            };
            debug!(zone, name = %record.name, id, "memory: appended record");
            stored.push(record.clone());
            added.push(record);
        }
        Ok(added)
    }

    async fn delete_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let mut zones = self.zones.write().await;
        let Some(stored) = zones.get_mut(zone) else {
            return Ok(Vec::new());
        };

        let mut deleted = Vec::new();
        for record in records {
            let position = match &record.id {
                Some(id) => stored.iter().position(|r| r.id.as_ref() == Some(id)),
                None => stored.iter().position(|r| r.same_content(record)),
            };
            if let Some(index) = position {
                let removed = stored.remove(index);
                debug!(zone, name = %removed.name, "memory: deleted record");
                deleted.push(removed);
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_is_additive() {
        let provider = MemoryProvider::new();
        let record = DnsRecord::txt("_acme-challenge.example.com", "v1");
        provider.append_records("example.com", &[record.clone()]).await.unwrap();
        provider.append_records("example.com", &[record]).await.unwrap();

        let records = provider.get_records("example.com").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn test_relative_names() {
        let provider = MemoryProvider::new().with_relative_names();
        let added = provider
            .append_records(
                "example.com",
                &[DnsRecord::txt("_acme-challenge.foo.example.com", "v")],
            )
            .await
            .unwrap();
        assert_eq!(added[0].name, "_acme-challenge.foo");
    }

    #[tokio::test]
    async fn test_delete_by_id_leaves_siblings() {
        let provider = MemoryProvider::new();
        let added = provider
            .append_records(
                "example.com",
                &[
                    DnsRecord::txt("_acme-challenge.example.com", "v1"),
                    DnsRecord::txt("_acme-challenge.example.com", "v2"),
                ],
            )
            .await
            .unwrap();

        let deleted = provider
            .delete_records("example.com", &added[1..])
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].value, "v2");

        let left = provider.get_records("example.com").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].value, "v1");
    }

    #[tokio::test]
    async fn test_delete_in_unknown_zone() {
        let provider = MemoryProvider::new();
        let deleted = provider
            .delete_records("nowhere.com", &[DnsRecord::txt("a.nowhere.com", "v")])
            .await
            .unwrap();
        assert!(deleted.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let provider = MemoryProvider::from_settings(&serde_json::json!({"relative_names": true})).unwrap();
        assert!(provider.relative_names);
        tokio_test::assert_ok!(MemoryProvider::from_settings(&serde_json::Value::Null));
        let err = tokio_test::assert_err!(MemoryProvider::from_settings(&serde_json::json!({"bogus": 1})));
        assert!(err.is_construction_error());
    }
}
