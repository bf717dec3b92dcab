//! Backend id → adapter constructor table.

use crate::{AdapterError, ProviderAdapter, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds an adapter from its opaque settings blob
pub type ProviderConstructor =
    Box<dyn Fn(&serde_json::Value) -> Result<Arc<dyn ProviderAdapter>> + Send + Sync>;

/// Table of known backends.
///
/// Filled once during startup, then only read.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: BTreeMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `backend`, replacing any previous one
    pub fn register<F>(&mut self, backend: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn ProviderAdapter>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(backend.into(), Box::new(constructor));
        self
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with<F>(mut self, backend: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn ProviderAdapter>> + Send + Sync + 'static,
    {
        self.register(backend, constructor);
        self
    }

    /// Returns true if `backend` has a constructor
    #[must_use]
    pub fn contains(&self, backend: &str) -> bool {
        self.constructors.contains_key(backend)
    }

    /// Registered backend ids in sorted order
    pub fn backends(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Construct an adapter for `backend` from `settings`
    pub fn build(
        &self,
        backend: &str,
        settings: &serde_json::Value,
    ) -> Result<Arc<dyn ProviderAdapter>> {
        let constructor = self
            .constructors
            .get(backend)
            .ok_or_else(|| AdapterError::UnknownBackend(backend.to_string()))?;
        constructor(settings)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("backends", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DnsRecord;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl ProviderAdapter for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn get_records(&self, _zone: &str) -> Result<Vec<DnsRecord>> {
            Ok(Vec::new())
        }

        async fn append_records(&self, _zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
            Ok(records.to_vec())
        }

        async fn delete_records(&self, _zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
            Ok(records.to_vec())
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new().with("noop", |settings| {
            if settings.get("fail").is_some() {
                return Err(AdapterError::settings("fail requested"));
            }
            Ok(Arc::new(Noop) as Arc<dyn ProviderAdapter>)
        })
    }

    #[test]
    fn test_build_known_backend() {
        let adapter = registry().build("noop", &serde_json::json!({})).unwrap();
        assert_eq!(adapter.name(), "noop");
    }

    #[test]
    fn test_unknown_backend() {
        let err = registry().build("route53", &serde_json::Value::Null).err().unwrap();
        assert!(matches!(err, AdapterError::UnknownBackend(ref b) if b == "route53"));
    }

    #[test]
    fn test_constructor_error_is_returned() {
        let err = registry()
            .build("noop", &serde_json::json!({"fail": true}))
            .err()
            .unwrap();
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_backends_sorted() {
        let registry = registry().with("alpha", |_| Ok(Arc::new(Noop) as Arc<dyn ProviderAdapter>));
        assert_eq!(registry.backends().collect::<Vec<_>>(), vec!["alpha", "noop"]);
        assert!(registry.contains("alpha"));
    }

    #[tokio::test]
    async fn test_built_adapter_is_usable() {
        let adapter = registry().build("noop", &serde_json::json!({})).unwrap();
        let added = adapter
            .append_records("example.com", &[DnsRecord::txt("a.example.com", "v")])
            .await
            .unwrap();
        assert_eq!(added.len(), 1);
    }
}
