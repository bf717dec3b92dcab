//! The capability every DNS backend exposes.

use crate::{DnsRecord, Result};
use async_trait::async_trait;

/// Record management for the zones of one DNS backend.
///
/// Adapters are built once at startup and then shared by every request that
/// routes to them, so implementations must be safe under concurrent use.
/// Record names passed in are fully qualified; returned names may be
/// fully qualified or relative to `zone`, depending on the backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Backend identifier, e.g. `cloudflare`
    fn name(&self) -> &'static str;

    /// List every record in the zone
    async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>>;

    /// Add records to the zone and return what the backend created.
    ///
    /// Depending on the backend this is additive or an upsert.
    async fn append_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>>;

    /// Remove exactly these records and return the ones the backend deleted
    async fn delete_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>>;
}
