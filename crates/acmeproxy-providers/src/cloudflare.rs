//! Cloudflare DNS backend (API v4).
//!
//! Settings:
//!
//! ```yaml
//! config:
//!   api_token: "..."          # required, needs Zone:DNS:Edit
//!   zone_id: "023e105f..."    # optional, looked up by zone name otherwise
//!   ttl: 120                  # optional, 1 means "automatic"
//! ```
//!
//! Cloudflare reports fully qualified record names.

use crate::config::{user_agent, RateLimitConfig, DEFAULT_TIMEOUT};
use acmeproxy_core::{AdapterError, DnsRecord, ProviderAdapter, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, RateLimiter};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Backend id
pub const BACKEND: &str = "cloudflare";

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_TTL: u32 = 120;
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CloudflareSettings {
    api_token: String,
    #[serde(default)]
    zone_id: Option<String>,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    requests_per_second: Option<u32>,
}

/// Cloudflare adapter
pub struct CloudflareProvider {
    inner: Arc<CloudflareInner>,
}

struct CloudflareInner {
    http: Client,
    api_token: String,
    base_url: String,
    ttl: u32,
    /// Zone name → zone id, filled on first lookup
    zone_ids: RwLock<HashMap<String, String>>,
    /// Zone id from settings, used instead of a lookup
    fixed_zone_id: Option<String>,
    rate_limiter: DefaultDirectRateLimiter,
}

impl CloudflareProvider {
    /// Create an adapter with an API token and default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_options(
            api_token.into(),
            DEFAULT_BASE_URL.to_string(),
            None,
            DEFAULT_TTL,
            RateLimitConfig::default(),
        )
    }

    /// Build from a config settings blob
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self> {
        let settings: CloudflareSettings = serde_json::from_value(settings.clone())
            .map_err(|e| AdapterError::settings(format!("cloudflare: {e}")))?;

        if settings.api_token.is_empty() {
            return Err(AdapterError::settings("cloudflare: api_token is empty"));
        }

        let mut rate_limit = RateLimitConfig::default();
        if let Some(rps) = settings.requests_per_second {
            rate_limit = rate_limit.requests_per_second(rps);
        }

        Self::with_options(
            settings.api_token,
            settings
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            settings.zone_id,
            settings.ttl.unwrap_or(DEFAULT_TTL),
            rate_limit,
        )
    }

    fn with_options(
        api_token: String,
        base_url: String,
        zone_id: Option<String>,
        ttl: u32,
        rate_limit: RateLimitConfig,
    ) -> Result<Self> {
        url::Url::parse(&base_url)
            .map_err(|e| AdapterError::settings(format!("cloudflare: invalid base_url: {e}")))?;

        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| AdapterError::settings(format!("cloudflare: {e}")))?;

        Ok(Self {
            inner: Arc::new(CloudflareInner {
                http,
                api_token,
                base_url: base_url.trim_end_matches('/').to_string(),
                ttl,
                zone_ids: RwLock::new(HashMap::new()),
                fixed_zone_id: zone_id,
                rate_limiter: RateLimiter::direct(rate_limit.quota()),
            }),
        })
    }

    /// Send a request and unwrap Cloudflare's response envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        self.inner.rate_limiter.until_ready().await;

        let response = request
            .bearer_auth(&self.inner.api_token)
            .send()
            .await
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        let envelope: Option<Envelope<T>> = serde_json::from_str(&body).ok();
        match envelope {
            Some(envelope) if status.is_success() && envelope.success => Ok(envelope),
            other => {
                let message = other
                    .map(|e| e.error_message())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body);
                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        Err(AdapterError::Unauthorized(message))
                    }
                    StatusCode::NOT_FOUND => Err(AdapterError::NotFound(message)),
                    _ => Err(AdapterError::Api {
                        code: status.as_u16(),
                        message,
                    }),
                }
            }
        }
    }

    /// Resolve the Cloudflare zone id for a zone name
    async fn zone_id(&self, zone: &str) -> Result<String> {
        if let Some(id) = self.inner.zone_ids.read().await.get(zone) {
            return Ok(id.clone());
        }
        if let Some(id) = &self.inner.fixed_zone_id {
            return Ok(id.clone());
        }

        let url = format!("{}/zones", self.inner.base_url);
        debug!(zone, "cloudflare: looking up zone id");
        let envelope: Envelope<Vec<CfZone>> = self
            .send(self.inner.http.get(&url).query(&[("name", zone)]))
            .await?;

        let id = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .find(|z| z.name == zone)
            .map(|z| z.id)
            .ok_or_else(|| AdapterError::NotFound(format!("cloudflare zone {zone}")))?;

        self.inner
            .zone_ids
            .write()
            .await
            .insert(zone.to_string(), id.clone());
        Ok(id)
    }

    async fn list(&self, zone_id: &str) -> Result<Vec<CfRecord>> {
        let url = format!("{}/zones/{zone_id}/dns_records", self.inner.base_url);
        let per_page = PAGE_SIZE.to_string();
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let page_str = page.to_string();
            let envelope: Envelope<Vec<CfRecord>> = self
                .send(
                    self.inner
                        .http
                        .get(&url)
                        .query(&[("page", page_str.as_str()), ("per_page", per_page.as_str())]),
                )
                .await?;

            let total_pages = envelope.result_info.as_ref().map_or(1, |i| i.total_pages);
            records.extend(envelope.result.unwrap_or_default());

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(records)
    }
}

impl Clone for CloudflareProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl ProviderAdapter for CloudflareProvider {
    fn name(&self) -> &'static str {
        BACKEND
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        let records = self.list(&zone_id).await?;
        Ok(records.into_iter().map(CfRecord::into_record).collect())
    }

    #[instrument(skip(self, records), fields(provider = "cloudflare", count = records.len()))]
    async fn append_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        let url = format!("{}/zones/{zone_id}/dns_records", self.inner.base_url);

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let body = CfNewRecord {
                record_type: &record.record_type,
                name: &record.name,
                content: &record.value,
                ttl: record.ttl.unwrap_or(self.inner.ttl),
            };
            let envelope: Envelope<CfRecord> =
                self.send(self.inner.http.post(&url).json(&body)).await?;
            if let Some(result) = envelope.result {
                debug!(id = %result.id, name = %result.name, "cloudflare: created record");
                created.push(result.into_record());
            }
        }
        Ok(created)
    }

    #[instrument(skip(self, records), fields(provider = "cloudflare", count = records.len()))]
    async fn delete_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;

        // Records without an id are matched against the live zone.
        let existing = if records.iter().any(|r| r.id.is_none()) {
            self.list(&zone_id)
                .await?
                .into_iter()
                .map(CfRecord::into_record)
                .collect()
        } else {
            Vec::new()
        };

        let mut deleted = Vec::with_capacity(records.len());
        for record in records {
            let target = match &record.id {
                Some(_) => record.clone(),
                None => match existing.iter().find(|r| r.same_content(record)) {
                    Some(found) => found.clone(),
                    None => continue,
                },
            };
            let Some(id) = target.id.as_deref() else {
                continue;
            };

            let url = format!(
                "{}/zones/{zone_id}/dns_records/{id}",
                self.inner.base_url
            );
            let _: Envelope<serde_json::Value> =
                self.send(self.inner.http.delete(&url)).await?;
            debug!(id, name = %target.name, "cloudflare: deleted record");
            deleted.push(target);
        }
        Ok(deleted)
    }
}

// Cloudflare-specific wire types
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<CfMessage>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<CfResultInfo>,
}

impl<T> Envelope<T> {
    fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
struct CfMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CfResultInfo {
    #[serde(default = "one")]
    total_pages: u32,
}

const fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct CfZone {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CfRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    ttl: Option<u32>,
}

impl CfRecord {
    fn into_record(self) -> DnsRecord {
        DnsRecord {
            id: Some(self.id),
            record_type: self.record_type,
            name: self.name,
            value: self.content,
            ttl: self.ttl,
        }
    }
}

#[derive(Debug, Serialize)]
struct CfNewRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, zone_id: Option<&str>) -> CloudflareProvider {
        let mut settings = json!({
            "api_token": "cf-token",
            "base_url": server.uri(),
            "requests_per_second": 100,
        });
        if let Some(id) = zone_id {
            settings["zone_id"] = json!(id);
        }
        CloudflareProvider::from_settings(&settings).unwrap()
    }

    fn record_json(id: &str, name: &str, content: &str) -> serde_json::Value {
        json!({"id": id, "type": "TXT", "name": name, "content": content, "ttl": 120})
    }

    #[test]
    fn test_error_envelope_without_result() {
        let body = r#"{"success":false,"errors":[{"code":9109,"message":"Invalid access token"}]}"#;
        let envelope: Envelope<Vec<CfRecord>> = serde_json::from_str(body).unwrap();

        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error_message(), "Invalid access token (9109)");
    }

    #[test]
    fn test_settings_validation() {
        assert!(CloudflareProvider::from_settings(&json!({})).is_err());
        assert!(CloudflareProvider::from_settings(&json!({"api_token": ""})).is_err());
        assert!(CloudflareProvider::from_settings(&json!({"api_token": "t", "base_url": "not a url"})).is_err());
        assert!(CloudflareProvider::from_settings(&json!({"api_token": "t", "unknown": 1})).is_err());
        assert!(CloudflareProvider::from_settings(&json!({"api_token": "t"})).is_ok());
    }

    #[tokio::test]
    async fn test_zone_lookup_and_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("name", "example.com"))
            .and(header("authorization", "Bearer cf-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": [{"id": "zone-1", "name": "example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [record_json("r1", "_acme-challenge.example.com", "v1")],
                "result_info": {"page": 1, "total_pages": 2}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [record_json("r2", "_acme-challenge.example.com", "v2")],
                "result_info": {"page": 2, "total_pages": 2}
            })))
            .mount(&server)
            .await;

        let cf = provider(&server, None);
        let records = cf.get_records("example.com").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_deref(), Some("r2"));
        assert_eq!(records[1].value, "v2");

        // Zone id is cached; the `expect(1)` above fails the test otherwise.
        cf.get_records("example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_append_record() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": record_json("new-id", "_acme-challenge.example.com", "tok")
            })))
            .mount(&server)
            .await;

        let cf = provider(&server, Some("zone-1"));
        let created = cf
            .append_records(
                "example.com",
                &[DnsRecord::txt("_acme-challenge.example.com", "tok")],
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id.as_deref(), Some("new-id"));
    }

    #[tokio::test]
    async fn test_delete_without_id_looks_up_record() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [
                    record_json("r1", "_acme-challenge.example.com", "v1"),
                    record_json("r2", "_acme-challenge.example.com", "v2")
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/zones/zone-1/dns_records/r2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"id": "r2"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cf = provider(&server, Some("zone-1"));
        let deleted = cf
            .delete_records(
                "example.com",
                &[DnsRecord::txt("_acme-challenge.example.com", "v2")],
            )
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "errors": [{"code": 81057, "message": "Record already exists."}],
                "result": null
            })))
            .mount(&server)
            .await;

        let cf = provider(&server, Some("zone-1"));
        let err = cf
            .append_records("example.com", &[DnsRecord::txt("a.example.com", "v")])
            .await
            .unwrap_err();
        match err {
            AdapterError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Record already exists. (81057)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_bad_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "success": false,
                "errors": [{"code": 10000, "message": "Authentication error"}]
            })))
            .mount(&server)
            .await;

        let cf = provider(&server, Some("zone-1"));
        let err = cf.get_records("example.com").await.unwrap_err();
        assert!(matches!(err, AdapterError::Unauthorized(_)));
    }
}
