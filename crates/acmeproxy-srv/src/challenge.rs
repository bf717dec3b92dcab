//! Present and cleanup against the routed provider.

use acmeproxy_core::{zone, ChallengeRequest, DnsRecord};
use std::sync::Arc;
use tracing::{debug, info};

use crate::authz::AuthorizationModel;
use crate::error::ChallengeError;

/// Carries out challenge requests for authenticated users.
///
/// Holds no state between requests; every call lists the zone afresh.
#[derive(Debug, Clone)]
pub struct ChallengeCoordinator {
    model: Arc<AuthorizationModel>,
}

impl ChallengeCoordinator {
    /// Create a coordinator over a built model
    pub const fn new(model: Arc<AuthorizationModel>) -> Self {
        Self { model }
    }

    /// The authorization model requests are checked against
    pub fn model(&self) -> &AuthorizationModel {
        &self.model
    }

    /// Publish the challenge TXT record.
    ///
    /// If a TXT record with the same value already exists under the FQDN (in
    /// any name form the backend uses) nothing is appended and the existing
    /// records are returned.
    pub async fn present(
        &self,
        user: &str,
        request: &ChallengeRequest,
    ) -> Result<Vec<DnsRecord>, ChallengeError> {
        let provider = self.model.resolve(user, &request.fqdn)?;
        let names = zone::name_candidates(&request.fqdn, provider.zone());

        let existing: Vec<DnsRecord> = provider
            .get_records()
            .await?
            .into_iter()
            .filter(|r| r.is_txt() && r.value == request.value && names.contains(&r.name))
            .collect();
        if !existing.is_empty() {
            debug!(user, fqdn = %request.fqdn, provider = %provider, "record already present");
            return Ok(existing);
        }

        let records = provider
            .append_records(&[DnsRecord::txt(&request.fqdn, &request.value)])
            .await?;
        info!(user, fqdn = %request.fqdn, provider = %provider, "presented challenge record");
        Ok(records)
    }

    /// Remove the challenge TXT record carrying exactly `request.value`.
    ///
    /// Records with the same name but another value are never touched.
    pub async fn cleanup(
        &self,
        user: &str,
        request: &ChallengeRequest,
    ) -> Result<Vec<DnsRecord>, ChallengeError> {
        let provider = self.model.resolve(user, &request.fqdn)?;

        let candidates: Vec<DnsRecord> = provider
            .get_records()
            .await?
            .into_iter()
            .filter(|r| r.is_txt() && r.value == request.value)
            .collect();

        // Absolute name first, then the zone-relative forms.
        let target = zone::name_candidates(&request.fqdn, provider.zone())
            .iter()
            .find_map(|name| candidates.iter().find(|r| &r.name == name))
            .cloned()
            .ok_or_else(|| ChallengeError::NotFound {
                fqdn: request.fqdn.clone(),
                provider: provider.to_string(),
            })?;

        let deleted = provider.delete_records(&[target]).await?;
        info!(
            user,
            fqdn = %request.fqdn,
            provider = %provider,
            deleted = deleted.len(),
            "cleaned up challenge record"
        );
        Ok(deleted)
    }
}
