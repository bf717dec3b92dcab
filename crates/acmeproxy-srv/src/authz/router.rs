//! Request routing.

use std::sync::Arc;

use super::{AuthorizationModel, ProviderInstance};
use crate::error::ChallengeError;

impl AuthorizationModel {
    /// Provider serving `fqdn` for `user`.
    ///
    /// Rules are tried in declaration order and the first match wins, even
    /// if a later rule is more specific. Unknown users and unmatched names
    /// are both refused.
    pub fn resolve(&self, user: &str, fqdn: &str) -> Result<&Arc<ProviderInstance>, ChallengeError> {
        self.user(user)
            .and_then(|u| u.find_rule(fqdn))
            .map(|rule| rule.provider())
            .ok_or_else(|| ChallengeError::Forbidden {
                user: user.to_string(),
                fqdn: fqdn.to_string(),
            })
    }
}
