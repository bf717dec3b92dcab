//! Resolved zone rules.

use acmeproxy_core::zone;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::ProviderInstance;

/// One entry of a user's allow list, bound to its provider at load time.
#[derive(Debug, Clone)]
pub struct ZoneRule {
    zone: String,
    pattern: Option<Regex>,
    provider: Arc<ProviderInstance>,
}

impl ZoneRule {
    pub(crate) const fn new(zone: String, pattern: Option<Regex>, provider: Arc<ProviderInstance>) -> Self {
        Self {
            zone,
            pattern,
            provider,
        }
    }

    /// Normalized zone suffix
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Pattern source, if this is a pattern rule
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Provider this rule routes to
    pub const fn provider(&self) -> &Arc<ProviderInstance> {
        &self.provider
    }

    /// Returns true if the rule grants `fqdn`.
    ///
    /// A pattern rule matches on the pattern alone; otherwise `fqdn` must be
    /// the zone itself or a name under it.
    pub fn matches(&self, fqdn: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(fqdn),
            None => zone::is_within(fqdn, &self.zone),
        }
    }
}

impl fmt::Display for ZoneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(pattern) => write!(f, "{} ~ /{}/ -> {}", self.zone, pattern, self.provider),
            None => write!(f, "{} -> {}", self.zone, self.provider),
        }
    }
}
