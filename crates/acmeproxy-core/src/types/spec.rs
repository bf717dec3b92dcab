use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS backend bound to one zone, as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Zone the backend manages, e.g. `example.com`
    pub zone: String,

    /// Backend identifier looked up in the provider registry
    #[serde(alias = "backend_id")]
    pub provider: String,

    /// Opaque backend settings handed to the constructor
    #[serde(default, alias = "settings")]
    pub config: serde_json::Value,
}

impl ProviderSpec {
    /// Create a spec
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        provider: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            zone: zone.into(),
            provider: provider.into(),
            config,
        }
    }
}

impl fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.zone)
    }
}

/// A caller allowed to present challenges, as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    /// Basic auth user name
    pub name: String,

    /// Basic auth password
    pub token: String,

    /// Zone rules in priority order
    #[serde(default, rename = "allowedZones", alias = "allowed_zones")]
    pub allowed_zones: Vec<ZoneRuleSpec>,
}

impl UserSpec {
    /// Create a user with no zone rules
    #[must_use]
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            allowed_zones: Vec::new(),
        }
    }

    /// Append a zone rule
    #[must_use]
    pub fn allow(mut self, rule: ZoneRuleSpec) -> Self {
        self.allowed_zones.push(rule);
        self
    }
}

/// One entry of a user's `allowedZones` list
///
/// Accepts either a bare zone string or a `{zone, regex}` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawZoneRule")]
pub struct ZoneRuleSpec {
    /// Zone suffix the rule grants
    pub zone: String,

    /// Optional pattern matched against the full FQDN instead of the suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl ZoneRuleSpec {
    /// Suffix rule
    #[must_use]
    pub fn zone(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            regex: None,
        }
    }

    /// Pattern rule bound to the provider of `zone`
    #[must_use]
    pub fn pattern(zone: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            regex: Some(regex.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawZoneRule {
    Zone(String),
    Rule {
        zone: String,
        #[serde(default)]
        regex: Option<String>,
    },
}

impl From<RawZoneRule> for ZoneRuleSpec {
    fn from(raw: RawZoneRule) -> Self {
        match raw {
            RawZoneRule::Zone(zone) => Self::zone(zone),
            // An empty pattern means "no pattern".
            RawZoneRule::Rule { zone, regex } => Self {
                zone,
                regex: regex.filter(|r| !r.is_empty()),
            },
        }
    }
}
