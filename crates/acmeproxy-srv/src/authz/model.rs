//! Startup resolution of users and providers.
//!
//! Builds the provider table (one instance per zone), then binds every user
//! zone rule to exactly one provider. Every defect is collected so a single
//! run reports the whole list.

use acmeproxy_core::{zone, ProviderRegistry, ProviderSpec, UserSpec, ZoneRuleSpec};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ProviderInstance, ZoneRule};
use crate::error::{ConfigError, ConfigErrors};

/// A caller with its resolved allow list.
pub struct AuthorizedUser {
    name: String,
    token: String,
    rules: Vec<ZoneRule>,
}

impl fmt::Debug for AuthorizedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The token is a password; keep it out of logs.
        f.debug_struct("AuthorizedUser")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl AuthorizedUser {
    /// User name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zone rules in declaration order
    pub fn rules(&self) -> &[ZoneRule] {
        &self.rules
    }

    /// First rule granting `fqdn`; earlier rules shadow later ones
    pub fn find_rule(&self, fqdn: &str) -> Option<&ZoneRule> {
        self.rules.iter().find(|rule| rule.matches(fqdn))
    }

    /// Check a Basic auth password
    pub fn verify_token(&self, token: &str) -> bool {
        constant_time_eq(self.token.as_bytes(), token.as_bytes())
    }
}

/// Compare without an early exit on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Users and providers resolved from the config. Read-only once built.
#[derive(Debug)]
pub struct AuthorizationModel {
    users: HashMap<String, AuthorizedUser>,
    providers: BTreeMap<String, Arc<ProviderInstance>>,
}

impl AuthorizationModel {
    /// Resolve `providers` and `users` against `registry`.
    ///
    /// Fails with every defect found, never just the first.
    pub fn build(
        providers: &[ProviderSpec],
        users: &[UserSpec],
        registry: &ProviderRegistry,
    ) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::default();

        let providers = build_providers(providers, registry, &mut errors);
        let users = build_users(users, &providers, &mut errors);

        let model = errors.into_result(Self { users, providers })?;
        info!(
            providers = model.providers.len(),
            users = model.users.len(),
            "authorization model built"
        );
        for provider in model.unused_providers() {
            warn!(provider = %provider, "provider is not used by any user");
        }
        Ok(model)
    }

    /// Look up a user by name
    pub fn user(&self, name: &str) -> Option<&AuthorizedUser> {
        self.users.get(name)
    }

    /// The user named `name` if `token` is its password
    pub fn authenticate(&self, name: &str, token: &str) -> Option<&AuthorizedUser> {
        self.users.get(name).filter(|user| user.verify_token(token))
    }

    /// All users, sorted by name
    pub fn users(&self) -> Vec<&AuthorizedUser> {
        let mut users: Vec<_> = self.users.values().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    /// All provider instances, sorted by zone
    pub fn providers(&self) -> impl Iterator<Item = &Arc<ProviderInstance>> {
        self.providers.values()
    }

    /// Providers no zone rule routes to
    pub fn unused_providers(&self) -> Vec<&Arc<ProviderInstance>> {
        let used: HashSet<&str> = self
            .users
            .values()
            .flat_map(|user| user.rules.iter().map(|rule| rule.provider().zone()))
            .collect();
        self.providers
            .values()
            .filter(|provider| !used.contains(provider.zone()))
            .collect()
    }
}

/// Strip a trailing dot, warning when one was present.
fn normalize_zone<'a>(raw: &'a str, owner: &str) -> &'a str {
    let (normalized, stripped) = zone::normalize(raw);
    if stripped {
        warn!(owner, zone = raw, "zone should not end with a dot, using {normalized:?}");
    }
    normalized
}

fn build_providers(
    specs: &[ProviderSpec],
    registry: &ProviderRegistry,
    errors: &mut ConfigErrors,
) -> BTreeMap<String, Arc<ProviderInstance>> {
    let mut table: BTreeMap<String, Arc<ProviderInstance>> = BTreeMap::new();

    for spec in specs {
        let zone = normalize_zone(&spec.zone, &spec.to_string());
        if zone.is_empty() {
            errors.push(ConfigError::EmptyProviderZone {
                provider: spec.provider.clone(),
            });
            continue;
        }

        if let Some(existing) = table.get(zone) {
            if existing.same_backend(spec) {
                debug!(provider = %existing, "reusing provider for repeated spec");
            } else {
                errors.push(ConfigError::DuplicateProviderZone {
                    zone: zone.to_string(),
                    existing: existing.to_string(),
                    duplicate: spec.to_string(),
                });
            }
            continue;
        }

        info!(provider = %spec.provider, zone, "creating provider");
        match registry.build(&spec.provider, &spec.config) {
            Ok(adapter) => {
                table.insert(
                    zone.to_string(),
                    Arc::new(ProviderInstance::new(zone, spec, adapter)),
                );
            }
            Err(source) => errors.push(ConfigError::ProviderConstruction {
                zone: zone.to_string(),
                provider: spec.provider.clone(),
                source,
            }),
        }
    }

    table
}

fn build_users(
    specs: &[UserSpec],
    providers: &BTreeMap<String, Arc<ProviderInstance>>,
    errors: &mut ConfigErrors,
) -> HashMap<String, AuthorizedUser> {
    let mut users = HashMap::with_capacity(specs.len());

    for spec in specs {
        if users.contains_key(&spec.name) {
            errors.push(ConfigError::DuplicateUser {
                user: spec.name.clone(),
            });
            continue;
        }
        if spec.token.is_empty() {
            errors.push(ConfigError::EmptyToken {
                user: spec.name.clone(),
            });
        }

        let mut rules = Vec::with_capacity(spec.allowed_zones.len());
        for rule in &spec.allowed_zones {
            match resolve_rule(&spec.name, rule, providers) {
                Ok(rule) => rules.push(rule),
                Err(error) => errors.push(error),
            }
        }

        users.insert(
            spec.name.clone(),
            AuthorizedUser {
                name: spec.name.clone(),
                token: spec.token.clone(),
                rules,
            },
        );
    }

    users
}

/// Bind one rule to its provider.
fn resolve_rule(
    user: &str,
    rule: &ZoneRuleSpec,
    providers: &BTreeMap<String, Arc<ProviderInstance>>,
) -> Result<ZoneRule, ConfigError> {
    let zone = normalize_zone(&rule.zone, user);
    if zone.is_empty() {
        return Err(ConfigError::EmptyZone {
            user: user.to_string(),
        });
    }

    if let Some(source) = &rule.regex {
        let pattern = Regex::new(source).map_err(|e| ConfigError::InvalidPattern {
            user: user.to_string(),
            zone: zone.to_string(),
            pattern: source.clone(),
            source: e,
        })?;
        // Pattern rules never fall back to suffix inference.
        let provider = providers
            .get(zone)
            .ok_or_else(|| ConfigError::NoProviderForPattern {
                user: user.to_string(),
                zone: zone.to_string(),
            })?;
        return Ok(ZoneRule::new(
            zone.to_string(),
            Some(pattern),
            Arc::clone(provider),
        ));
    }

    let candidates: Vec<&Arc<ProviderInstance>> = providers
        .iter()
        .filter(|(provider_zone, _)| zone::is_within(zone, provider_zone))
        .map(|(_, provider)| provider)
        .collect();

    match candidates.as_slice() {
        [provider] => Ok(ZoneRule::new(zone.to_string(), None, Arc::clone(*provider))),
        [] => Err(ConfigError::NoProviderForZone {
            user: user.to_string(),
            zone: zone.to_string(),
        }),
        many => Err(ConfigError::AmbiguousProvider {
            user: user.to_string(),
            zone: zone.to_string(),
            candidates: many.iter().map(ToString::to_string).collect(),
        }),
    }
}
