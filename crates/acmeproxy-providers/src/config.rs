//! Shared HTTP settings for adapters and the client.

use governor::Quota;
use std::num::NonZeroU32;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every outbound request
pub(crate) fn user_agent() -> String {
    format!("acmeproxy/{}", env!("CARGO_PKG_VERSION"))
}

/// Client-side rate limit for a vendor API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,

    /// Requests allowed in a burst
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitConfig {
    /// Four requests per second with a burst of ten.
    ///
    /// Stays under Cloudflare's 1200 requests per five minutes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests_per_second: 4,
            burst_size: 10,
        }
    }

    /// Set sustained requests per second
    #[must_use]
    pub const fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = rps;
        self
    }

    /// Set burst size
    #[must_use]
    pub const fn burst_size(mut self, burst: u32) -> Self {
        self.burst_size = burst;
        self
    }

    /// Governor quota for this limit; zero values are raised to one
    #[must_use]
    pub fn quota(&self) -> Quota {
        Quota::per_second(NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_limit() {
        let config = RateLimitConfig::default();
        assert_eq!(config.requests_per_second, 4);
        assert_eq!(config.burst_size, 10);
    }

    #[test]
    fn test_zero_values_do_not_panic() {
        let quota = RateLimitConfig::new()
            .requests_per_second(0)
            .burst_size(0)
            .quota();
        assert_eq!(quota.burst_size().get(), 1);
    }

    #[test]
    fn test_user_agent() {
        assert!(user_agent().starts_with("acmeproxy/"));
    }
}
