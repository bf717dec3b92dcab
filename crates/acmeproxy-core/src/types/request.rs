use serde::{Deserialize, Serialize};

/// Body of a `/present` or `/cleanup` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRequest {
    /// Fully qualified record name, e.g. `_acme-challenge.foo.example.com`
    pub fqdn: String,

    /// Challenge token to publish
    pub value: String,
}

impl ChallengeRequest {
    /// Create a request, stripping a trailing dot from the FQDN
    #[must_use]
    pub fn new(fqdn: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            value: value.into(),
        }
        .normalized()
    }

    /// Strip the trailing dot cert-manager appends to resolved names
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if let Some(stripped) = self.fqdn.strip_suffix('.') {
            self.fqdn = stripped.to_string();
        }
        self
    }

    /// Name of the first required field that is empty, if any
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.fqdn.is_empty() {
            Some("fqdn")
        } else if self.value.is_empty() {
            Some("value")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_dot_stripped() {
        let req = ChallengeRequest::new("_acme-challenge.example.com.", "tok");
        assert_eq!(req.fqdn, "_acme-challenge.example.com");
    }

    #[test]
    fn test_only_one_dot_stripped() {
        let req = ChallengeRequest::new("example.com..", "tok");
        assert_eq!(req.fqdn, "example.com.");
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(ChallengeRequest::new("", "tok").missing_field(), Some("fqdn"));
        assert_eq!(ChallengeRequest::new(".", "tok").missing_field(), Some("fqdn"));
        assert_eq!(ChallengeRequest::new("a.com", "").missing_field(), Some("value"));
        assert_eq!(ChallengeRequest::new("a.com", "tok").missing_field(), None);
    }
}
