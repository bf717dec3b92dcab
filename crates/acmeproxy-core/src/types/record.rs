use serde::{Deserialize, Serialize};

/// Record type used for DNS-01 challenges
pub const TXT: &str = "TXT";

/// A DNS record as exchanged with a provider backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Backend-assigned record identifier, if the backend has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Record type (always TXT for records this proxy creates)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record name, either fully qualified or relative to the zone
    pub name: String,

    /// Record content
    pub value: String,

    /// Time to live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// Create a TXT record with no id and the backend's default TTL
    #[must_use]
    pub fn txt(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            record_type: TXT.to_string(),
            name: name.into(),
            value: value.into(),
            ttl: None,
        }
    }

    /// Set the record identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the TTL
    #[must_use]
    pub const fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns true if this is a TXT record
    #[must_use]
    pub fn is_txt(&self) -> bool {
        self.record_type.eq_ignore_ascii_case(TXT)
    }

    /// Returns true if type, name and value are equal, ignoring id and TTL
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.record_type.eq_ignore_ascii_case(&other.record_type)
            && self.name == other.name
            && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_record_serialization() {
        let record = DnsRecord::txt("_acme-challenge.example.com", "abc");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "TXT",
                "name": "_acme-challenge.example.com",
                "value": "abc"
            })
        );
    }

    #[test]
    fn test_same_content_ignores_id() {
        let a = DnsRecord::txt("a.example.com", "v").with_id("1").with_ttl(60);
        let b = DnsRecord {
            record_type: "txt".into(),
            ..DnsRecord::txt("a.example.com", "v")
        };
        assert!(a.same_content(&b));
        assert!(b.is_txt());
        assert!(!a.same_content(&DnsRecord::txt("a.example.com", "w")));
    }
}
